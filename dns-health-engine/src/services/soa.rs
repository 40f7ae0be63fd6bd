//! Start of Authority record.

use crate::resolver::Lookup;
use crate::types::{CheckStatus, DimensionDetails, DimensionResult, RecordType, SoaData};

use super::{GENERIC_RECOMMENDATION, strip_trailing_dot};

/// Refresh intervals below one hour load the primary needlessly.
const MIN_REFRESH_SECS: u32 = 3600;
/// Secondaries should keep serving the zone for at least a week.
const MIN_EXPIRE_SECS: u32 = 604_800;

pub async fn check_soa(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let answer = match lookup.lookup(domain, RecordType::Soa).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("SOA lookup for {domain} failed: {e}");
            return DimensionResult::new(
                CheckStatus::Fail,
                format!("Failed to query SOA record: {e}"),
                0,
                DimensionDetails::Soa(None),
            )
            .with_recommendation(GENERIC_RECOMMENDATION);
        }
    };

    let Some(record) = answer.records_of(RecordType::Soa).next() else {
        return DimensionResult::new(
            CheckStatus::Fail,
            "No SOA record found",
            0,
            DimensionDetails::Soa(None),
        )
        .with_recommendation("Configure a valid SOA record for your domain");
    };

    let soa = parse_soa(&record.data);
    let mut recommendations = Vec::new();
    if soa.refresh < MIN_REFRESH_SECS {
        recommendations.push("Consider increasing the refresh interval (>1 hour)".to_string());
    }
    if soa.expire < MIN_EXPIRE_SECS {
        recommendations.push("Consider increasing the expire time (>1 week)".to_string());
    }

    let mut result = DimensionResult::new(
        CheckStatus::Pass,
        format!("SOA record found (primary: {}, serial: {})", soa.primary_ns, soa.serial),
        100,
        DimensionDetails::Soa(Some(soa)),
    );
    result.recommendations = recommendations;
    result
}

/// Parse `mname rname serial refresh retry expire minimum`.
///
/// Missing or malformed numeric fields become 0. The mailbox's first dot is
/// the local-part separator, so only that one becomes `@`.
pub fn parse_soa(data: &str) -> SoaData {
    let mut fields = data.split_whitespace();
    let primary_ns = strip_trailing_dot(fields.next().unwrap_or_default());
    let admin_email = strip_trailing_dot(fields.next().unwrap_or_default()).replacen('.', "@", 1);
    let mut number = || fields.next().and_then(|f| f.parse::<u32>().ok()).unwrap_or(0);

    SoaData {
        primary_ns,
        admin_email,
        serial: number(),
        refresh: number(),
        retry: number(),
        expire: number(),
        minimum: number(),
    }
}
