//! Mail exchange records.

use crate::resolver::Lookup;
use crate::types::{
    CheckStatus, DimensionDetails, DimensionResult, RawRecord, RecordKind, RecordType, TypedRecord,
};

use super::{GENERIC_RECOMMENDATION, strip_trailing_dot};

pub async fn check_mx(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let answer = match lookup.lookup(domain, RecordType::Mx).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("MX lookup for {domain} failed: {e}");
            return DimensionResult::new(
                CheckStatus::Fail,
                format!("Failed to query MX records: {e}"),
                0,
                DimensionDetails::Records(vec![]),
            )
            .with_recommendation(GENERIC_RECOMMENDATION);
        }
    };

    let records: Vec<TypedRecord> = answer.records_of(RecordType::Mx).map(parse_mx).collect();

    // A domain may legitimately not receive mail.
    if records.is_empty() {
        return DimensionResult::new(
            CheckStatus::Warning,
            "No MX records found",
            50,
            DimensionDetails::Records(records),
        )
        .with_recommendation("Add MX records if you need email functionality");
    }

    DimensionResult::new(
        CheckStatus::Pass,
        format!("Found {} MX record(s)", records.len()),
        100,
        DimensionDetails::Records(records),
    )
}

/// Interpret `"<priority> <exchange>"`; an unparsable priority becomes 0.
fn parse_mx(record: &RawRecord) -> TypedRecord {
    let mut parts = record.data.split_whitespace();
    let priority = parts.next().and_then(|p| p.parse::<u16>().ok()).unwrap_or(0);
    let exchange = strip_trailing_dot(parts.next().unwrap_or_default());

    TypedRecord {
        kind: RecordKind::Mx,
        name: strip_trailing_dot(&record.name),
        data: exchange,
        ttl: Some(record.ttl),
        priority: Some(priority),
    }
}
