//! IPv4 (A) and IPv6 (AAAA) address records.

use crate::resolver::Lookup;
use crate::types::{CheckStatus, DimensionDetails, DimensionResult, RecordKind, RecordType};

use super::{GENERIC_RECOMMENDATION, typed_records};

/// A records are mandatory: a domain without any is unreachable.
pub async fn check_a(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let answer = match lookup.lookup(domain, RecordType::A).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("A lookup for {domain} failed: {e}");
            return DimensionResult::new(
                CheckStatus::Fail,
                format!("Failed to query A records: {e}"),
                0,
                DimensionDetails::Records(vec![]),
            )
            .with_recommendation(GENERIC_RECOMMENDATION);
        }
    };

    let records = typed_records(&answer, RecordType::A, RecordKind::A);
    if records.is_empty() {
        return DimensionResult::new(
            CheckStatus::Fail,
            "No A records found",
            0,
            DimensionDetails::Records(records),
        )
        .with_recommendation("Add A records to make your domain accessible");
    }

    DimensionResult::new(
        CheckStatus::Pass,
        format!("Found {} A record(s)", records.len()),
        100,
        DimensionDetails::Records(records),
    )
}

/// IPv6 is optional; failures and absence both only warn.
pub async fn check_aaaa(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let records = match lookup.lookup(domain, RecordType::Aaaa).await {
        Ok(answer) => typed_records(&answer, RecordType::Aaaa, RecordKind::Aaaa),
        Err(e) => {
            log::warn!("AAAA lookup for {domain} failed, treating as absent: {e}");
            Vec::new()
        }
    };

    if records.is_empty() {
        return DimensionResult::new(
            CheckStatus::Warning,
            "No AAAA records found (IPv6 not configured)",
            75,
            DimensionDetails::Records(records),
        )
        .with_recommendation("Consider adding AAAA records for IPv6 support");
    }

    DimensionResult::new(
        CheckStatus::Pass,
        format!("Found {} AAAA record(s)", records.len()),
        100,
        DimensionDetails::Records(records),
    )
}
