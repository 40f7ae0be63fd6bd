//! Alias record for the `www.` host. Informational only.

use crate::resolver::Lookup;
use crate::types::{CheckStatus, DimensionDetails, DimensionResult, RecordKind, RecordType};

use super::typed_records;

pub async fn check_cname(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let host = format!("www.{domain}");
    let records = match lookup.lookup(&host, RecordType::Cname).await {
        Ok(answer) => typed_records(&answer, RecordType::Cname, RecordKind::Cname),
        Err(e) => {
            log::debug!("CNAME lookup for {host} failed: {e}");
            Vec::new()
        }
    };

    let message = match records.first() {
        Some(record) => format!("{host} is an alias for {}", record.data),
        None => format!("No CNAME record for {host}"),
    };

    DimensionResult::new(CheckStatus::Pass, message, 100, DimensionDetails::Records(records))
}
