//! Reverse DNS for the domain's IPv4 addresses.

use std::net::Ipv4Addr;

use futures::future::join_all;

use crate::resolver::Lookup;
use crate::types::{
    CheckStatus, DimensionDetails, DimensionResult, RecordKind, RecordType, TypedRecord,
};

use super::typed_records;

const RECOMMENDATION: &str = "Configure reverse DNS (PTR) records to improve email deliverability";

/// Resolve A records, then query PTR for each address.
///
/// A failing PTR sub-lookup only drops that address; the first-phase A query
/// failing degrades the whole dimension to a warning.
pub async fn check_ptr(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let addresses = match lookup.lookup(domain, RecordType::A).await {
        Ok(answer) => typed_records(&answer, RecordType::A, RecordKind::A),
        Err(e) => {
            log::warn!("PTR check for {domain}: A lookup failed: {e}");
            return DimensionResult::new(
                CheckStatus::Warning,
                format!("Could not check reverse DNS: {e}"),
                75,
                DimensionDetails::Records(vec![]),
            )
            .with_recommendation(RECOMMENDATION);
        }
    };

    let lookups = addresses.iter().filter_map(|address| {
        let Some(name) = reverse_name(&address.data) else {
            log::debug!("Skipping non-IPv4 address {}", address.data);
            return None;
        };
        Some(async move {
            match lookup.lookup(&name, RecordType::Ptr).await {
                Ok(answer) => typed_records(&answer, RecordType::Ptr, RecordKind::Ptr),
                Err(e) => {
                    log::warn!("PTR lookup for {name} failed: {e}");
                    Vec::new()
                }
            }
        })
    });
    let records: Vec<TypedRecord> = join_all(lookups).await.into_iter().flatten().collect();

    if records.is_empty() {
        return DimensionResult::new(
            CheckStatus::Warning,
            "No PTR records found",
            75,
            DimensionDetails::Records(records),
        )
        .with_recommendation(RECOMMENDATION);
    }

    DimensionResult::new(
        CheckStatus::Pass,
        format!("Found {} PTR record(s)", records.len()),
        100,
        DimensionDetails::Records(records),
    )
}

/// `1.2.3.4` -> `4.3.2.1.in-addr.arpa`.
pub fn reverse_name(ip: &str) -> Option<String> {
    let [a, b, c, d] = ip.trim().parse::<Ipv4Addr>().ok()?.octets();
    Some(format!("{d}.{c}.{b}.{a}.in-addr.arpa"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockLookup, a_record, network_error};
    use crate::types::RawRecord;

    fn ptr(name: &str, host: &str) -> RawRecord {
        RawRecord::new(format!("{name}."), RecordType::Ptr, format!("{host}."), 3600)
    }

    #[test]
    fn test_reverse_name() {
        assert_eq!(reverse_name("1.2.3.4").as_deref(), Some("4.3.2.1.in-addr.arpa"));
        assert_eq!(
            reverse_name("93.184.216.34").as_deref(),
            Some("34.216.184.93.in-addr.arpa")
        );
        assert_eq!(reverse_name("2001:db8::1"), None);
        assert_eq!(reverse_name("not-an-ip"), None);
    }

    #[tokio::test]
    async fn test_check_ptr_resolves_reverse_names() {
        let mock = MockLookup::new()
            .with_answer("example.com", RecordType::A, vec![a_record("example.com", "1.2.3.4")])
            .with_answer(
                "4.3.2.1.in-addr.arpa",
                RecordType::Ptr,
                vec![ptr("4.3.2.1.in-addr.arpa", "host.example.com")],
            );
        let result = check_ptr(&mock, "example.com").await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.score, 100);
        assert_eq!(result.records()[0].data, "host.example.com");
        assert!(mock
            .queries()
            .contains(&("4.3.2.1.in-addr.arpa".to_string(), RecordType::Ptr)));
    }

    #[tokio::test]
    async fn test_check_ptr_swallows_individual_failures() {
        let mock = MockLookup::new()
            .with_answer(
                "example.com",
                RecordType::A,
                vec![a_record("example.com", "1.2.3.4"), a_record("example.com", "5.6.7.8")],
            )
            .with_error("4.3.2.1.in-addr.arpa", RecordType::Ptr, network_error())
            .with_answer(
                "8.7.6.5.in-addr.arpa",
                RecordType::Ptr,
                vec![ptr("8.7.6.5.in-addr.arpa", "mail.example.com")],
            );
        let result = check_ptr(&mock, "example.com").await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.records().len(), 1);
    }

    #[tokio::test]
    async fn test_check_ptr_none_found_warns() {
        let mock = MockLookup::new().with_answer(
            "example.com",
            RecordType::A,
            vec![a_record("example.com", "1.2.3.4")],
        );
        let result = check_ptr(&mock, "example.com").await;
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.score, 75);
        assert_eq!(result.recommendations, vec![RECOMMENDATION.to_string()]);
    }

    #[tokio::test]
    async fn test_check_ptr_a_lookup_error_warns() {
        let mock = MockLookup::new().with_error("example.com", RecordType::A, network_error());
        let result = check_ptr(&mock, "example.com").await;
        assert_eq!(result.status, CheckStatus::Warning);
        assert_eq!(result.score, 75);
        assert_eq!(result.recommendations.len(), 1);
    }
}
