//! DNS propagation check: compare A answers across independent resolvers.

use std::collections::HashMap;
use std::time::Instant;

use futures::future::join_all;

use crate::error::ResolverError;
use crate::resolver::{Lookup, NamedLookup};
use crate::types::{
    CheckStatus, DimensionDetails, DimensionResult, PropagationDetails, PropagationServerResult,
    PropagationStatus, RecordType,
};

/// Display name of the analyzer's own resolver in the comparison.
const PRIMARY_NAME: &str = "primary";

const RECOMMENDATION: &str =
    "DNS changes can take up to 48 hours to propagate; re-check once caches have expired";

/// Query the domain's A records through the primary resolver and every
/// propagation resolver concurrently, then compare the answer sets.
pub async fn check_propagation(
    primary: &dyn Lookup,
    resolvers: &[NamedLookup],
    domain: &str,
) -> DimensionResult {
    let mut queries = vec![query_resolver(PRIMARY_NAME, primary, domain)];
    queries.extend(
        resolvers
            .iter()
            .map(|r| query_resolver(&r.name, r.lookup.as_ref(), domain)),
    );
    let servers = join_all(queries).await;

    let (consistency_percentage, unique_values) = calculate_consistency(&servers);
    let successful = servers
        .iter()
        .filter(|s| s.status == PropagationStatus::Success)
        .count();
    let total = servers.len();

    let details = DimensionDetails::Propagation(PropagationDetails {
        consistency_percentage,
        servers,
        unique_values,
    });

    if successful == 0 {
        return DimensionResult::new(
            CheckStatus::Warning,
            format!("Could not verify propagation: none of {total} resolvers answered"),
            60,
            details,
        )
        .with_recommendation(RECOMMENDATION);
    }

    if consistency_percentage >= 100.0 {
        return DimensionResult::new(
            CheckStatus::Pass,
            format!("DNS records are consistent across {successful} resolvers"),
            100,
            details,
        );
    }

    DimensionResult::new(
        CheckStatus::Warning,
        format!("DNS records are inconsistent ({consistency_percentage:.0}% agreement)"),
        60,
        details,
    )
    .with_recommendation(RECOMMENDATION)
}

async fn query_resolver(
    name: &str,
    lookup: &dyn Lookup,
    domain: &str,
) -> PropagationServerResult {
    let start = Instant::now();
    let result = lookup.lookup(domain, RecordType::A).await;
    // u128 -> u64: elapsed millis for a DNS query will never exceed u64::MAX
    #[allow(clippy::cast_possible_truncation)]
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(answer) => {
            let mut values: Vec<String> = answer
                .records_of(RecordType::A)
                .map(|r| r.data.clone())
                .collect();
            values.sort();
            PropagationServerResult {
                resolver: name.to_string(),
                status: PropagationStatus::Success,
                values,
                error: None,
                response_time_ms,
            }
        }
        Err(e) => {
            log::debug!("Propagation query via {name} failed: {e}");
            let status = if matches!(e, ResolverError::Timeout(_)) {
                PropagationStatus::Timeout
            } else {
                PropagationStatus::Error
            };
            PropagationServerResult {
                resolver: name.to_string(),
                status,
                values: vec![],
                error: Some(e.to_string()),
                response_time_ms,
            }
        }
    }
}

/// Calculate consistency percentage and unique answer sets.
///
/// Only successful servers count; TTLs never take part in the comparison.
fn calculate_consistency(results: &[PropagationServerResult]) -> (f32, Vec<String>) {
    let successful: Vec<_> = results
        .iter()
        .filter(|r| r.status == PropagationStatus::Success)
        .collect();

    if successful.is_empty() {
        return (0.0, vec![]);
    }

    let mut value_counts: HashMap<String, usize> = HashMap::new();
    for result in &successful {
        // values are already sorted, so order differences between resolvers vanish
        *value_counts.entry(result.values.join("|")).or_insert(0) += 1;
    }

    let max_count = value_counts.values().max().copied().unwrap_or(0);
    // usize -> f64: a handful of resolvers, far below f64's exact integer range
    #[allow(clippy::cast_precision_loss)]
    let consistency = (max_count as f64 / successful.len() as f64) * 100.0;

    let mut unique_values: Vec<_> = value_counts.into_keys().collect();
    unique_values.sort();

    // f64 -> f32: a percentage in 0.0..=100.0
    #[allow(clippy::cast_possible_truncation)]
    (consistency as f32, unique_values)
}
