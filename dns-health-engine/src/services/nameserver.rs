//! Nameserver delegation and responsiveness.

use std::time::Instant;

use futures::future::join_all;

use crate::resolver::Lookup;
use crate::types::{CheckStatus, DimensionDetails, DimensionResult, NameserverProbe, RecordType};

use super::strip_trailing_dot;

/// Number of responsive nameservers needed for full marks.
const REDUNDANT_NAMESERVERS: usize = 2;

/// Query NS records and probe every nameserver with a timed A lookup.
pub async fn check_nameservers(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let answer = match lookup.lookup(domain, RecordType::Ns).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("NS lookup for {domain} failed: {e}");
            return DimensionResult::new(
                CheckStatus::Fail,
                format!("Failed to query nameservers: {e}"),
                0,
                DimensionDetails::Nameservers(vec![]),
            )
            .with_recommendation("Configure valid nameservers for your domain");
        }
    };

    let probes = join_all(
        answer
            .records_of(RecordType::Ns)
            .map(|record| probe_nameserver(lookup, strip_trailing_dot(&record.data))),
    )
    .await;

    let passing = probes
        .iter()
        .filter(|p| p.status == CheckStatus::Pass)
        .count();
    let (status, score) = score_nameservers(passing);

    let mut result = DimensionResult::new(
        status,
        format!("{passing} of {} nameservers responding", probes.len()),
        score,
        DimensionDetails::Nameservers(probes),
    );
    if passing < REDUNDANT_NAMESERVERS {
        result =
            result.with_recommendation("Have at least 2 working nameservers for redundancy");
    }
    result
}

/// Resolve the nameserver's own address as a liveness proxy.
async fn probe_nameserver(lookup: &dyn Lookup, name: String) -> NameserverProbe {
    let start = Instant::now();
    match lookup.lookup(&name, RecordType::A).await {
        Ok(_) => {
            // u128 -> u64: a single query never runs for u64::MAX milliseconds
            #[allow(clippy::cast_possible_truncation)]
            let elapsed = start.elapsed().as_millis() as u64;
            NameserverProbe {
                name,
                status: CheckStatus::Pass,
                response_time_ms: Some(elapsed),
                error: None,
            }
        }
        Err(e) => {
            log::debug!("Nameserver probe for {name} failed: {e}");
            NameserverProbe {
                name,
                status: CheckStatus::Fail,
                response_time_ms: None,
                error: Some("No response".to_string()),
            }
        }
    }
}

/// `min(100, passing / 2 * 100)` with the matching tier.
fn score_nameservers(passing: usize) -> (CheckStatus, u32) {
    let score = u32::try_from(passing.saturating_mul(50))
        .unwrap_or(u32::MAX)
        .min(100);
    let status = match passing {
        0 => CheckStatus::Fail,
        1 => CheckStatus::Warning,
        _ => CheckStatus::Pass,
    };
    (status, score)
}
