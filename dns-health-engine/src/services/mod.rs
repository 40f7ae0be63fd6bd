//! Analysis coordinator: runs every dimension evaluator and aggregates the report.

mod address;
mod cname;
mod mx;
mod nameserver;
mod propagation;
mod ptr;
mod scoring;
mod security;
mod soa;

use std::sync::Arc;

use chrono::Utc;

use crate::config::AnalyzerConfig;
use crate::error::EngineResult;
use crate::resolver::{Lookup, NamedLookup};
use crate::types::{RawAnswer, RecordKind, RecordType, Report, TypedRecord};

pub use ptr::reverse_name;
pub use scoring::{overall_score, overall_status, weight};
pub use soa::parse_soa;

/// Shown when a dimension's query could not be answered at all.
pub(crate) const GENERIC_RECOMMENDATION: &str =
    "Check your DNS configuration and make sure your nameservers are reachable";

/// Drop the root label dot from a presentation-format name.
pub(crate) fn strip_trailing_dot(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}

/// Convert answers of `record_type` into report records.
///
/// Owner names and name-valued data lose their trailing dot; address data is
/// kept as-is.
pub(crate) fn typed_records(
    answer: &RawAnswer,
    record_type: RecordType,
    kind: RecordKind,
) -> Vec<TypedRecord> {
    answer
        .records_of(record_type)
        .map(|record| TypedRecord {
            kind,
            name: strip_trailing_dot(&record.name),
            data: match kind {
                RecordKind::A | RecordKind::Aaaa => record.data.clone(),
                RecordKind::Cname | RecordKind::Ptr | RecordKind::Mx => {
                    strip_trailing_dot(&record.data)
                }
            },
            ttl: Some(record.ttl),
            priority: None,
        })
        .collect()
}

/// Normalize user input into a bare, lowercase domain.
///
/// Surrounding whitespace, an `http://` or `https://` prefix, and one trailing
/// `/` are removed.
pub fn normalize_domain(input: &str) -> String {
    let mut domain = input.trim();
    for scheme in ["https://", "http://"] {
        if domain
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        {
            domain = &domain[scheme.len()..];
            break;
        }
    }
    let domain = domain.strip_suffix('/').unwrap_or(domain);
    domain.trim().to_lowercase()
}

/// Runs the nine health checks for a domain.
///
/// ```rust,no_run
/// use dns_health_engine::{AnalyzerConfig, HealthAnalyzer};
/// # async fn demo() -> dns_health_engine::EngineResult<()> {
/// let analyzer = HealthAnalyzer::from_config(&AnalyzerConfig::default())?;
/// let report = analyzer.analyze("https://example.com/").await;
/// println!("{} scored {}", report.domain, report.overall_score);
/// # Ok(())
/// # }
/// ```
pub struct HealthAnalyzer {
    lookup: Arc<dyn Lookup>,
    propagation: Vec<NamedLookup>,
}

impl HealthAnalyzer {
    /// Analyzer backed by a single lookup; propagation compares it only with itself.
    pub fn new(lookup: Arc<dyn Lookup>) -> Self {
        Self {
            lookup,
            propagation: Vec::new(),
        }
    }

    /// Resolvers compared against the primary lookup during the propagation check.
    #[must_use]
    pub fn with_propagation_resolvers(mut self, resolvers: Vec<NamedLookup>) -> Self {
        self.propagation = resolvers;
        self
    }

    pub fn from_config(config: &AnalyzerConfig) -> EngineResult<Self> {
        config.validate()?;
        let lookup = config
            .primary
            .build(config.query_timeout(), &config.user_agent)?;
        let propagation = config.build_propagation()?;
        log::debug!(
            "Analyzer configured with primary resolver {} and {} propagation resolvers",
            config.primary.name,
            propagation.len()
        );
        Ok(Self::new(lookup).with_propagation_resolvers(propagation))
    }

    /// Analyze `input` (normalized first) across every dimension.
    ///
    /// Never fails: each dimension turns its own lookup failures into a
    /// failing or warning result.
    pub async fn analyze(&self, input: &str) -> Report {
        let domain = normalize_domain(input);
        log::info!("Starting DNS health analysis for {domain}");

        let lookup = self.lookup.as_ref();
        let (nameservers, soa, mx, a, aaaa, cname, ptr, propagation, security) = tokio::join!(
            nameserver::check_nameservers(lookup, &domain),
            soa::check_soa(lookup, &domain),
            mx::check_mx(lookup, &domain),
            address::check_a(lookup, &domain),
            address::check_aaaa(lookup, &domain),
            cname::check_cname(lookup, &domain),
            ptr::check_ptr(lookup, &domain),
            propagation::check_propagation(lookup, &self.propagation, &domain),
            security::check_security(lookup, &domain),
        );

        let mut report = Report {
            domain,
            timestamp: Utc::now(),
            overall_score: 0,
            overall_status: overall_status(0),
            nameservers,
            soa,
            mx,
            a,
            aaaa,
            cname,
            ptr,
            propagation,
            security,
        };
        report.overall_score = overall_score(
            report
                .dimensions()
                .map(|(dimension, result)| (dimension, result.score)),
        );
        report.overall_status = overall_status(report.overall_score);

        log::info!(
            "DNS health analysis for {} finished: {} ({})",
            report.domain,
            report.overall_score,
            report.overall_status
        );
        report
    }
}
