//! DNS health analysis engine.
//!
//! Scores a domain across nine dimensions (nameservers, SOA, MX, A, AAAA, CNAME,
//! PTR, propagation, security) and aggregates them into a weighted [`Report`].
//! All DNS traffic goes through the [`Lookup`] trait, backed by DNS-over-HTTPS
//! or the host resolver.

mod config;
mod error;
mod resolver;
mod services;
#[cfg(test)]
mod test_utils;
mod types;

pub use config::{AnalyzerConfig, ResolverEndpoint, Transport};
pub use error::{EngineError, EngineResult, ResolverError};
pub use resolver::{DohClient, Lookup, NamedLookup, SystemLookup, TimeoutLookup};
pub use services::{
    normalize_domain, overall_score, overall_status, parse_soa, reverse_name, weight,
    HealthAnalyzer,
};
pub use types::{
    CheckStatus, Dimension, DimensionDetails, DimensionResult, NameserverProbe, OverallStatus,
    PropagationDetails, PropagationServerResult, PropagationStatus, RawAnswer, RawRecord,
    RecordKind, RecordType, Report, SecurityDetails, SoaData, TypedRecord,
};
