//! Error types for the health engine.

use serde::Serialize;
use thiserror::Error;

/// Failure of a single resolver query.
///
/// This is the only error kind that crosses the [`Lookup`](crate::Lookup) boundary.
/// A query that succeeds with zero answers is *not* an error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ResolverError {
    /// Transport failure (connection refused, TLS failure, socket error, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The query did not settle before its deadline.
    #[error("Query timeout: {0}")]
    Timeout(String),

    /// The resolver endpoint answered with a non-success HTTP status.
    #[error("Resolver returned HTTP {0}")]
    HttpStatus(u16),

    /// The resolver answered with a DNS response code other than NOERROR/NXDOMAIN.
    #[error("Resolver returned DNS response code {0}")]
    ResponseCode(u16),

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors raised while building an analyzer.
///
/// Running an analysis never fails; only construction does.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum EngineError {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A resolver transport could not be created.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Engine `Result` alias.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
