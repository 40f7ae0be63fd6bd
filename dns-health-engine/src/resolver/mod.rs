//! Lookup capability consumed by every evaluator, plus its transports.
//!
//! Evaluators only ever see [`Lookup`]; which transport backs it (DNS-over-HTTPS,
//! the host resolver, a scripted mock) is decided when the analyzer is built.

mod doh;
mod system;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::error::ResolverError;
use crate::types::{RawAnswer, RecordType};

pub use doh::DohClient;
pub use system::SystemLookup;

/// Performs a single DNS query.
///
/// Implementations must be safe for concurrent use: every call is an
/// independent request/response. No retries happen behind this trait.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Query `name` for `record_type`.
    ///
    /// Zero answers is a success; `Err` is reserved for transport failures and
    /// non-success responses.
    async fn lookup(&self, name: &str, record_type: RecordType)
        -> Result<RawAnswer, ResolverError>;
}

#[async_trait]
impl<L: Lookup + ?Sized> Lookup for Arc<L> {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        (**self).lookup(name, record_type).await
    }
}

/// A lookup with a display name, used where answers from several resolvers
/// are compared.
#[derive(Clone)]
pub struct NamedLookup {
    pub name: String,
    pub lookup: Arc<dyn Lookup>,
}

impl NamedLookup {
    pub fn new(name: impl Into<String>, lookup: Arc<dyn Lookup>) -> Self {
        Self {
            name: name.into(),
            lookup,
        }
    }
}

impl std::fmt::Debug for NamedLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedLookup").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Bounds every query of the wrapped lookup by a fixed deadline.
///
/// Expiry surfaces as [`ResolverError::Timeout`], so evaluators treat a hanging
/// query like any other failed one.
pub struct TimeoutLookup<L> {
    inner: L,
    deadline: Duration,
}

impl<L: Lookup> TimeoutLookup<L> {
    pub const fn new(inner: L, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<L: Lookup> Lookup for TimeoutLookup<L> {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        match timeout(self.deadline, self.inner.lookup(name, record_type)).await {
            Ok(result) => result,
            Err(_) => {
                log::debug!("{record_type} lookup for {name} exceeded {:?}", self.deadline);
                Err(ResolverError::Timeout(format!(
                    "{record_type} {name} after {}ms",
                    self.deadline.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::MockLookup;
    use crate::types::RawRecord;

    struct NeverAnswers;

    #[async_trait]
    impl Lookup for NeverAnswers {
        async fn lookup(
            &self,
            _name: &str,
            _record_type: RecordType,
        ) -> Result<RawAnswer, ResolverError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_timeout_lookup_expires() {
        let lookup = TimeoutLookup::new(NeverAnswers, Duration::from_millis(20));
        let result = lookup.lookup("example.com", RecordType::A).await;
        assert!(matches!(result, Err(ResolverError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_timeout_lookup_passes_through_answers() {
        let mock = MockLookup::new().with_answer(
            "example.com",
            RecordType::A,
            vec![RawRecord::new("example.com.", RecordType::A, "1.2.3.4", 300)],
        );
        let lookup = TimeoutLookup::new(mock, Duration::from_secs(5));
        let answer = lookup.lookup("example.com", RecordType::A).await.unwrap();
        assert_eq!(answer.answers.len(), 1);
    }

    #[tokio::test]
    async fn test_arc_lookup_delegates() {
        let mock: Arc<dyn Lookup> = Arc::new(
            MockLookup::new().with_error(
                "example.com",
                RecordType::Mx,
                ResolverError::HttpStatus(500),
            ),
        );
        let result = mock.lookup("example.com", RecordType::Mx).await;
        assert_eq!(result, Err(ResolverError::HttpStatus(500)));
    }
}
