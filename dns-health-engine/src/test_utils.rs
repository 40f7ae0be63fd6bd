//! Test helpers: a scripted [`Lookup`] and record factories.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ResolverError;
use crate::resolver::Lookup;
use crate::types::{RawAnswer, RawRecord, RecordType};

/// Lookup returning canned answers per `(name, type)`.
///
/// Unscripted queries succeed with zero answers. Every query is recorded.
#[derive(Default)]
pub struct MockLookup {
    responses: HashMap<(String, RecordType), Result<RawAnswer, ResolverError>>,
    queries: Mutex<Vec<(String, RecordType)>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(
        mut self,
        name: &str,
        record_type: RecordType,
        records: Vec<RawRecord>,
    ) -> Self {
        self.responses
            .insert((name.to_string(), record_type), Ok(RawAnswer::new(records)));
        self
    }

    pub fn with_error(
        mut self,
        name: &str,
        record_type: RecordType,
        error: ResolverError,
    ) -> Self {
        self.responses
            .insert((name.to_string(), record_type), Err(error));
        self
    }

    /// Queries issued so far, in order.
    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Lookup for MockLookup {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((name.to_string(), record_type));
        }
        self.responses
            .get(&(name.to_string(), record_type))
            .cloned()
            .unwrap_or_else(|| Ok(RawAnswer::default()))
    }
}

pub fn a_record(name: &str, ip: &str) -> RawRecord {
    RawRecord::new(format!("{name}."), RecordType::A, ip, 300)
}

pub fn ns_record(zone: &str, host: &str) -> RawRecord {
    RawRecord::new(format!("{zone}."), RecordType::Ns, format!("{host}."), 86400)
}

pub fn network_error() -> ResolverError {
    ResolverError::Network("connection refused".to_string())
}
