//! DNS-over-HTTPS client speaking the JSON API (`application/dns-json`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use crate::error::ResolverError;
use crate::types::{RawAnswer, RawRecord, RecordType};

use super::Lookup;

const DNS_JSON: &str = "application/dns-json";

/// Maximum number of characters of a response body written to the log.
const LOG_BODY_LIMIT: usize = 256;

/// DNS rcodes treated as a settled answer. NXDOMAIN simply yields no records.
const RCODE_NOERROR: u16 = 0;
const RCODE_NXDOMAIN: u16 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DohResponse {
    status: u16,
    #[serde(default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    name: String,
    #[serde(rename = "type")]
    record_type: u16,
    #[serde(rename = "TTL", default)]
    ttl: u32,
    data: String,
}

/// Resolver client for a DNS-over-HTTPS JSON endpoint such as
/// `https://dns.google/resolve` or `https://cloudflare-dns.com/dns-query`.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DohClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl DohClient {
    /// Create a client for `endpoint`.
    ///
    /// `timeout` bounds each HTTP exchange at the transport level.
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ResolverError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ResolverError::Parse(format!("Invalid resolver URL {endpoint}: {e}")))?;
        if !matches!(endpoint.scheme(), "https" | "http") {
            return Err(ResolverError::Parse(format!(
                "Unsupported resolver URL scheme: {}",
                endpoint.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ResolverError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl Lookup for DohClient {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, DNS_JSON)
            .query(&[("name", name), ("type", record_type.as_str())]);
        // Signatures are only returned when the DO bit is requested.
        if matches!(record_type, RecordType::Dnskey | RecordType::Rrsig) {
            request = request.query(&[("do", "1")]);
        }

        log::debug!("[doh] GET {} name={name} type={record_type}", self.endpoint);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ResolverError::Timeout(e.to_string())
            } else {
                ResolverError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        log::debug!("[doh] {record_type} {name}: HTTP {}", status.as_u16());
        if !status.is_success() {
            return Err(ResolverError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolverError::Network(format!("Failed to read response body: {e}")))?;

        parse_response(&body)
    }
}

/// Decode a JSON API body into a [`RawAnswer`].
fn parse_response(body: &str) -> Result<RawAnswer, ResolverError> {
    let response: DohResponse = serde_json::from_str(body).map_err(|e| {
        log::error!("[doh] JSON parse failed: {e}; body: {}", truncate_for_log(body));
        ResolverError::Parse(e.to_string())
    })?;

    match response.status {
        RCODE_NOERROR | RCODE_NXDOMAIN => Ok(RawAnswer::new(
            response
                .answer
                .into_iter()
                .map(|a| RawRecord {
                    name: a.name,
                    record_type: a.record_type,
                    data: a.data,
                    ttl: a.ttl,
                })
                .collect(),
        )),
        rcode => Err(ResolverError::ResponseCode(rcode)),
    }
}

fn truncate_for_log(s: &str) -> String {
    if s.len() <= LOG_BODY_LIMIT {
        return s.to_string();
    }
    let mut end = LOG_BODY_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
