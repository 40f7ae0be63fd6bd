//! Analyzer configuration.
//!
//! Every field has a default, so an empty TOML document is a valid configuration.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::resolver::{DohClient, Lookup, NamedLookup, SystemLookup, TimeoutLookup};

/// Per-query deadline in seconds.
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// How a resolver is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum Transport {
    /// DNS-over-HTTPS JSON endpoint.
    Doh { url: String },
    /// Plain DNS to one nameserver.
    Udp { address: IpAddr },
    /// Host resolver configuration.
    System,
}

/// A named resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverEndpoint {
    pub name: String,
    #[serde(flatten)]
    pub transport: Transport,
}

impl ResolverEndpoint {
    pub fn doh(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            transport: Transport::Doh {
                url: url.to_string(),
            },
        }
    }

    pub fn udp(name: &str, address: IpAddr) -> Self {
        Self {
            name: name.to_string(),
            transport: Transport::Udp { address },
        }
    }

    /// Build the transport, bounded by `timeout`.
    pub fn build(&self, timeout: Duration, user_agent: &str) -> EngineResult<Arc<dyn Lookup>> {
        let lookup: Arc<dyn Lookup> = match &self.transport {
            Transport::Doh { url } => {
                let client = DohClient::new(url, timeout, user_agent).map_err(|e| {
                    EngineError::Config(format!("Cannot build resolver {}: {e}", self.name))
                })?;
                Arc::new(TimeoutLookup::new(client, timeout))
            }
            Transport::Udp { address } => Arc::new(TimeoutLookup::new(
                SystemLookup::with_nameserver(*address),
                timeout,
            )),
            Transport::System => Arc::new(TimeoutLookup::new(SystemLookup::system(), timeout)),
        };
        Ok(lookup)
    }
}

/// Settings for [`HealthAnalyzer::from_config`](crate::HealthAnalyzer::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Deadline applied to every individual query.
    pub query_timeout_secs: u64,
    /// `User-Agent` sent to DNS-over-HTTPS endpoints.
    pub user_agent: String,
    /// Resolver used by all evaluators.
    pub primary: ResolverEndpoint,
    /// Additional resolvers compared during the propagation check.
    pub propagation: Vec<ResolverEndpoint>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            user_agent: format!("dns-health/{}", env!("CARGO_PKG_VERSION")),
            primary: ResolverEndpoint::doh("Google", "https://dns.google/resolve"),
            propagation: vec![
                ResolverEndpoint::doh("Google", "https://dns.google/resolve"),
                ResolverEndpoint::doh("Cloudflare", "https://cloudflare-dns.com/dns-query"),
                ResolverEndpoint::doh("Quad9", "https://dns.quad9.net:5053/dns-query"),
                ResolverEndpoint::udp("OpenDNS", IpAddr::from([208, 67, 222, 222])),
            ],
        }
    }
}

impl AnalyzerConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml(text: &str) -> EngineResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EngineError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.query_timeout_secs == 0 {
            return Err(EngineError::Config(
                "query_timeout_secs must be greater than 0".to_string(),
            ));
        }
        for endpoint in std::iter::once(&self.primary).chain(&self.propagation) {
            if endpoint.name.trim().is_empty() {
                return Err(EngineError::Config("Resolver name is required".to_string()));
            }
            if let Transport::Doh { url } = &endpoint.transport {
                url::Url::parse(url).map_err(|e| {
                    EngineError::Config(format!("Invalid URL for resolver {}: {e}", endpoint.name))
                })?;
            }
        }
        Ok(())
    }

    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Build the propagation resolvers.
    pub(crate) fn build_propagation(&self) -> EngineResult<Vec<NamedLookup>> {
        self.propagation
            .iter()
            .map(|endpoint| {
                endpoint
                    .build(self.query_timeout(), &self.user_agent)
                    .map(|lookup| NamedLookup::new(endpoint.name.clone(), lookup))
            })
            .collect()
    }
}
