//! Lookup backed by hickory-resolver, querying over plain DNS (port 53).

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::rr::RecordType as WireRecordType,
};

use crate::error::ResolverError;
use crate::types::{RawAnswer, RawRecord, RecordType};

use super::Lookup;

/// Resolver that talks classic DNS, either through the host configuration or
/// directly to one nameserver.
pub struct SystemLookup {
    resolver: TokioResolver,
    label: String,
}

impl SystemLookup {
    /// Use the host system DNS configuration (e.g. `/etc/resolv.conf`).
    ///
    /// Falls back to Hickory's default upstream set when the system
    /// configuration cannot be loaded.
    pub fn system() -> Self {
        Self {
            resolver: build_system_resolver(),
            label: "system".to_string(),
        }
    }

    /// Send every query to `ip` on port 53 (UDP, TCP fallback).
    pub fn with_nameserver(ip: IpAddr) -> Self {
        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[ip], 53, true),
        );
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(ResolverOpts::default())
            .build();
        Self {
            resolver,
            label: ip.to_string(),
        }
    }

    /// Nameserver description used in log lines.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl Lookup for SystemLookup {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        log::debug!("[dns:{}] {record_type} {name}", self.label);

        match self
            .resolver
            .lookup(name, WireRecordType::from(record_type.code()))
            .await
        {
            Ok(response) => Ok(RawAnswer::new(
                response
                    .record_iter()
                    .map(|record| RawRecord {
                        name: record.name().to_string(),
                        record_type: u16::from(record.record_type()),
                        data: record.data().to_string(),
                        ttl: record.ttl(),
                    })
                    .collect(),
            )),
            Err(e) if e.is_no_records_found() || e.is_nx_domain() => Ok(RawAnswer::default()),
            Err(e) => Err(ResolverError::Network(e.to_string())),
        }
    }
}

fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(builder) => return builder.build(),
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    TokioResolver::builder_with_config(ResolverConfig::default(), TokioConnectionProvider::default())
        .with_options(ResolverOpts::default())
        .build()
}
