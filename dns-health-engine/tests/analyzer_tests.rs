//! End-to-end analysis against a scripted zone.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dns_health_engine::{
    CheckStatus, DimensionDetails, HealthAnalyzer, Lookup, NamedLookup, OverallStatus,
    RawAnswer, RawRecord, RecordType, ResolverError,
};

/// Answers from a fixed table; unknown queries get zero answers.
#[derive(Default)]
struct Zone {
    records: HashMap<(String, RecordType), Vec<RawRecord>>,
    failures: HashMap<(String, RecordType), ResolverError>,
}

impl Zone {
    fn add(mut self, name: &str, record_type: RecordType, data: &str) -> Self {
        self.records
            .entry((name.to_string(), record_type))
            .or_default()
            .push(RawRecord::new(format!("{name}."), record_type, data, 300));
        self
    }

    fn fail(mut self, name: &str, record_type: RecordType) -> Self {
        self.failures.insert(
            (name.to_string(), record_type),
            ResolverError::Network("connection refused".to_string()),
        );
        self
    }
}

#[async_trait]
impl Lookup for Zone {
    async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<RawAnswer, ResolverError> {
        let key = (name.to_string(), record_type);
        if let Some(error) = self.failures.get(&key) {
            return Err(error.clone());
        }
        Ok(RawAnswer::new(
            self.records.get(&key).cloned().unwrap_or_default(),
        ))
    }
}

/// A domain that does everything right.
fn healthy_zone() -> Zone {
    Zone::default()
        .add("example.com", RecordType::Ns, "ns1.example.net.")
        .add("example.com", RecordType::Ns, "ns2.example.net.")
        .add("ns1.example.net", RecordType::A, "192.0.2.53")
        .add("ns2.example.net", RecordType::A, "198.51.100.53")
        .add(
            "example.com",
            RecordType::Soa,
            "ns1.example.net. hostmaster.example.com. 2026101801 7200 3600 1209600 300",
        )
        .add("example.com", RecordType::Mx, "10 mail.example.com.")
        .add("example.com", RecordType::A, "93.184.216.34")
        .add("example.com", RecordType::Aaaa, "2606:2800:220:1::")
        .add("www.example.com", RecordType::Cname, "example.com.")
        .add("34.216.184.93.in-addr.arpa", RecordType::Ptr, "example.com.")
        .add("example.com", RecordType::Txt, "\"v=spf1 mx -all\"")
        .add("_dmarc.example.com", RecordType::Txt, "\"v=DMARC1; p=reject\"")
        .add("example.com", RecordType::Dnskey, "257 3 13 abcdef==")
}

#[tokio::test]
async fn test_healthy_domain_is_excellent() {
    let analyzer = HealthAnalyzer::new(Arc::new(healthy_zone()));
    let report = analyzer.analyze("https://Example.com/").await;

    assert_eq!(report.domain, "example.com");
    for (dimension, result) in report.dimensions() {
        assert_eq!(result.status, CheckStatus::Pass, "{dimension:?}: {}", result.message);
        assert_eq!(result.score, 100, "{dimension:?}");
    }
    assert_eq!(report.overall_score, 100);
    assert_eq!(report.overall_status, OverallStatus::Excellent);
}

#[tokio::test]
async fn test_unreachable_resolver_is_critical_but_complete() {
    let zone = ["example.com", "www.example.com", "_dmarc.example.com"]
        .into_iter()
        .fold(Zone::default(), |zone, name| {
            [
                RecordType::Ns,
                RecordType::Soa,
                RecordType::Mx,
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Txt,
                RecordType::Dnskey,
            ]
            .into_iter()
            .fold(zone, |zone, record_type| zone.fail(name, record_type))
        });

    let report = HealthAnalyzer::new(Arc::new(zone)).analyze("example.com").await;

    assert_eq!(report.nameservers.status, CheckStatus::Fail);
    assert_eq!(report.soa.score, 0);
    assert_eq!(report.mx.status, CheckStatus::Fail);
    assert_eq!(report.a.status, CheckStatus::Fail);
    assert_eq!(report.aaaa.score, 75);
    assert_eq!(report.cname.score, 100);
    assert_eq!(report.ptr.score, 75);
    assert_eq!(report.propagation.score, 60);
    assert_eq!(report.security.score, 0);
    // 0.05*75 + 0.05*100 + 0.10*75 + 0.10*60 = 22.25
    assert_eq!(report.overall_score, 22);
    assert_eq!(report.overall_status, OverallStatus::Critical);
}

#[tokio::test]
async fn test_repeated_analysis_is_stable() {
    let analyzer = HealthAnalyzer::new(Arc::new(healthy_zone()));
    let first = analyzer.analyze("example.com").await;
    let second = analyzer.analyze("example.com").await;

    for ((_, a), (_, b)) in first.dimensions().into_iter().zip(second.dimensions()) {
        if let (DimensionDetails::Nameservers(x), DimensionDetails::Nameservers(y)) =
            (&a.details, &b.details)
        {
            // response times differ between runs
            assert_eq!(x.len(), y.len());
            continue;
        }
        if let DimensionDetails::Propagation(_) = a.details {
            assert_eq!(a.score, b.score);
            continue;
        }
        assert_eq!(a, b);
    }
    assert_eq!(first.overall_score, second.overall_score);
}

#[tokio::test]
async fn test_propagation_disagreement_lowers_score() {
    let stale = Zone::default().add("example.com", RecordType::A, "203.0.113.7");
    let analyzer = HealthAnalyzer::new(Arc::new(healthy_zone()))
        .with_propagation_resolvers(vec![NamedLookup::new("stale", Arc::new(stale))]);

    let report = analyzer.analyze("example.com").await;

    assert_eq!(report.propagation.status, CheckStatus::Warning);
    assert_eq!(report.propagation.score, 60);
    // 100 - 0.10 * 40
    assert_eq!(report.overall_score, 96);
}

#[tokio::test]
async fn test_report_json_shape() {
    let report = HealthAnalyzer::new(Arc::new(healthy_zone()))
        .analyze("example.com")
        .await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["domain"], "example.com");
    assert_eq!(json["overallStatus"], "excellent");
    assert!(json["timestamp"].is_string());
    assert_eq!(json["soa"]["soa"]["primaryNS"], "ns1.example.net");
    assert_eq!(json["soa"]["soa"]["adminEmail"], "hostmaster@example.com");
    assert_eq!(json["mx"]["records"][0]["type"], "MX");
    assert_eq!(json["mx"]["records"][0]["data"], "mail.example.com");
    assert_eq!(json["nameservers"]["nameservers"][0]["status"], "pass");
    assert_eq!(json["security"]["security"]["dnssec"], true);
    assert!(json["a"].get("recommendations").is_none());
}
