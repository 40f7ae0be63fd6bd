//! Public types consumed and produced by the health engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DNS record type understood by the lookup capability.
///
/// Numeric codes follow the IANA DNS parameters registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// Name server record.
    Ns,
    /// Canonical name (alias) record.
    Cname,
    /// Start of authority record.
    Soa,
    /// Pointer record (reverse DNS).
    Ptr,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// IPv6 address record.
    Aaaa,
    /// DNSSEC signature record.
    Rrsig,
    /// DNSSEC public key record.
    Dnskey,
}

impl RecordType {
    /// Wire type code.
    pub const fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Soa => 6,
            Self::Ptr => 12,
            Self::Mx => 15,
            Self::Txt => 16,
            Self::Aaaa => 28,
            Self::Rrsig => 46,
            Self::Dnskey => 48,
        }
    }

    /// Map a wire type code back to a known record type.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::A),
            2 => Some(Self::Ns),
            5 => Some(Self::Cname),
            6 => Some(Self::Soa),
            12 => Some(Self::Ptr),
            15 => Some(Self::Mx),
            16 => Some(Self::Txt),
            28 => Some(Self::Aaaa),
            46 => Some(Self::Rrsig),
            48 => Some(Self::Dnskey),
            _ => None,
        }
    }

    /// Upper-case mnemonic, as used in DNS presentation format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Ns => "NS",
            Self::Cname => "CNAME",
            Self::Soa => "SOA",
            Self::Ptr => "PTR",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Aaaa => "AAAA",
            Self::Rrsig => "RRSIG",
            Self::Dnskey => "DNSKEY",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::Ns),
            "CNAME" => Ok(Self::Cname),
            "SOA" => Ok(Self::Soa),
            "PTR" => Ok(Self::Ptr),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "AAAA" => Ok(Self::Aaaa),
            "RRSIG" => Ok(Self::Rrsig),
            "DNSKEY" => Ok(Self::Dnskey),
            _ => Err(format!("Unsupported DNS record type: {s}")),
        }
    }
}

/// A single record as returned by the resolver, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Owner name (may carry a trailing dot).
    pub name: String,
    /// Numeric DNS type code.
    #[serde(rename = "type")]
    pub record_type: u16,
    /// Record data in presentation format.
    pub data: String,
    /// Time-to-live in seconds.
    pub ttl: u32,
}

impl RawRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        data: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.code(),
            data: data.into(),
            ttl,
        }
    }

    /// Whether this record is of the given type.
    pub fn is(&self, record_type: RecordType) -> bool {
        self.record_type == record_type.code()
    }
}

/// Resolver response envelope.
///
/// An empty `answers` list means the query succeeded without data
/// (NODATA or NXDOMAIN); failures are reported as [`ResolverError`](crate::ResolverError).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub answers: Vec<RawRecord>,
}

impl RawAnswer {
    pub fn new(answers: Vec<RawRecord>) -> Self {
        Self { answers }
    }

    /// Records of one type, skipping e.g. CNAME chain entries or signatures.
    pub fn records_of(&self, record_type: RecordType) -> impl Iterator<Item = &RawRecord> {
        self.answers.iter().filter(move |r| r.is(record_type))
    }
}

/// Semantic kind of a [`TypedRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Ptr,
    Mx,
}

/// A normalized record attached to a dimension result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedRecord {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Owner name, trailing dot removed.
    pub name: String,
    /// Address, target host name, or mail exchange.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// MX preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

/// Start of Authority fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaData {
    #[serde(rename = "primaryNS")]
    pub primary_ns: String,
    pub admin_email: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Status tier of a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warning => write!(f, "warning"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Coarse status label of a whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Liveness of one nameserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameserverProbe {
    /// Nameserver host name, trailing dot removed.
    pub name: String,
    pub status: CheckStatus,
    /// Probe round-trip time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query status of one propagation resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationStatus {
    Success,
    Timeout,
    Error,
}

/// Answer observed through one resolver during the propagation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationServerResult {
    /// Resolver display name.
    pub resolver: String,
    pub status: PropagationStatus,
    /// Sorted answer values.
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub response_time_ms: u64,
}

/// Propagation dimension payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationDetails {
    /// Share of successful resolvers agreeing with the majority answer (0-100).
    pub consistency_percentage: f32,
    pub servers: Vec<PropagationServerResult>,
    /// Distinct answer sets observed.
    pub unique_values: Vec<String>,
}

/// Security dimension payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityDetails {
    /// SPF policy text, if published.
    pub spf: Option<String>,
    /// DMARC policy text, if published.
    pub dmarc: Option<String>,
    pub dnssec: bool,
}

/// Dimension-specific payload of a [`DimensionResult`].
///
/// Flattened into the result on serialization, keyed by variant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionDetails {
    Nameservers(Vec<NameserverProbe>),
    Soa(Option<SoaData>),
    Records(Vec<TypedRecord>),
    Propagation(PropagationDetails),
    Security(SecurityDetails),
}

/// Uniform result shape of every evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionResult {
    pub status: CheckStatus,
    pub message: String,
    /// Always within `0..=100`.
    pub score: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub details: DimensionDetails,
}

impl DimensionResult {
    /// Build a result, clamping `score` to 100.
    pub fn new(
        status: CheckStatus,
        message: impl Into<String>,
        score: u32,
        details: DimensionDetails,
    ) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = format!("Check finished with status {status}");
        }
        Self {
            status,
            message,
            score: u8::try_from(score.min(100)).unwrap_or(100),
            recommendations: Vec::new(),
            details,
        }
    }

    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }

    /// Records carried by address/alias/mail results; empty for other payloads.
    pub fn records(&self) -> &[TypedRecord] {
        match &self.details {
            DimensionDetails::Records(records) => records,
            _ => &[],
        }
    }
}

/// The nine facets of DNS health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Nameservers,
    Soa,
    Mx,
    A,
    Aaaa,
    Cname,
    Ptr,
    Propagation,
    Security,
}

impl Dimension {
    pub const ALL: [Self; 9] = [
        Self::Nameservers,
        Self::Soa,
        Self::Mx,
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Ptr,
        Self::Propagation,
        Self::Security,
    ];
}

/// Final artifact of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Normalized domain that was analyzed.
    pub domain: String,
    pub timestamp: DateTime<Utc>,
    pub overall_score: u8,
    pub overall_status: OverallStatus,
    pub nameservers: DimensionResult,
    pub soa: DimensionResult,
    pub mx: DimensionResult,
    pub a: DimensionResult,
    pub aaaa: DimensionResult,
    pub cname: DimensionResult,
    pub ptr: DimensionResult,
    pub propagation: DimensionResult,
    pub security: DimensionResult,
}

impl Report {
    /// Every dimension result paired with its label, in report order.
    pub fn dimensions(&self) -> [(Dimension, &DimensionResult); 9] {
        [
            (Dimension::Nameservers, &self.nameservers),
            (Dimension::Soa, &self.soa),
            (Dimension::Mx, &self.mx),
            (Dimension::A, &self.a),
            (Dimension::Aaaa, &self.aaaa),
            (Dimension::Cname, &self.cname),
            (Dimension::Ptr, &self.ptr),
            (Dimension::Propagation, &self.propagation),
            (Dimension::Security, &self.security),
        ]
    }
}
