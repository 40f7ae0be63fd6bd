//! Email authentication (SPF, DMARC) and DNSSEC deployment.

use crate::resolver::Lookup;
use crate::types::{CheckStatus, DimensionDetails, DimensionResult, RecordType, SecurityDetails};

const SPF_PREFIX: &str = "v=spf1";
const DMARC_PREFIX: &str = "v=DMARC1";

pub async fn check_security(lookup: &dyn Lookup, domain: &str) -> DimensionResult {
    let dmarc_host = format!("_dmarc.{domain}");
    let (spf, dmarc, dnssec) = tokio::join!(
        find_txt_policy(lookup, domain, SPF_PREFIX),
        find_txt_policy(lookup, &dmarc_host, DMARC_PREFIX),
        has_dnssec(lookup, domain),
    );

    let details = SecurityDetails { spf, dmarc, dnssec };
    let present = u32::from(details.spf.is_some())
        + u32::from(details.dmarc.is_some())
        + u32::from(details.dnssec);
    let score = security_score(present);
    let status = if score >= 66 {
        CheckStatus::Pass
    } else if score >= 33 {
        CheckStatus::Warning
    } else {
        CheckStatus::Fail
    };

    let mut recommendations = Vec::new();
    if details.spf.is_none() {
        recommendations.push(
            "Add an SPF record to specify which servers may send mail for your domain".to_string(),
        );
    }
    if details.dmarc.is_none() {
        recommendations
            .push("Publish a DMARC policy at _dmarc to protect against email spoofing".to_string());
    }
    if !details.dnssec {
        recommendations
            .push("Enable DNSSEC to protect against DNS spoofing and cache poisoning".to_string());
    }

    let mut result = DimensionResult::new(
        status,
        format!("{present} of 3 security mechanisms configured"),
        score,
        DimensionDetails::Security(details),
    );
    result.recommendations = recommendations;
    result
}

/// `round(present / 3 * 100)`.
fn security_score(present: u32) -> u32 {
    (present.min(3) * 100 + 1) / 3
}

/// First TXT string on `name` starting with `prefix` (case-insensitive).
///
/// Lookup failures count as "not published".
async fn find_txt_policy(lookup: &dyn Lookup, name: &str, prefix: &str) -> Option<String> {
    let answer = match lookup.lookup(name, RecordType::Txt).await {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("TXT lookup for {name} failed, treating {prefix} as absent: {e}");
            return None;
        }
    };

    let found = answer
        .records_of(RecordType::Txt)
        .map(|r| txt_text(&r.data))
        .find(|text| {
            text.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        });
    found
}

/// A signed zone publishes DNSKEYs; resolvers also return RRSIGs when asked.
async fn has_dnssec(lookup: &dyn Lookup, domain: &str) -> bool {
    match lookup.lookup(domain, RecordType::Dnskey).await {
        Ok(answer) => answer
            .answers
            .iter()
            .any(|r| r.is(RecordType::Dnskey) || r.is(RecordType::Rrsig)),
        Err(e) => {
            log::warn!("DNSKEY lookup for {domain} failed, treating DNSSEC as absent: {e}");
            false
        }
    }
}

/// Join the character-strings of TXT presentation data.
///
/// `"v=spf1 include:a" " -all"` becomes `v=spf1 include:a -all`; unquoted
/// data is returned unchanged.
fn txt_text(data: &str) -> String {
    let data = data.trim();
    if !data.starts_with('"') {
        return data.to_string();
    }

    let mut text = String::with_capacity(data.len());
    let mut in_quotes = false;
    let mut chars = data.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    text.push(escaped);
                }
            }
            _ if in_quotes => text.push(c),
            _ => {}
        }
    }
    text
}
