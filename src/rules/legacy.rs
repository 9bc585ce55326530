//! Conversion of legacy flag-encoded rules (`-P 6 -p 22-22 -s 0.0.0.0/0`).

use super::protocol::protocol_name;
use crate::error::{GniError, Result};
use crate::models::{PROTOCOL_ICMP, PROTOCOL_TCP, PROTOCOL_UDP};

/// Source CIDR meaning "anywhere", left implicit in match expressions.
pub const ANY_CIDR: &str = "0.0.0.0/0";

/// The fields of a legacy rule string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyRule {
    pub protocol: Option<i32>,
    /// `start` or `start:end`.
    pub port_range: String,
    pub source_cidr: String,
    pub icmp_any: bool,
    pub source_group: String,
    pub source_owner: String,
}

/// Collapse `a-b` to `a` when both ends match, otherwise `a:b`.
fn normalize_port_range(range: &str) -> String {
    match range.split_once('-') {
        Some((min, max)) if min == max => min.to_string(),
        Some((min, max)) => format!("{min}:{max}"),
        None => range.to_string(),
    }
}

impl LegacyRule {
    /// Tokenize the first line of `rule`. Unknown flags are skipped.
    ///
    /// # Returns
    /// * `Err(GniError::ConversionFailure)` - If the protocol is not a number
    pub fn parse(rule: &str) -> Result<LegacyRule> {
        let line = rule.lines().next().unwrap_or_default();
        let mut parsed = LegacyRule::default();
        let mut tokens = line.split_whitespace();

        while let Some(flag) = tokens.next() {
            let value = match flag {
                "-P" | "-p" | "-s" | "-t" | "-o" | "-u" => tokens.next(),
                _ => continue,
            };
            let Some(value) = value else {
                break;
            };
            match flag {
                "-P" => {
                    let number = value.parse::<i32>().map_err(|_| {
                        GniError::conversion(format!("protocol '{value}' is not a number"))
                    })?;
                    parsed.protocol = Some(number);
                }
                "-p" => parsed.port_range = normalize_port_range(value),
                "-s" => {
                    parsed.source_cidr = if value == ANY_CIDR {
                        String::new()
                    } else {
                        value.to_string()
                    }
                }
                "-t" => parsed.icmp_any = true,
                "-o" => parsed.source_group = value.to_string(),
                "-u" => parsed.source_owner = value.to_string(),
                _ => {}
            }
        }
        Ok(parsed)
    }

    /// Render the packet-filter match expression.
    pub fn to_match(&self) -> Result<String> {
        let protocol = self.protocol.ok_or_else(|| {
            GniError::conversion("not enough information in source rule: no protocol")
        })?;
        let name = match protocol {
            PROTOCOL_ICMP | PROTOCOL_TCP | PROTOCOL_UDP => protocol_name(protocol),
            _ => None,
        }
        .ok_or_else(|| {
            GniError::conversion(format!("unsupported protocol {protocol} in legacy rule"))
        })?;

        let is_port_proto = protocol == PROTOCOL_TCP || protocol == PROTOCOL_UDP;
        let mut out = if is_port_proto {
            format!("-p {name} -m {name} ")
        } else {
            format!("-p {name} ")
        };
        if !self.source_cidr.is_empty() {
            out.push_str(&format!("-s {} ", self.source_cidr));
        }
        if is_port_proto && !self.port_range.is_empty() {
            out.push_str(&format!("--dport {} ", self.port_range));
        }
        if protocol == PROTOCOL_ICMP && self.icmp_any {
            out.push_str("--icmp-type any ");
        }
        Ok(out.trim_end().to_string())
    }
}

/// Convert a legacy rule string to a match expression.
///
/// # Arguments
/// * `rule` - Whitespace separated flag/value pairs
///
/// # Returns
/// * `Ok(String)` - The match expression
/// * `Err(GniError::ConversionFailure)` - Missing or unsupported protocol
pub fn convert_legacy_rule(rule: &str) -> Result<String> {
    let converted = LegacyRule::parse(rule).and_then(|r| r.to_match());
    match &converted {
        Ok(m) => log::trace!("legacy rule '{rule}' -> '{m}'"),
        Err(e) => log::warn!("skipping legacy rule '{rule}': {e}"),
    }
    converted
}
