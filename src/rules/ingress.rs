//! Compile structured ingress rules into packet-filter match expressions.

use super::legacy::ANY_CIDR;
use super::protocol::{is_valid_protocol_number, protocol_name};
use crate::config::{MARK_EDGE_SNAT, MARK_MANAGED_SNAT};
use crate::error::{GniError, Result};
use crate::models::{Rule, PROTOCOL_ALL, PROTOCOL_ICMP, PROTOCOL_TCP, PROTOCOL_UDP};

/// Extra match condition appended to a compiled rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFlag {
    None,
    /// Accept only packets that would not be source-NAT'd in EDGE mode.
    ExcludeMarkA,
    /// Accept only packets that would be source-NAT'd in MANAGED modes.
    RequireMarkB,
    /// Accept only packets that would not be source-NAT'd in MANAGED modes.
    ExcludeMarkB,
    /// Unrecognized flag value, ignored when compiling.
    Unknown(i32),
}

impl RuleFlag {
    /// Map the numeric flag used by callers (0, 1, 2, 4).
    pub fn from_code(code: i32) -> RuleFlag {
        match code {
            0 => RuleFlag::None,
            1 => RuleFlag::ExcludeMarkA,
            2 => RuleFlag::RequireMarkB,
            4 => RuleFlag::ExcludeMarkB,
            other => RuleFlag::Unknown(other),
        }
    }

    fn clause(&self) -> Option<String> {
        match self {
            RuleFlag::None => None,
            RuleFlag::ExcludeMarkA => Some(format!("-m mark ! --mark {MARK_EDGE_SNAT}")),
            RuleFlag::RequireMarkB => Some(format!("-m mark --mark {MARK_MANAGED_SNAT}")),
            RuleFlag::ExcludeMarkB => Some(format!("-m mark ! --mark {MARK_MANAGED_SNAT}")),
            RuleFlag::Unknown(code) => {
                log::info!("Call with invalid flags: {code} - ignored.");
                None
            }
        }
    }
}

fn protocol_clause(rule: &Rule) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    match rule.protocol {
        PROTOCOL_ALL => {}
        PROTOCOL_ICMP => {
            parts.push("-p icmp -m icmp".to_string());
            if rule.icmp_type == -1 {
                parts.push("--icmp-type any".to_string());
            } else if rule.icmp_code == -1 {
                parts.push(format!("--icmp-type {}", rule.icmp_type));
            } else {
                parts.push(format!("--icmp-type {}/{}", rule.icmp_type, rule.icmp_code));
            }
        }
        PROTOCOL_TCP | PROTOCOL_UDP => {
            let name = protocol_name(rule.protocol).unwrap_or("tcp");
            parts.push(format!("-p {name} -m {name}"));
            if rule.from_port != 0 {
                if rule.to_port != 0 && rule.to_port > rule.from_port {
                    parts.push(format!("--dport {}:{}", rule.from_port, rule.to_port));
                } else {
                    parts.push(format!("--dport {}", rule.from_port));
                }
            }
        }
        other if is_valid_protocol_number(other) => parts.push(format!("-p {other}")),
        other => {
            return Err(GniError::conversion(format!(
                "invalid protocol ({other}) - cannot create rule"
            )))
        }
    }
    Ok(parts)
}

/// Compile an ingress rule.
///
/// # Arguments
/// * `source_cidr` - Source match that replaces the rule's own CIDR when present
/// * `rule` - The ingress rule
/// * `flag` - Optional mark condition
///
/// # Returns
/// * `Ok(String)` - Match expression such as `-s 10.0.0.0/24 -p tcp -m tcp --dport 22`
/// * `Err(GniError::ConversionFailure)` - The protocol cannot be expressed
pub fn compile_ingress_rule(source_cidr: Option<&str>, rule: &Rule, flag: RuleFlag) -> Result<String> {
    let mut parts = Vec::new();

    let source = source_cidr.unwrap_or(rule.cidr.as_str()).trim();
    if !source.is_empty() && source != ANY_CIDR {
        parts.push(format!("-s {source}"));
    }
    parts.extend(protocol_clause(rule)?);
    if let Some(clause) = flag.clause() {
        parts.push(clause);
    }

    let compiled = parts.join(" ");
    log::trace!("compiled ingress rule {rule:?} -> '{compiled}'");
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn rule(protocol: i32, from_port: i32, to_port: i32, icmp_type: i32, icmp_code: i32) -> Rule {
        Rule {
            protocol,
            from_port,
            to_port,
            icmp_type,
            icmp_code,
            ..Default::default()
        }
    }

    #[test_case(rule(6, 80, 80, 0, 0), "-p tcp -m tcp --dport 80" ; "single port")]
    #[test_case(rule(6, 80, 443, 0, 0), "-p tcp -m tcp --dport 80:443" ; "port range")]
    #[test_case(rule(17, 53, 0, 0, 0), "-p udp -m udp --dport 53" ; "missing to port")]
    #[test_case(rule(6, 0, 0, 0, 0), "-p tcp -m tcp" ; "no ports")]
    #[test_case(rule(1, 0, 0, -1, -1), "-p icmp -m icmp --icmp-type any" ; "icmp any")]
    #[test_case(rule(1, 0, 0, 8, -1), "-p icmp -m icmp --icmp-type 8" ; "icmp type only")]
    #[test_case(rule(1, 0, 0, 8, 0), "-p icmp -m icmp --icmp-type 8/0" ; "icmp type and code")]
    #[test_case(rule(47, 0, 0, 0, 0), "-p 47" ; "numeric fallback")]
    #[test_case(rule(-1, 0, 0, 0, 0), "" ; "all protocols")]
    fn test_protocol_clauses(rule: Rule, expected: &str) {
        assert_eq!(compile_ingress_rule(None, &rule, RuleFlag::None).unwrap(), expected);
    }

    #[test]
    fn test_source_from_rule_and_override() {
        let mut r = rule(1, 0, 0, 8, -1);
        r.cidr = "10.0.0.0/24".to_string();
        assert_eq!(
            compile_ingress_rule(None, &r, RuleFlag::None).unwrap(),
            "-s 10.0.0.0/24 -p icmp -m icmp --icmp-type 8"
        );
        assert_eq!(
            compile_ingress_rule(Some("192.168.1.5"), &r, RuleFlag::None).unwrap(),
            "-s 192.168.1.5 -p icmp -m icmp --icmp-type 8"
        );
    }

    #[test]
    fn test_any_cidr_never_emitted() {
        let mut r = rule(6, 22, 22, 0, 0);
        r.cidr = "0.0.0.0/0".to_string();
        let compiled = compile_ingress_rule(None, &r, RuleFlag::None).unwrap();
        assert!(!compiled.contains("0.0.0.0/0"));
        let compiled = compile_ingress_rule(Some("0.0.0.0/0"), &r, RuleFlag::None).unwrap();
        assert!(!compiled.contains("0.0.0.0/0"));
    }

    #[test]
    fn test_flags() {
        let r = rule(6, 22, 22, 0, 0);
        assert_eq!(
            compile_ingress_rule(None, &r, RuleFlag::from_code(1)).unwrap(),
            "-p tcp -m tcp --dport 22 -m mark ! --mark 0x2a"
        );
        assert_eq!(
            compile_ingress_rule(None, &r, RuleFlag::from_code(2)).unwrap(),
            "-p tcp -m tcp --dport 22 -m mark --mark 0x15"
        );
        assert_eq!(
            compile_ingress_rule(None, &r, RuleFlag::from_code(4)).unwrap(),
            "-p tcp -m tcp --dport 22 -m mark ! --mark 0x15"
        );
        assert_eq!(
            compile_ingress_rule(None, &r, RuleFlag::from_code(3)).unwrap(),
            "-p tcp -m tcp --dport 22"
        );
    }

    #[test]
    fn test_invalid_protocol_fails() {
        let err = compile_ingress_rule(None, &rule(300, 0, 0, 0, 0), RuleFlag::None).unwrap_err();
        assert!(matches!(err, GniError::ConversionFailure(_)));
    }
}
