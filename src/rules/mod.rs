//! Rule compiler.
//!
//! Turns declarative security rules into packet-filter match expressions:
//! - [`legacy`] - Flag-encoded legacy rule strings
//! - [`ingress`] - Structured ingress rules
//! - [`protocol`] - Protocol number registry

pub mod ingress;
pub mod legacy;
mod protocol;

pub use ingress::{compile_ingress_rule, RuleFlag};
pub use legacy::{convert_legacy_rule, LegacyRule, ANY_CIDR};
pub use protocol::{is_valid_protocol_number, protocol_name};
