//! Security groups and their rules.

use serde::{Deserialize, Serialize};

/// Protocol number that stands for "all protocols".
pub const PROTOCOL_ALL: i32 = -1;
pub const PROTOCOL_ICMP: i32 = 1;
pub const PROTOCOL_TCP: i32 = 6;
pub const PROTOCOL_UDP: i32 = 17;

/// One ingress or egress match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub protocol: i32,
    /// Peer security group, if the rule matches a group instead of a CIDR.
    pub group_id: String,
    pub group_owner_id: String,
    pub cidr: String,
    pub cidr_netaddr: u32,
    pub cidr_slashnet: u8,
    pub from_port: i32,
    pub to_port: i32,
    pub icmp_type: i32,
    pub icmp_code: i32,
}

impl Rule {
    /// Field-by-field equality on everything that changes enforcement.
    pub fn same_match(&self, other: &Rule) -> bool {
        self.cidr_netaddr == other.cidr_netaddr
            && self.cidr_slashnet == other.cidr_slashnet
            && self.protocol == other.protocol
            && self.from_port == other.from_port
            && self.to_port == other.to_port
            && self.icmp_type == other.icmp_type
            && self.icmp_code == other.icmp_code
            && self.group_id == other.group_id
    }
}

/// Named bundle of rules and the members it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub name: String,
    pub account_id: String,
    /// Legacy rules converted to match expressions; empty when conversion failed.
    pub group_rules: Vec<String>,
    pub ingress_rules: Vec<Rule>,
    pub egress_rules: Vec<Rule>,
    /// Indices into `NetworkModel::instances`.
    pub instances: Vec<usize>,
    /// Indices into `NetworkModel::interfaces`.
    pub interfaces: Vec<usize>,
}
