//! Change detection between two model snapshots.
//!
//! Every function here is pure. Sequences are compared by position, so a
//! reordering without a content change still reports a difference. Route
//! entries whose `applied` flag is unset always compare as changed so that
//! unapplied routes are retried.

use crate::models::{Instance, NatGateway, NetworkModel, RouteTable, Rule, SecurityGroup, Vpc, VpcSubnet};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitmask of global configuration fields that differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConfigDiff(u32);

impl ConfigDiff {
    pub const NONE: ConfigDiff = ConfigDiff(0);
    /// Set whenever the two sides cannot be compared field by field.
    pub const OTHER: ConfigDiff = ConfigDiff(1);
    pub const ENABLED_CLC_IP: ConfigDiff = ConfigDiff(1 << 1);
    pub const INSTANCE_DNS_DOMAIN: ConfigDiff = ConfigDiff(1 << 2);
    pub const INSTANCE_DNS_SERVERS: ConfigDiff = ConfigDiff(1 << 3);
    pub const EUCANETD_HOST: ConfigDiff = ConfigDiff(1 << 4);
    pub const PUBLIC_NETWORK_CIDR: ConfigDiff = ConfigDiff(1 << 5);
    pub const PUBLIC_GATEWAY_IP: ConfigDiff = ConfigDiff(1 << 6);
    pub const GATEWAY_HOSTS: ConfigDiff = ConfigDiff(1 << 7);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ConfigDiff) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for ConfigDiff {
    type Output = ConfigDiff;

    fn bitor(self, rhs: ConfigDiff) -> ConfigDiff {
        ConfigDiff(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConfigDiff {
    fn bitor_assign(&mut self, rhs: ConfigDiff) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ConfigDiff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Which global configuration fields changed between `a` and `b`.
///
/// The VPCMIDO gateway fields are compared only when both sides are in
/// VPCMIDO mode. When exactly one side is, nothing else is compared and the
/// result is [`ConfigDiff::OTHER`].
pub fn diff_global_config(a: &NetworkModel, b: &NetworkModel) -> ConfigDiff {
    let (a_mido, b_mido) = (a.is_vpcmido(), b.is_vpcmido());
    if a_mido != b_mido {
        return ConfigDiff::OTHER;
    }

    let mut diff = ConfigDiff::NONE;
    if a.enabled_clc_ip != b.enabled_clc_ip {
        diff |= ConfigDiff::ENABLED_CLC_IP;
    }
    if a.instance_dns_domain != b.instance_dns_domain {
        diff |= ConfigDiff::INSTANCE_DNS_DOMAIN;
    }
    if a.instance_dns_servers != b.instance_dns_servers {
        diff |= ConfigDiff::INSTANCE_DNS_SERVERS;
    }

    if a_mido && b_mido {
        if a.eucanetd_host != b.eucanetd_host {
            diff |= ConfigDiff::EUCANETD_HOST;
        }
        if a.public_network_cidr != b.public_network_cidr {
            diff |= ConfigDiff::PUBLIC_NETWORK_CIDR;
        }
        if a.public_gateway_ip != b.public_gateway_ip {
            diff |= ConfigDiff::PUBLIC_GATEWAY_IP;
        }
        if a.gateway_hosts != b.gateway_hosts {
            diff |= ConfigDiff::GATEWAY_HOSTS;
        }
    }
    diff
}

/// Shallow VPC comparison: names, DHCP option set name and child counts.
pub fn diff_vpc(a: &Vpc, b: &Vpc) -> bool {
    a.name == b.name
        && a.dhcp_option_set_name == b.dhcp_option_set_name
        && a.internet_gateway_names.len() == b.internet_gateway_names.len()
        && a.nat_gateways.len() == b.nat_gateways.len()
        && a.network_acls.len() == b.network_acls.len()
        && a.route_tables.len() == b.route_tables.len()
        && a.subnets.len() == b.subnets.len()
}

/// Compare two subnets, each resolved against its owning VPC.
pub fn diff_vpc_subnet(a_vpc: &Vpc, a: &VpcSubnet, b_vpc: &Vpc, b: &VpcSubnet) -> bool {
    if a.name != b.name {
        return false;
    }
    let tables_same = match (a_vpc.subnet_route_table(a), b_vpc.subnet_route_table(b)) {
        (None, None) => true,
        (Some(ta), Some(tb)) => diff_route_table(ta, tb),
        _ => false,
    };
    a.route_table_name == b.route_table_name && a.network_acl_name == b.network_acl_name && tables_same
}

pub fn diff_nat_gateway(a: &NatGateway, b: &NatGateway) -> bool {
    a.name == b.name
}

/// Same name and entries, with every entry of `a` marked applied.
pub fn diff_route_table(a: &RouteTable, b: &RouteTable) -> bool {
    a.name == b.name
        && a.entries.len() == b.entries.len()
        && a.entries
            .iter()
            .zip(b.entries.iter())
            .all(|(ea, eb)| ea.applied && ea.dest_cidr == eb.dest_cidr && ea.target == eb.target)
}

/// Result of [`diff_security_group`]. A flag is `true` when that aspect changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityGroupDiff {
    pub same: bool,
    pub ingress: bool,
    pub egress: bool,
    pub interfaces: bool,
}

fn rules_differ(a: &[Rule], b: &[Rule]) -> bool {
    a.len() != b.len() || a.iter().zip(b.iter()).any(|(ra, rb)| !ra.same_match(rb))
}

fn member_names<'m>(model: &'m NetworkModel, sg: &SecurityGroup) -> Vec<&'m str> {
    sg.interfaces
        .iter()
        .filter_map(|idx| model.interfaces.get(*idx))
        .map(|iface| iface.name.as_str())
        .collect()
}

/// Compare a security group across two models.
///
/// Member interfaces are resolved in their own model and compared by name.
/// Different group names report every aspect as changed.
pub fn diff_security_group(
    a_model: &NetworkModel,
    a: &SecurityGroup,
    b_model: &NetworkModel,
    b: &SecurityGroup,
) -> SecurityGroupDiff {
    if a.name != b.name {
        return SecurityGroupDiff {
            same: false,
            ingress: true,
            egress: true,
            interfaces: true,
        };
    }
    let ingress = rules_differ(&a.ingress_rules, &b.ingress_rules);
    let egress = rules_differ(&a.egress_rules, &b.egress_rules);
    let interfaces = member_names(a_model, a) != member_names(b_model, b);
    SecurityGroupDiff {
        same: !(ingress || egress || interfaces),
        ingress,
        egress,
        interfaces,
    }
}

/// Result of [`diff_interface`]. A flag is `true` when that aspect changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceDiff {
    pub same: bool,
    pub public_ip: bool,
    pub src_dst_check: bool,
    pub host: bool,
    pub secgroups: bool,
}

/// Compare two interfaces. Different names report every aspect as changed.
pub fn diff_interface(a: &Instance, b: &Instance) -> InterfaceDiff {
    if a.name != b.name {
        return InterfaceDiff {
            same: false,
            public_ip: true,
            src_dst_check: true,
            host: true,
            secgroups: true,
        };
    }
    let public_ip = a.public_ip != b.public_ip;
    let src_dst_check = a.src_dst_check != b.src_dst_check;
    let host = a.node != b.node;
    let secgroups = a.secgroup_names != b.secgroup_names;
    InterfaceDiff {
        same: !(public_ip || src_dst_check || host || secgroups),
        public_ip,
        src_dst_check,
        host,
        secgroups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dot2hex, RouteEntry};
    use pretty_assertions::assert_eq;

    fn entry(dest: &str, target: &str, applied: bool) -> RouteEntry {
        RouteEntry {
            dest_cidr: dest.to_string(),
            target: target.to_string(),
            applied,
        }
    }

    fn table(entries: Vec<RouteEntry>) -> RouteTable {
        RouteTable {
            name: "rtb-1".to_string(),
            account_id: "000111".to_string(),
            entries,
        }
    }

    fn mido(host: &str) -> NetworkModel {
        let mut model = NetworkModel::new();
        model.mode = "VPCMIDO".to_string();
        model.enabled_clc_ip = dot2hex("10.0.0.1");
        model.instance_dns_domain = "eucalyptus.internal".to_string();
        model.instance_dns_servers = vec![dot2hex("10.0.0.2")];
        model.eucanetd_host = host.to_string();
        model
    }

    fn iface(name: &str) -> Instance {
        Instance {
            name: name.to_string(),
            ifname: name.to_string(),
            public_ip: dot2hex("1.2.3.4"),
            node: "10.0.1.10".to_string(),
            secgroup_names: vec!["sg-1".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_global_config_mido() {
        let a = mido("ufs-1");
        assert_eq!(diff_global_config(&a, &a.clone()), ConfigDiff::NONE);

        let mut b = mido("ufs-2");
        b.instance_dns_servers.push(dot2hex("10.0.0.3"));
        let diff = diff_global_config(&a, &b);
        assert!(diff.contains(ConfigDiff::EUCANETD_HOST));
        assert!(diff.contains(ConfigDiff::INSTANCE_DNS_SERVERS));
        assert!(!diff.contains(ConfigDiff::ENABLED_CLC_IP));
        assert!(!diff.contains(ConfigDiff::OTHER));
    }

    #[test]
    fn test_global_config_mode_mismatch() {
        let a = mido("ufs-1");
        let mut b = mido("ufs-1");
        b.mode = "EDGE".to_string();
        b.enabled_clc_ip = 0;
        assert_eq!(diff_global_config(&a, &b), ConfigDiff::OTHER);

        let mut c = b.clone();
        assert_eq!(diff_global_config(&b, &c), ConfigDiff::NONE);
        c.instance_dns_domain = "other.internal".to_string();
        assert_eq!(diff_global_config(&b, &c), ConfigDiff::INSTANCE_DNS_DOMAIN);
    }

    #[test]
    fn test_route_table_applied_flag() {
        let applied = table(vec![entry("0.0.0.0/0", "igw-1", true)]);
        let pending = table(vec![entry("0.0.0.0/0", "igw-1", false)]);
        assert!(diff_route_table(&applied, &pending));
        assert!(!diff_route_table(&pending, &applied));
        assert!(!diff_route_table(&pending, &pending.clone()));
    }

    #[test]
    fn test_route_table_is_positional() {
        let a = table(vec![entry("10.0.0.0/8", "eni-1", true), entry("0.0.0.0/0", "igw-1", true)]);
        let b = table(vec![entry("0.0.0.0/0", "igw-1", true), entry("10.0.0.0/8", "eni-1", true)]);
        assert!(diff_route_table(&a, &a.clone()));
        assert!(!diff_route_table(&a, &b));
    }

    #[test]
    fn test_vpc_and_subnet() {
        let subnet = VpcSubnet {
            name: "subnet-1".to_string(),
            route_table_name: "rtb-1".to_string(),
            route_table: Some(0),
            network_acl_name: "acl-1".to_string(),
            ..Default::default()
        };
        let vpc = Vpc {
            name: "vpc-1".to_string(),
            route_tables: vec![table(vec![entry("0.0.0.0/0", "igw-1", true)])],
            subnets: vec![subnet.clone()],
            ..Default::default()
        };
        assert!(diff_vpc(&vpc, &vpc.clone()));
        assert!(diff_vpc_subnet(&vpc, &subnet, &vpc, &subnet));

        let mut changed = vpc.clone();
        changed.route_tables[0].entries[0].target = "nat-1".to_string();
        assert!(diff_vpc(&vpc, &changed));
        assert!(!diff_vpc_subnet(&vpc, &subnet, &changed, &subnet));

        changed.nat_gateways.push(NatGateway::default());
        assert!(!diff_vpc(&vpc, &changed));
    }

    #[test]
    fn test_security_group() {
        let mut model = NetworkModel::new();
        model.interfaces = vec![iface("eni-1"), iface("eni-2")];
        let sg = SecurityGroup {
            name: "sg-1".to_string(),
            ingress_rules: vec![Rule {
                protocol: 6,
                from_port: 22,
                to_port: 22,
                ..Default::default()
            }],
            interfaces: vec![0, 1],
            ..Default::default()
        };
        let same = diff_security_group(&model, &sg, &model, &sg);
        assert_eq!(
            same,
            SecurityGroupDiff { same: true, ingress: false, egress: false, interfaces: false }
        );

        let mut other = sg.clone();
        other.interfaces = vec![1, 0];
        other.egress_rules.push(Rule::default());
        assert_eq!(
            diff_security_group(&model, &sg, &model, &other),
            SecurityGroupDiff { same: false, ingress: false, egress: true, interfaces: true }
        );

        other.name = "sg-2".to_string();
        let renamed = diff_security_group(&model, &sg, &model, &other);
        assert!(!renamed.same && renamed.ingress && renamed.egress && renamed.interfaces);
    }

    #[test]
    fn test_interface_public_ip_only() {
        let a = iface("eni-1");
        let mut b = a.clone();
        assert!(diff_interface(&a, &b).same);

        b.public_ip = dot2hex("5.6.7.8");
        assert_eq!(
            diff_interface(&a, &b),
            InterfaceDiff {
                same: false,
                public_ip: true,
                src_dst_check: false,
                host: false,
                secgroups: false,
            }
        );

        let c = iface("eni-2");
        let diff = diff_interface(&a, &c);
        assert!(!diff.same && diff.public_ip && diff.src_dst_check && diff.host && diff.secgroups);
    }

    #[test]
    fn test_nat_gateway() {
        let a = NatGateway {
            name: "nat-1".to_string(),
            ..Default::default()
        };
        let mut b = a.clone();
        b.public_ip = 1;
        assert!(diff_nat_gateway(&a, &b));
        b.name = "nat-2".to_string();
        assert!(!diff_nat_gateway(&a, &b));
    }
}
