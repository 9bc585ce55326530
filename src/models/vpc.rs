//! VPCs and everything scoped to them.

use super::MacAddr;
use serde::{Deserialize, Serialize};

/// One route. `applied` is written by the enforcement side once the route is programmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub dest_cidr: String,
    pub target: String,
    pub applied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    pub name: String,
    pub account_id: String,
    pub entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Flag every entry as programmed.
    pub fn mark_applied(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.applied = true;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcSubnet {
    pub name: String,
    pub account_id: String,
    pub cidr: String,
    pub cluster_name: String,
    pub network_acl_name: String,
    pub route_table_name: String,
    /// Index into the owning VPC's `route_tables`.
    pub route_table: Option<usize>,
    /// Index into the owning VPC's `network_acls`.
    pub network_acl: Option<usize>,
    /// Indices into `NetworkModel::interfaces`.
    pub interfaces: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatGateway {
    pub name: String,
    pub account_id: String,
    pub mac_address: MacAddr,
    pub public_ip: u32,
    pub private_ip: u32,
    pub vpc: String,
    pub subnet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub number: i32,
    pub allow: bool,
    pub protocol: i32,
    pub cidr: String,
    pub from_port: i32,
    pub to_port: i32,
    pub icmp_type: i32,
    pub icmp_code: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAcl {
    pub name: String,
    pub account_id: String,
    pub ingress: Vec<AclEntry>,
    pub egress: Vec<AclEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetGateway {
    pub name: String,
    pub account_id: String,
}

/// Tenant virtual network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub name: String,
    pub account_id: String,
    pub cidr: String,
    pub dhcp_option_set_name: String,
    /// Index into `NetworkModel::dhcp_option_sets`.
    pub dhcp_option_set: Option<usize>,
    pub route_tables: Vec<RouteTable>,
    pub subnets: Vec<VpcSubnet>,
    pub nat_gateways: Vec<NatGateway>,
    pub network_acls: Vec<NetworkAcl>,
    pub internet_gateway_names: Vec<String>,
    /// Indices into `NetworkModel::interfaces`.
    pub interfaces: Vec<usize>,
}

impl Vpc {
    /// Route table referenced by `subnet`, if it resolved.
    pub fn subnet_route_table(&self, subnet: &VpcSubnet) -> Option<&RouteTable> {
        subnet.route_table.and_then(|i| self.route_tables.get(i))
    }

    pub fn subnet_network_acl(&self, subnet: &VpcSubnet) -> Option<&NetworkAcl> {
        subnet.network_acl.and_then(|i| self.network_acls.get(i))
    }
}
