//! The root [`NetworkModel`] and the network operating modes.

use super::{
    Cluster, DhcpOptionSet, HostnameCache, Instance, InternetGateway, ManagedSubnet,
    SecurityGroup, Subnet, Vpc,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Network operating mode declared by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetMode {
    Edge,
    Managed,
    ManagedNoVlan,
    VpcMido,
}

impl NetMode {
    pub const ALL: [NetMode; 4] = [
        NetMode::Edge,
        NetMode::Managed,
        NetMode::ManagedNoVlan,
        NetMode::VpcMido,
    ];

    /// The mode string as it appears in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetMode::Edge => "EDGE",
            NetMode::Managed => "MANAGED",
            NetMode::ManagedNoVlan => "MANAGED-NOVLAN",
            NetMode::VpcMido => "VPCMIDO",
        }
    }
}

impl FromStr for NetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetMode::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("invalid network mode '{s}'"))
    }
}

impl std::fmt::Display for NetMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global network information for one population cycle.
///
/// The model owns every entity. Cross references between entities are
/// indices into the owning collections, so dropping the model drops the
/// whole graph at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    pub init: bool,
    /// Raw mode string from the document, checked by the validator.
    pub mode: String,
    pub version: String,
    pub applied_version: String,

    pub enabled_clc_ip: u32,
    pub instance_dns_domain: String,
    pub instance_dns_servers: Vec<u32>,
    pub public_ips: Vec<u32>,

    // VPCMIDO only
    pub eucanetd_host: String,
    pub public_network_cidr: String,
    pub public_gateway_ip: String,
    /// Space separated `host,ip,iface` entries.
    pub gateway_hosts: String,

    pub managed_subnets: Vec<ManagedSubnet>,
    pub subnets: Vec<Subnet>,
    pub clusters: Vec<Cluster>,

    /// Sorted by name once the builder is done with them.
    pub instances: Vec<Instance>,
    /// Every interface of every instance, in document order.
    pub interfaces: Vec<Instance>,
    /// Set once `instances` is known to be sorted by name.
    pub sorted_instances: bool,

    pub secgroups: Vec<SecurityGroup>,
    pub vpcs: Vec<Vpc>,
    pub internet_gateways: Vec<InternetGateway>,
    pub dhcp_option_sets: Vec<DhcpOptionSet>,

    #[serde(default)]
    pub hostnames: HostnameCache,
}

impl NetworkModel {
    /// An empty, initialized model ready for population.
    pub fn new() -> Self {
        NetworkModel {
            init: true,
            ..Default::default()
        }
    }

    pub fn net_mode(&self) -> Option<NetMode> {
        self.mode.parse().ok()
    }

    pub fn is_vpcmido(&self) -> bool {
        self.net_mode() == Some(NetMode::VpcMido)
    }

    /// Sort the instance collection by name, remapping security group
    /// back-references so they keep pointing at the same instances.
    pub fn sort_instances(&mut self) {
        let mut order: Vec<usize> = (0..self.instances.len()).collect();
        order.sort_by(|a, b| self.instances[*a].name.cmp(&self.instances[*b].name));

        let mut new_index = vec![0usize; order.len()];
        for (new_idx, old_idx) in order.iter().enumerate() {
            new_index[*old_idx] = new_idx;
        }

        let mut slots: Vec<Option<Instance>> = self.instances.drain(..).map(Some).collect();
        self.instances = order
            .iter()
            .filter_map(|old_idx| slots[*old_idx].take())
            .collect();

        for sg in self.secgroups.iter_mut() {
            for idx in sg.instances.iter_mut() {
                *idx = new_index[*idx];
            }
        }
        self.sorted_instances = true;
    }

    /// True if the instance collection is actually ordered by name.
    pub fn instances_in_order(&self) -> bool {
        self.instances.windows(2).all(|w| w[0].name <= w[1].name)
    }
}
