//! Instances and their network interfaces.

use super::MacAddr;
use serde::{Deserialize, Serialize};

/// A primary VM or one of its network interfaces (ENI).
///
/// Interfaces live in [`NetworkModel::interfaces`](super::NetworkModel) and are
/// reachable from their owning instance through `interfaces` indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    /// ENI id of an interface, empty for instances.
    pub ifname: String,
    /// Owning instance of an interface.
    pub instance_name: String,
    pub account_id: String,
    pub mac_address: MacAddr,
    pub public_ip: u32,
    pub private_ip: u32,
    pub vpc: String,
    pub subnet: String,
    /// Node the instance is placed on (VPCMIDO only).
    pub node: String,
    pub secgroup_names: Vec<String>,
    /// Indices into `NetworkModel::secgroups`, resolved by the builder.
    pub secgroups: Vec<usize>,
    pub attachment_id: String,
    pub src_dst_check: bool,
    pub device_index: i32,
    /// Indices into `NetworkModel::interfaces`.
    pub interfaces: Vec<usize>,
}

impl Instance {
    /// True for an ENI record.
    pub fn is_interface(&self) -> bool {
        !self.ifname.is_empty()
    }

    /// True for an interface attached at a nonzero device index.
    pub fn is_secondary(&self) -> bool {
        self.is_interface() && self.device_index != 0
    }

    pub fn has_secgroup(&self, name: &str) -> bool {
        self.secgroup_names.iter().any(|n| n == name)
    }
}

/// True if `name` is an ENI id.
pub fn is_interface_name(name: &str) -> bool {
    name.contains("eni-")
}
