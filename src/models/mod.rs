//! Domain models for the global network information.
//!
//! This module contains the data structures built by the builder and read by
//! everything else:
//! - [`NetworkModel`] - Root of the object graph
//! - [`Cluster`], [`Node`] - Host placement
//! - [`Instance`] - Instances and their interfaces
//! - [`SecurityGroup`], [`Rule`] - Security rules
//! - [`Vpc`] and its children - Tenant networks
//! - [`HostnameCache`] - IP to hostname lookups
//! - [`Ipv4`], [`MacAddr`] - Address helpers

mod cluster;
mod dhcp;
mod hostname;
mod instance;
mod ipv4;
mod mac;
mod network;
mod secgroup;
mod vpc;

// Re-export public types
pub use cluster::{Cluster, ManagedSubnet, Node, Subnet};
pub use dhcp::DhcpOptionSet;
pub use hostname::{Hostname, HostnameCache};
pub use instance::{is_interface_name, Instance};
pub use ipv4::{
    broadcast_addr, cut_addr, dot2hex, get_cidr_mask, hex2dot, netmask_to_prefix, split_cidr,
    Ipv4, LOCALHOST, MAX_LENGTH,
};
pub use mac::MacAddr;
pub use network::{NetMode, NetworkModel};
pub use secgroup::{Rule, SecurityGroup, PROTOCOL_ALL, PROTOCOL_ICMP, PROTOCOL_TCP, PROTOCOL_UDP};
pub use vpc::{
    AclEntry, InternetGateway, NatGateway, NetworkAcl, RouteEntry, RouteTable, Vpc, VpcSubnet,
};
