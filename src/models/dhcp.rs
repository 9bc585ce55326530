use serde::{Deserialize, Serialize};

/// DHCP options handed to instances of the VPCs that reference this set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpOptionSet {
    pub name: String,
    pub account_id: String,
    pub domain_names: Vec<String>,
    pub dns_servers: Vec<u32>,
    pub ntp_servers: Vec<u32>,
    pub netbios_servers: Vec<u32>,
    pub netbios_type: i32,
}
