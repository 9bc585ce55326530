//! Clusters, nodes and the global subnet declarations.

use serde::{Deserialize, Serialize};

/// A plain subnet declaration (global EDGE subnet or a cluster's private subnet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub subnet: u32,
    pub netmask: u32,
    pub gateway: u32,
}

/// Platform managed address range sliced into VLAN segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedSubnet {
    pub subnet: u32,
    pub netmask: u32,
    pub min_vlan: i32,
    pub max_vlan: i32,
    pub segment_size: i32,
}

/// One hypervisor host and the instances placed on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub instance_names: Vec<String>,
}

/// Failure-domain grouping of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub enabled_cc_ip: u32,
    pub mac_prefix: String,
    pub private_subnet: Subnet,
    pub private_ips: Vec<u32>,
    pub nodes: Vec<Node>,
}

impl Cluster {
    /// Number of instance placements across all nodes.
    pub fn instance_count(&self) -> usize {
        self.nodes.iter().map(|n| n.instance_names.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_count() {
        let cluster = Cluster {
            name: "cluster01".to_string(),
            nodes: vec![
                Node {
                    name: "10.0.1.10".to_string(),
                    instance_names: vec!["i-1".to_string(), "i-2".to_string()],
                },
                Node {
                    name: "10.0.1.11".to_string(),
                    instance_names: vec!["i-3".to_string()],
                },
            ],
            ..Default::default()
        };
        assert_eq!(cluster.instance_count(), 3);
        assert_eq!(Cluster::default().instance_count(), 0);
    }
}
