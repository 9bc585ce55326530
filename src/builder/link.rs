//! Cross-linking pass run after every section is populated.
//!
//! Resolves the name references inside each VPC into indices: the VPC's
//! interfaces and DHCP option set, and for every subnet its interfaces and
//! network ACL. Route tables are resolved while the VPC is read.

use crate::models::NetworkModel;
use crate::query::lookup::scan_index;
use crate::query::relations::{subnet_interface_indices, vpc_interface_indices};

/// Resolve VPC-scoped references in `model`.
pub fn link_model(model: &mut NetworkModel) {
    for vpc_idx in 0..model.vpcs.len() {
        let vpc_name = model.vpcs[vpc_idx].name.clone();
        let interfaces = vpc_interface_indices(model, &vpc_name);

        let dhcp_name = model.vpcs[vpc_idx].dhcp_option_set_name.clone();
        let dhcp_option_set = if dhcp_name.is_empty() {
            None
        } else {
            scan_index(&model.dhcp_option_sets, &dhcp_name, |d| d.name.as_str(), None)
        };
        if !dhcp_name.is_empty() && dhcp_option_set.is_none() {
            log::warn!("vpc {vpc_name}: dhcp option set {dhcp_name} not found");
        }

        let subnet_interfaces: Vec<Vec<usize>> = model.vpcs[vpc_idx]
            .subnets
            .iter()
            .map(|subnet| subnet_interface_indices(model, &subnet.name, &interfaces))
            .collect();

        let vpc = &mut model.vpcs[vpc_idx];
        for (subnet, members) in vpc.subnets.iter_mut().zip(subnet_interfaces) {
            subnet.interfaces = members;
            subnet.network_acl = scan_index(
                &vpc.network_acls,
                &subnet.network_acl_name,
                |a| a.name.as_str(),
                None,
            );
            if subnet.network_acl.is_none() {
                log::warn!(
                    "could not find network acl {} for {}",
                    subnet.network_acl_name,
                    subnet.name
                );
            }
        }
        log::trace!("vpc {vpc_name}: linked {} interfaces", interfaces.len());
        vpc.interfaces = interfaces;
        vpc.dhcp_option_set = dhcp_option_set;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DhcpOptionSet, Instance, NetworkAcl, Vpc, VpcSubnet};
    use pretty_assertions::assert_eq;

    fn iface(name: &str, vpc: &str, subnet: &str) -> Instance {
        Instance {
            name: name.to_string(),
            ifname: name.to_string(),
            vpc: vpc.to_string(),
            subnet: subnet.to_string(),
            ..Default::default()
        }
    }

    fn model() -> NetworkModel {
        let mut model = NetworkModel::new();
        model.interfaces = vec![
            iface("eni-1", "vpc-1", "subnet-1"),
            iface("eni-2", "vpc-2", "subnet-9"),
            iface("eni-3", "vpc-1", "subnet-2"),
            iface("eni-4", "vpc-1", "subnet-1"),
        ];
        model.dhcp_option_sets = vec![DhcpOptionSet {
            name: "dopt-1".to_string(),
            ..Default::default()
        }];
        model.vpcs = vec![Vpc {
            name: "vpc-1".to_string(),
            dhcp_option_set_name: "dopt-1".to_string(),
            network_acls: vec![NetworkAcl {
                name: "acl-1".to_string(),
                ..Default::default()
            }],
            subnets: vec![
                VpcSubnet {
                    name: "subnet-1".to_string(),
                    network_acl_name: "acl-1".to_string(),
                    ..Default::default()
                },
                VpcSubnet {
                    name: "subnet-2".to_string(),
                    network_acl_name: "acl-missing".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        model
    }

    #[test]
    fn test_link_model() {
        let mut model = model();
        link_model(&mut model);

        let vpc = &model.vpcs[0];
        assert_eq!(vpc.interfaces, vec![0, 2, 3]);
        assert_eq!(vpc.dhcp_option_set, Some(0));
        assert_eq!(vpc.subnets[0].interfaces, vec![0, 3]);
        assert_eq!(vpc.subnets[0].network_acl, Some(0));
        assert_eq!(vpc.subnets[1].interfaces, vec![2]);
        assert_eq!(vpc.subnets[1].network_acl, None);
    }

    #[test]
    fn test_link_model_is_repeatable() {
        let mut model = model();
        link_model(&mut model);
        let once = model.clone();
        link_model(&mut model);
        assert_eq!(model, once);
    }
}
