//! Name lookups.
//!
//! The `get_*` functions scan linearly and accept an optional resume index:
//! the scan starts at `*resume` and, on a match, leaves `*resume` pointing
//! just past the matched entry so the next lookup can continue from there.

use crate::error::{GniError, Result};
use crate::models::{
    DhcpOptionSet, Instance, NatGateway, NetworkAcl, NetworkModel, RouteTable, SecurityGroup, Vpc,
    VpcSubnet,
};

/// Position of the first item named `name` at or after the resume index.
pub(crate) fn scan_index<T>(
    items: &[T],
    name: &str,
    key: impl Fn(&T) -> &str,
    resume: Option<&mut usize>,
) -> Option<usize> {
    let start = resume.as_deref().copied().unwrap_or(0);
    let found = items
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, item)| key(item) == name)
        .map(|(idx, _)| idx);
    if let (Some(idx), Some(resume)) = (found, resume) {
        *resume = idx + 1;
    }
    found
}

fn scan<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &str, resume: Option<&mut usize>) -> Option<&'a T> {
    scan_index(items, name, key, resume).and_then(|idx| items.get(idx))
}

pub fn get_vpc<'m>(model: &'m NetworkModel, name: &str, resume: Option<&mut usize>) -> Option<&'m Vpc> {
    scan(&model.vpcs, name, |v| v.name.as_str(), resume)
}

pub fn get_vpc_subnet<'v>(vpc: &'v Vpc, name: &str, resume: Option<&mut usize>) -> Option<&'v VpcSubnet> {
    scan(&vpc.subnets, name, |s| s.name.as_str(), resume)
}

/// Interface named `name` among the interfaces of `subnet`. The resume
/// index counts positions in the subnet's interface list.
pub fn get_interface<'m>(
    model: &'m NetworkModel,
    subnet: &VpcSubnet,
    name: &str,
    resume: Option<&mut usize>,
) -> Option<&'m Instance> {
    let members: Vec<&Instance> = subnet
        .interfaces
        .iter()
        .filter_map(|idx| model.interfaces.get(*idx))
        .collect();
    scan_index(&members, name, |i| i.name.as_str(), resume).map(|pos| members[pos])
}

pub fn get_nat_gateway<'v>(vpc: &'v Vpc, name: &str, resume: Option<&mut usize>) -> Option<&'v NatGateway> {
    scan(&vpc.nat_gateways, name, |n| n.name.as_str(), resume)
}

pub fn get_route_table<'v>(vpc: &'v Vpc, name: &str, resume: Option<&mut usize>) -> Option<&'v RouteTable> {
    scan(&vpc.route_tables, name, |r| r.name.as_str(), resume)
}

pub fn get_secgroup<'m>(model: &'m NetworkModel, name: &str, resume: Option<&mut usize>) -> Option<&'m SecurityGroup> {
    scan(&model.secgroups, name, |s| s.name.as_str(), resume)
}

pub fn get_network_acl<'v>(vpc: &'v Vpc, name: &str, resume: Option<&mut usize>) -> Option<&'v NetworkAcl> {
    scan(&vpc.network_acls, name, |a| a.name.as_str(), resume)
}

pub fn get_dhcp_option_set<'m>(
    model: &'m NetworkModel,
    name: &str,
    resume: Option<&mut usize>,
) -> Option<&'m DhcpOptionSet> {
    scan(&model.dhcp_option_sets, name, |d| d.name.as_str(), resume)
}

/// Security group by name, from the start of the collection.
pub fn find_secgroup<'m>(model: &'m NetworkModel, name: &str) -> Option<&'m SecurityGroup> {
    get_secgroup(model, name, None)
}

/// Instance by name, by binary search over the sorted instance collection.
///
/// # Returns
/// * `Ok(Some(instance))` - The instance
/// * `Ok(None)` - No instance of that name
/// * `Err(GniError::ContractViolation)` - The model's instances are not sorted
pub fn find_instance<'m>(model: &'m NetworkModel, name: &str) -> Result<Option<&'m Instance>> {
    if !model.sorted_instances {
        return Err(GniError::ContractViolation(
            "instance collection is not sorted by name".to_string(),
        ));
    }
    log::trace!("attempting search for instance id {name}");
    Ok(model
        .instances
        .binary_search_by(|i| i.name.as_str().cmp(name))
        .ok()
        .map(|idx| &model.instances[idx]))
}

/// Secondary interfaces (non-zero device index) of the instance named `name`.
pub fn find_secondary_interfaces<'m>(model: &'m NetworkModel, name: &str) -> Result<Vec<&'m Instance>> {
    let Some(instance) = find_instance(model, name)? else {
        return Ok(Vec::new());
    };
    Ok(instance
        .interfaces
        .iter()
        .filter_map(|idx| model.interfaces.get(*idx))
        .filter(|iface| iface.device_index != 0)
        .collect())
}
