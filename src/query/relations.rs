//! "Get X for Y" traversals over the model.

use super::{QueryResult, Selection, Want};
use crate::models::{Cluster, Instance, NetworkModel, Node, SecurityGroup, Vpc, VpcSubnet};

fn instance_by_name<'m>(model: &'m NetworkModel, name: &str) -> Option<&'m Instance> {
    model.instances.iter().find(|i| i.name == name)
}

fn secgroup_by_name<'m>(model: &'m NetworkModel, name: &str) -> Option<&'m SecurityGroup> {
    model.secgroups.iter().find(|sg| sg.name == name)
}

/// Security groups of the model used by at least one of `instances`, in model order.
fn secgroups_in_use(
    model: &NetworkModel,
    instances: &[Instance],
    sel: Selection,
    want: Want,
) -> QueryResult<SecurityGroup> {
    let mut result = QueryResult::empty(want);
    for sg in model.secgroups.iter().filter(|sg| sel.admits(&sg.name)) {
        if instances.iter().any(|i| i.has_secgroup(&sg.name)) {
            result.push(&sg.name, Some(sg));
        }
    }
    result
}

/// Clusters of the model.
pub fn cloud_get_clusters(model: &NetworkModel, sel: Selection, want: Want) -> QueryResult<Cluster> {
    let mut result = QueryResult::empty(want);
    for cluster in model.clusters.iter().filter(|c| sel.admits(&c.name)) {
        result.push(&cluster.name, Some(cluster));
    }
    result
}

/// Security groups of the model.
pub fn cloud_get_secgroups(model: &NetworkModel, sel: Selection, want: Want) -> QueryResult<SecurityGroup> {
    let mut result = QueryResult::empty(want);
    for sg in model.secgroups.iter().filter(|sg| sel.admits(&sg.name)) {
        result.push(&sg.name, Some(sg));
    }
    result
}

/// Nodes of `cluster`, which must be one of the model's clusters.
pub fn cluster_get_nodes(model: &NetworkModel, cluster: &Cluster, sel: Selection, want: Want) -> QueryResult<Node> {
    let mut result = QueryResult::empty(want);
    let Some(cluster) = model_cluster(model, cluster) else {
        return result;
    };
    for node in cluster.nodes.iter().filter(|n| sel.admits(&n.name)) {
        result.push(&node.name, Some(node));
    }
    result
}

/// The model's own cluster with the same name as `cluster`.
fn model_cluster<'m>(model: &'m NetworkModel, cluster: &Cluster) -> Option<&'m Cluster> {
    let found = model.clusters.iter().find(|c| c.name == cluster.name);
    if found.is_none() {
        log::warn!("nothing to do, no matching cluster named '{}' found", cluster.name);
    }
    found
}

/// Instances placed on any node of `cluster`, in node order.
///
/// Names listed under a node but missing from the model are reported in
/// the name list only.
pub fn cluster_get_instances(
    model: &NetworkModel,
    cluster: &Cluster,
    sel: Selection,
    want: Want,
) -> QueryResult<Instance> {
    let mut result = QueryResult::empty(want);
    let Some(cluster) = model_cluster(model, cluster) else {
        return result;
    };
    for node in cluster.nodes.iter() {
        for name in node.instance_names.iter().filter(|n| sel.admits(n)) {
            result.push(name, instance_by_name(model, name));
        }
    }
    result
}

/// Security groups used by the instances of `cluster`.
pub fn cluster_get_secgroups(
    model: &NetworkModel,
    cluster: &Cluster,
    sel: Selection,
    want: Want,
) -> QueryResult<SecurityGroup> {
    let instances = cluster_get_instances(model, cluster, Selection::All, Want::Entities);
    secgroups_in_use(model, instances.entities(), sel, want)
}

/// Instances placed on `node`.
pub fn node_get_instances(model: &NetworkModel, node: &Node, sel: Selection, want: Want) -> QueryResult<Instance> {
    let mut result = QueryResult::empty(want);
    for name in node.instance_names.iter().filter(|n| sel.admits(n)) {
        result.push(name, instance_by_name(model, name));
    }
    result
}

/// Security groups used by the instances placed on `node`.
pub fn node_get_secgroups(
    model: &NetworkModel,
    node: &Node,
    sel: Selection,
    want: Want,
) -> QueryResult<SecurityGroup> {
    let instances = node_get_instances(model, node, Selection::All, Want::Entities);
    secgroups_in_use(model, instances.entities(), sel, want)
}

/// Security groups named by `instance`, in the instance's order.
pub fn instance_get_secgroups(
    model: &NetworkModel,
    instance: &Instance,
    sel: Selection,
    want: Want,
) -> QueryResult<SecurityGroup> {
    let mut result = QueryResult::empty(want);
    for name in instance.secgroup_names.iter().filter(|n| sel.admits(n)) {
        result.push(name, secgroup_by_name(model, name));
    }
    result
}

/// Instances that are members of `secgroup`.
pub fn secgroup_get_instances(
    model: &NetworkModel,
    secgroup: &SecurityGroup,
    sel: Selection,
    want: Want,
) -> QueryResult<Instance> {
    let mut result = QueryResult::empty(want);
    for instance in secgroup.instances.iter().filter_map(|idx| model.instances.get(*idx)) {
        if sel.admits(&instance.name) {
            result.push(&instance.name, Some(instance));
        }
    }
    result
}

/// Interfaces that are members of `secgroup`.
pub fn secgroup_get_interfaces(
    model: &NetworkModel,
    secgroup: &SecurityGroup,
    sel: Selection,
    want: Want,
) -> QueryResult<Instance> {
    let mut result = QueryResult::empty(want);
    for iface in secgroup.interfaces.iter().filter_map(|idx| model.interfaces.get(*idx)) {
        if sel.admits(&iface.name) {
            result.push(&iface.name, Some(iface));
        }
    }
    result
}

/// Indices of the interfaces attached to the VPC named `vpc_name`.
pub(crate) fn vpc_interface_indices(model: &NetworkModel, vpc_name: &str) -> Vec<usize> {
    model
        .interfaces
        .iter()
        .enumerate()
        .filter(|(_, iface)| iface.vpc == vpc_name)
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices, among `candidates`, of the interfaces placed in the subnet named `subnet_name`.
pub(crate) fn subnet_interface_indices(model: &NetworkModel, subnet_name: &str, candidates: &[usize]) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|idx| {
            model
                .interfaces
                .get(*idx)
                .is_some_and(|iface| iface.subnet == subnet_name)
        })
        .collect()
}

fn interfaces_result(model: &NetworkModel, indices: &[usize], sel: Selection, want: Want) -> QueryResult<Instance> {
    let mut result = QueryResult::empty(want);
    for iface in indices.iter().filter_map(|idx| model.interfaces.get(*idx)) {
        if sel.admits(&iface.name) {
            result.push(&iface.name, Some(iface));
        }
    }
    result
}

/// Interfaces attached to `vpc`, found by VPC name.
pub fn vpc_get_interfaces(model: &NetworkModel, vpc: &Vpc, sel: Selection, want: Want) -> QueryResult<Instance> {
    interfaces_result(model, &vpc_interface_indices(model, &vpc.name), sel, want)
}

/// Interfaces of `vpc` placed in `subnet`, found by subnet name.
pub fn vpc_subnet_get_interfaces(
    model: &NetworkModel,
    vpc: &Vpc,
    subnet: &VpcSubnet,
    sel: Selection,
    want: Want,
) -> QueryResult<Instance> {
    let vpc_ifaces = vpc_interface_indices(model, &vpc.name);
    interfaces_result(
        model,
        &subnet_interface_indices(model, &subnet.name, &vpc_ifaces),
        sel,
        want,
    )
}
