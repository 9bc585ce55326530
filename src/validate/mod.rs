//! Model validator.
//!
//! Validation is fail-fast: the first failing check is returned and nothing
//! after it runs. Checks that the enforcement side can live without (a
//! missing MAC address, a missing public IP) only log.
//!
//! String fields are owned and unbounded in the model, so every field the
//! enforcement tooling stores in a fixed slot is length checked here and
//! reported as [`GniError::ValueTooLong`].

use crate::config::{
    ACCOUNT_ID_MAX_LEN, CIDR_MAX_LEN, HOSTNAME_MAX_LEN, MAC_PREFIX_MAX_LEN, MAX_VLAN_EUCA,
    MIN_SEGMENT_SIZE, MIN_VLAN_EUCA, RESOURCE_ID_MAX_LEN,
};
use crate::error::{GniError, Result};
use crate::models::{
    hex2dot, netmask_to_prefix, AclEntry, Cluster, Instance, Ipv4, ManagedSubnet, NatGateway,
    NetMode, NetworkAcl, NetworkModel, Node, RouteTable, SecurityGroup, Subnet, Vpc, VpcSubnet,
};
use std::net::Ipv4Addr;

/// Validate a populated model.
///
/// # Returns
/// * `Ok(())` - Every check passed
/// * `Err(GniError::Validation)` - The first failing check
/// * `Err(GniError::ValueTooLong)` - The first over-long field
pub fn validate(model: &NetworkModel) -> Result<()> {
    if !model.init {
        return Err(GniError::validation("model is not initialized yet"));
    }
    let mode = validate_net_mode(&model.mode)?;
    log::trace!("validating model for '{mode}' networking mode");

    if model.enabled_clc_ip == 0 {
        return Err(GniError::validation("no enabled CLC IP set"));
    }
    if model.instance_dns_domain.is_empty() {
        return Err(GniError::validation("no instanceDNSDomain set"));
    }
    check_len("instanceDNSDomain", &model.instance_dns_domain, HOSTNAME_MAX_LEN)?;
    if model.instance_dns_servers.is_empty() {
        return Err(GniError::validation("no instanceDNSServers set"));
    }
    if let Some(idx) = model.instance_dns_servers.iter().position(|s| *s == 0) {
        return Err(GniError::validation(format!(
            "empty instanceDNSServer set at idx {idx}"
        )));
    }

    if mode != NetMode::VpcMido {
        if model.public_ips.is_empty() {
            log::trace!("no public_ips set");
        } else if let Some(idx) = model.public_ips.iter().position(|ip| *ip == 0) {
            return Err(GniError::validation(format!("empty public_ip set at idx {idx}")));
        }
    }

    if matches!(mode, NetMode::Managed | NetMode::ManagedNoVlan) {
        if model.managed_subnets.len() != 1 {
            return Err(GniError::validation(format!(
                "invalid number of managed subnets set '{}'",
                model.managed_subnets.len()
            )));
        }
        validate_managed_subnet(&model.managed_subnets[0])?;
    }

    if mode == NetMode::Edge {
        for (idx, subnet) in model.subnets.iter().enumerate() {
            validate_subnet(subnet).map_err(|e| {
                log::warn!("invalid subnets set at idx {idx}");
                e
            })?;
        }
    }

    if mode == NetMode::VpcMido {
        check_len("eucanetdHost", &model.eucanetd_host, HOSTNAME_MAX_LEN)?;
        check_len("publicNetworkCidr", &model.public_network_cidr, CIDR_MAX_LEN)?;
    }

    for cluster in &model.clusters {
        validate_cluster(cluster, mode)?;
    }
    for instance in &model.instances {
        validate_instance(instance)?;
    }
    for iface in &model.interfaces {
        validate_interface(iface)?;
    }
    for secgroup in &model.secgroups {
        validate_secgroup(secgroup, model)?;
    }

    if mode == NetMode::VpcMido {
        for vpc in &model.vpcs {
            validate_vpc(vpc)?;
        }
    }
    Ok(())
}

/// Check that `mode` names one of the supported network modes.
pub fn validate_net_mode(mode: &str) -> Result<NetMode> {
    if mode.is_empty() {
        return Err(GniError::validation("network mode is not set"));
    }
    mode.parse::<NetMode>().map_err(GniError::Validation)
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(GniError::ValueTooLong {
            field: field.to_string(),
            len: value.len(),
            max,
        });
    }
    Ok(())
}

/// Non-empty name and account id of an entity, both within limits.
fn check_identity(kind: &str, name: &str, account_id: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GniError::validation(format!("no {kind} name")));
    }
    check_len(&format!("{kind} name"), name, RESOURCE_ID_MAX_LEN)?;
    if account_id.is_empty() {
        return Err(GniError::validation(format!("{kind} {name}: no accountId")));
    }
    check_len(&format!("{kind} {name} accountId"), account_id, ACCOUNT_ID_MAX_LEN)
}

pub fn validate_subnet(subnet: &Subnet) -> Result<()> {
    if subnet.subnet == 0 || subnet.netmask == 0 || subnet.gateway == 0 {
        return Err(GniError::validation(format!(
            "invalid subnet: subnet={} netmask={} gateway={}",
            subnet.subnet, subnet.netmask, subnet.gateway
        )));
    }
    let Some(prefix) = netmask_to_prefix(subnet.netmask) else {
        return Err(GniError::validation(format!(
            "invalid subnet: netmask {} is not contiguous",
            hex2dot(subnet.netmask)
        )));
    };
    let network = Ipv4 {
        addr: Ipv4Addr::from(subnet.subnet),
        mask: prefix,
    };
    if !network.contains(subnet.gateway) {
        return Err(GniError::validation(format!(
            "invalid subnet: gateway {} is outside {network}",
            hex2dot(subnet.gateway)
        )));
    }
    Ok(())
}

pub fn validate_managed_subnet(subnet: &ManagedSubnet) -> Result<()> {
    if subnet.subnet == 0 || subnet.netmask == 0 {
        return Err(GniError::validation(format!(
            "invalid managed subnet: subnet={} netmask={}",
            subnet.subnet, subnet.netmask
        )));
    }
    let size = subnet.segment_size;
    if size < MIN_SEGMENT_SIZE || (size & (size - 1)) != 0 {
        return Err(GniError::validation(format!(
            "invalid managed subnet: segmentSize={size}"
        )));
    }
    let vlans = MIN_VLAN_EUCA..=MAX_VLAN_EUCA;
    if !vlans.contains(&subnet.min_vlan) {
        return Err(GniError::validation(format!(
            "invalid managed subnet: minVlan={}",
            subnet.min_vlan
        )));
    }
    if !vlans.contains(&subnet.max_vlan) {
        return Err(GniError::validation(format!(
            "invalid managed subnet: maxVlan={}",
            subnet.max_vlan
        )));
    }
    if subnet.min_vlan > subnet.max_vlan {
        return Err(GniError::validation(format!(
            "invalid managed subnet: minVlan={}, maxVlan={}",
            subnet.min_vlan, subnet.max_vlan
        )));
    }
    Ok(())
}

pub fn validate_cluster(cluster: &Cluster, mode: NetMode) -> Result<()> {
    if cluster.name.is_empty() {
        return Err(GniError::validation("no cluster name"));
    }
    check_len("cluster name", &cluster.name, HOSTNAME_MAX_LEN)?;
    if cluster.enabled_cc_ip == 0 {
        return Err(GniError::validation(format!(
            "cluster {}: no enabledCCIp",
            cluster.name
        )));
    }
    if cluster.mac_prefix.is_empty() {
        return Err(GniError::validation(format!(
            "cluster {}: no macPrefix",
            cluster.name
        )));
    }
    check_len("cluster macPrefix", &cluster.mac_prefix, MAC_PREFIX_MAX_LEN)?;

    if mode == NetMode::Edge {
        validate_subnet(&cluster.private_subnet).map_err(|_| {
            GniError::validation(format!(
                "cluster {}: invalid cluster private_subnet",
                cluster.name
            ))
        })?;
        if cluster.private_ips.is_empty() {
            return Err(GniError::validation(format!(
                "cluster {}: no private_ips",
                cluster.name
            )));
        }
        if let Some(idx) = cluster.private_ips.iter().position(|ip| *ip == 0) {
            return Err(GniError::validation(format!(
                "cluster {}: empty private_ips set at idx {idx}",
                cluster.name
            )));
        }
    }

    if cluster.nodes.is_empty() {
        log::warn!("cluster {}: no nodes set", cluster.name);
    }
    for node in &cluster.nodes {
        validate_node(node)?;
    }
    Ok(())
}

fn validate_node(node: &Node) -> Result<()> {
    if node.name.is_empty() {
        return Err(GniError::validation("no node name"));
    }
    check_len("node name", &node.name, HOSTNAME_MAX_LEN)?;
    if let Some(idx) = node.instance_names.iter().position(|n| n.is_empty()) {
        return Err(GniError::validation(format!(
            "node {}: empty instance_names set at idx {idx}",
            node.name
        )));
    }
    Ok(())
}

/// Identity and address checks shared by instances and interfaces.
fn validate_member(kind: &str, instance: &Instance) -> Result<()> {
    check_identity(kind, &instance.name, &instance.account_id)?;
    if !instance.mac_address.is_set() {
        log::warn!("{kind} {}: no macAddress", instance.name);
    }
    if instance.public_ip == 0 {
        log::trace!(
            "{kind} {}: no publicIp set (ignore if instance was run with private only addressing)",
            instance.name
        );
    }
    if instance.private_ip == 0 {
        return Err(GniError::validation(format!(
            "{kind} {}: no privateIp",
            instance.name
        )));
    }
    if let Some(idx) = instance.secgroup_names.iter().position(|n| n.is_empty()) {
        return Err(GniError::validation(format!(
            "{kind} {}: empty secgroup_names set at idx {idx}",
            instance.name
        )));
    }
    Ok(())
}

pub fn validate_instance(instance: &Instance) -> Result<()> {
    validate_member("instance", instance)?;
    if instance.secgroup_names.is_empty() {
        return Err(GniError::validation(format!(
            "instance {}: no secgroups",
            instance.name
        )));
    }
    Ok(())
}

pub fn validate_interface(iface: &Instance) -> Result<()> {
    validate_member("interface", iface)?;
    check_len("interface ifname", &iface.ifname, RESOURCE_ID_MAX_LEN)?;
    if iface.secgroup_names.is_empty() {
        log::trace!("interface {}: no secgroups", iface.name);
    }
    Ok(())
}

fn validate_secgroup(secgroup: &SecurityGroup, model: &NetworkModel) -> Result<()> {
    check_identity("secgroup", &secgroup.name, &secgroup.account_id)?;
    if let Some(idx) = secgroup.group_rules.iter().position(|r| r.is_empty()) {
        return Err(GniError::validation(format!(
            "secgroup {}: empty grouprules set at idx {idx}",
            secgroup.name
        )));
    }
    for rule in secgroup.ingress_rules.iter().chain(secgroup.egress_rules.iter()) {
        check_len("secgroup rule cidr", &rule.cidr, CIDR_MAX_LEN)?;
    }
    let members = secgroup
        .instances
        .iter()
        .map(|idx| model.instances.get(*idx))
        .chain(secgroup.interfaces.iter().map(|idx| model.interfaces.get(*idx)));
    for (idx, member) in members.enumerate() {
        if member.map_or(true, |m| m.name.is_empty()) {
            return Err(GniError::validation(format!(
                "secgroup {}: empty member set at idx {idx}",
                secgroup.name
            )));
        }
    }
    Ok(())
}

fn validate_vpc(vpc: &Vpc) -> Result<()> {
    check_identity("vpc", &vpc.name, &vpc.account_id)?;
    check_len("vpc cidr", &vpc.cidr, CIDR_MAX_LEN)?;
    for subnet in &vpc.subnets {
        validate_vpc_subnet(subnet)?;
    }
    for natg in &vpc.nat_gateways {
        validate_nat_gateway(natg)?;
    }
    for table in &vpc.route_tables {
        validate_route_table(table)?;
    }
    for acl in &vpc.network_acls {
        validate_network_acl(acl)?;
    }
    Ok(())
}

fn validate_vpc_subnet(subnet: &VpcSubnet) -> Result<()> {
    check_identity("vpcsubnet", &subnet.name, &subnet.account_id)?;
    check_len("vpcsubnet cidr", &subnet.cidr, CIDR_MAX_LEN)
}

fn validate_nat_gateway(natg: &NatGateway) -> Result<()> {
    check_identity("natg", &natg.name, &natg.account_id)?;
    if !natg.mac_address.is_set() {
        log::warn!("natg {}: no macAddress", natg.name);
    }
    if natg.public_ip == 0 {
        log::trace!("natg {}: no publicIp set", natg.name);
    }
    if natg.private_ip == 0 {
        return Err(GniError::validation(format!("natg {}: no privateIp", natg.name)));
    }
    if natg.vpc.is_empty() {
        return Err(GniError::validation(format!("natg {}: no vpc", natg.name)));
    }
    if natg.subnet.is_empty() {
        return Err(GniError::validation(format!("natg {}: no vpc subnet", natg.name)));
    }
    Ok(())
}

fn validate_route_table(table: &RouteTable) -> Result<()> {
    check_identity("route table", &table.name, &table.account_id)?;
    for (idx, entry) in table.entries.iter().enumerate() {
        if entry.dest_cidr.is_empty() || entry.target.is_empty() {
            return Err(GniError::validation(format!(
                "route table {}: invalid route entry at idx {idx}",
                table.name
            )));
        }
        check_len("route destination", &entry.dest_cidr, CIDR_MAX_LEN)?;
    }
    Ok(())
}

fn validate_acl_entry(acl: &NetworkAcl, direction: &str, entry: &AclEntry) -> Result<()> {
    if entry.number == 0 {
        return Err(GniError::validation(format!(
            "network acl {}: invalid {direction} entry {}",
            acl.name, entry.number
        )));
    }
    if entry.cidr.is_empty() {
        return Err(GniError::validation(format!(
            "network acl {}: invalid CIDR at entry {}",
            acl.name, entry.number
        )));
    }
    check_len("network acl cidr", &entry.cidr, CIDR_MAX_LEN)?;
    if entry.protocol == 0 {
        return Err(GniError::validation(format!(
            "network acl {}: invalid protocol at entry {}",
            acl.name, entry.number
        )));
    }
    Ok(())
}

fn validate_network_acl(acl: &NetworkAcl) -> Result<()> {
    check_identity("network acl", &acl.name, &acl.account_id)?;
    for entry in &acl.ingress {
        validate_acl_entry(acl, "ingress", entry)?;
    }
    for entry in &acl.egress {
        validate_acl_entry(acl, "egress", entry)?;
    }
    Ok(())
}
