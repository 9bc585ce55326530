//! Trace level model dump.

use crate::models::{hex2dot, Instance, NetworkModel};
use itertools::Itertools;

fn addr_list(addrs: &[u32]) -> String {
    addrs.iter().map(|a| hex2dot(*a)).join(" ")
}

fn log_instance(kind: &str, idx: usize, instance: &Instance) {
    log::trace!(
        "{kind} {idx}: name={} ifname={} owner={} accountId={} mac={} publicIp={} privateIp={} vpc={} subnet={} node={} secgroups=[{}] attachment={} srcDstCheck={} deviceIndex={}",
        instance.name,
        instance.ifname,
        instance.instance_name,
        instance.account_id,
        instance.mac_address,
        hex2dot(instance.public_ip),
        hex2dot(instance.private_ip),
        instance.vpc,
        instance.subnet,
        instance.node,
        instance.secgroup_names.join(" "),
        instance.attachment_id,
        instance.src_dst_check,
        instance.device_index
    );
}

/// Dump every entity of `model` at trace level. Does nothing if trace is off.
pub fn log_model(model: &NetworkModel) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    log::trace!(
        "model version={} applied={} mode={} clc={} dnsDomain={} dnsServers=[{}] publicIps={}",
        model.version,
        model.applied_version,
        model.mode,
        hex2dot(model.enabled_clc_ip),
        model.instance_dns_domain,
        addr_list(&model.instance_dns_servers),
        model.public_ips.len()
    );
    if model.is_vpcmido() {
        log::trace!(
            "mido host={} publicNetwork={} publicGateway={} gateways=[{}]",
            model.eucanetd_host,
            model.public_network_cidr,
            model.public_gateway_ip,
            model.gateway_hosts
        );
    }

    for (idx, cluster) in model.clusters.iter().enumerate() {
        log::trace!(
            "cluster {idx}: name={} cc={} macPrefix={} privateIps={} nodes=[{}]",
            cluster.name,
            hex2dot(cluster.enabled_cc_ip),
            cluster.mac_prefix,
            cluster.private_ips.len(),
            cluster.nodes.iter().map(|n| n.name.as_str()).join(" ")
        );
    }
    for (idx, instance) in model.instances.iter().enumerate() {
        log_instance("instance", idx, instance);
    }
    for (idx, iface) in model.interfaces.iter().enumerate() {
        log_instance("interface", idx, iface);
    }

    for (idx, sg) in model.secgroups.iter().enumerate() {
        log::trace!(
            "secgroup {idx}: name={} accountId={} grouprules={} ingress={} egress={} instances=[{}] interfaces=[{}]",
            sg.name,
            sg.account_id,
            sg.group_rules.len(),
            sg.ingress_rules.len(),
            sg.egress_rules.len(),
            sg.instances
                .iter()
                .filter_map(|i| model.instances.get(*i))
                .map(|i| i.name.as_str())
                .join(" "),
            sg.interfaces
                .iter()
                .filter_map(|i| model.interfaces.get(*i))
                .map(|i| i.name.as_str())
                .join(" ")
        );
        for rule in &sg.group_rules {
            log::trace!("\tgrouprule: {rule}");
        }
    }

    for (idx, vpc) in model.vpcs.iter().enumerate() {
        log::trace!(
            "vpc {idx}: name={} accountId={} cidr={} dhcpOptionSet={} igws=[{}] interfaces={}",
            vpc.name,
            vpc.account_id,
            vpc.cidr,
            vpc.dhcp_option_set_name,
            vpc.internet_gateway_names.join(" "),
            vpc.interfaces.len()
        );
        for subnet in &vpc.subnets {
            log::trace!(
                "\tsubnet: name={} cidr={} cluster={} acl={} routeTable={} interfaces={}",
                subnet.name,
                subnet.cidr,
                subnet.cluster_name,
                subnet.network_acl_name,
                subnet.route_table_name,
                subnet.interfaces.len()
            );
        }
        for table in &vpc.route_tables {
            log::trace!("\troute table: name={} entries={}", table.name, table.entries.len());
            for entry in &table.entries {
                log::trace!("\t\t{} -> {} applied={}", entry.dest_cidr, entry.target, entry.applied);
            }
        }
        for natg in &vpc.nat_gateways {
            log::trace!(
                "\tnat gateway: name={} mac={} publicIp={} privateIp={} subnet={}",
                natg.name,
                natg.mac_address,
                hex2dot(natg.public_ip),
                hex2dot(natg.private_ip),
                natg.subnet
            );
        }
        for acl in &vpc.network_acls {
            log::trace!(
                "\tnetwork acl: name={} ingress={} egress={}",
                acl.name,
                acl.ingress.len(),
                acl.egress.len()
            );
        }
    }

    for igw in &model.internet_gateways {
        log::trace!("internet gateway: name={} accountId={}", igw.name, igw.account_id);
    }
    for dhcp in &model.dhcp_option_sets {
        log::trace!(
            "dhcp option set: name={} domains=[{}] dns=[{}] ntp=[{}] netbios=[{}] type={}",
            dhcp.name,
            dhcp.domain_names.join(" "),
            addr_list(&dhcp.dns_servers),
            addr_list(&dhcp.ntp_servers),
            addr_list(&dhcp.netbios_servers),
            dhcp.netbios_type
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dot2hex;

    #[test]
    fn test_addr_list() {
        assert_eq!(addr_list(&[dot2hex("10.0.0.1"), dot2hex("10.0.0.2")]), "10.0.0.1 10.0.0.2");
        assert_eq!(addr_list(&[]), "");
    }

    #[test]
    fn test_log_model_without_logger() {
        let mut model = NetworkModel::new();
        model.instances.push(Instance::default());
        log_model(&model);
    }
}
