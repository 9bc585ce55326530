//! Document version, network mode and the global `configuration` section.

use super::iprange::IpRangeList;
use super::{addr, addrs, int, text};
use crate::document::DocumentQuery;
use crate::error::{GniError, Result};
use crate::models::{dot2hex, Cluster, ManagedSubnet, NetworkModel, Node, Subnet};

/// Read the network mode and the document versions.
///
/// The mode comes from the configuration section when there is one; the
/// versions are attributes of the document root.
pub fn populate_gnidata<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    root: D::Node,
    configuration: Option<D::Node>,
) -> Result<()> {
    if !model.init {
        return Err(GniError::ContractViolation("model is not initialized".to_string()));
    }
    if let Some(config) = configuration {
        if let Some(mode) = doc.last_property("./property[@name='mode']/value", config) {
            model.mode = mode;
        }
    }
    model.version = text(doc, "/network-data/@version", root);
    model.applied_version = text(doc, "/network-data/@applied-version", root);
    log::debug!(
        "document version {} (applied {}), mode '{}'",
        model.version,
        model.applied_version,
        model.mode
    );
    Ok(())
}

/// Expand the address ranges of `expr`. Rejected entries are logged by the expander.
fn ranges<D: DocumentQuery>(doc: &D, expr: &str, node: D::Node) -> Result<Vec<u32>> {
    let values = doc.property(expr, node);
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let list = IpRangeList::expand(&values)?;
    if list.rejected {
        log::warn!("some entries of '{expr}' were rejected");
    }
    Ok(list.addrs)
}

/// Join the mido gateways as space separated `host,ip,iface` entries.
fn read_gateway_hosts<D: DocumentQuery>(doc: &D, mido: D::Node) -> String {
    let gateways = doc.node_set("./property[@name='gateways']/gateway", mido);
    if gateways.is_empty() {
        log::error!("Invalid mido gateway(s) detected. Check network configuration.");
        return String::new();
    }
    gateways
        .into_iter()
        .map(|gw| {
            [
                "./property[@name='gatewayHost']/value",
                "./property[@name='gatewayIP']/value",
                "./property[@name='gatewayInterface']/value",
            ]
            .iter()
            .filter_map(|expr| doc.last_property(expr, gw))
            .collect::<Vec<String>>()
            .join(",")
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn read_mido<D: DocumentQuery>(model: &mut NetworkModel, doc: &D, config: D::Node) {
    let nodes = doc.node_set("./property[@name='mido']", config);
    let [mido] = nodes.as_slice() else {
        log::warn!("expected exactly one mido property, found {}", nodes.len());
        return;
    };
    model.eucanetd_host = text(doc, "./property[@name='eucanetdHost']/value", *mido);
    model.public_network_cidr = text(doc, "./property[@name='publicNetworkCidr']/value", *mido);
    model.public_gateway_ip = text(doc, "./property[@name='publicGatewayIP']/value", *mido);
    model.gateway_hosts = read_gateway_hosts(doc, *mido);
}

/// A declaration without a name attribute keeps a zeroed address so the
/// validator rejects it.
fn read_managed_subnet<D: DocumentQuery>(doc: &D, node: D::Node) -> ManagedSubnet {
    ManagedSubnet {
        subnet: name_addr(doc, node, "managed subnet"),
        netmask: addr(doc, "./property[@name='netmask']/value", node),
        min_vlan: int(doc, "./property[@name='minVlan']/value", node),
        max_vlan: int(doc, "./property[@name='maxVlan']/value", node),
        segment_size: int(doc, "./property[@name='segmentSize']/value", node),
    }
}

fn read_subnet<D: DocumentQuery>(doc: &D, node: D::Node) -> Subnet {
    Subnet {
        subnet: name_addr(doc, node, "subnet"),
        netmask: addr(doc, "./property[@name='netmask']/value", node),
        gateway: addr(doc, "./property[@name='gateway']/value", node),
    }
}

fn name_addr<D: DocumentQuery>(doc: &D, node: D::Node, kind: &str) -> u32 {
    match doc.name_attr(node) {
        Some(name) => dot2hex(&name),
        None => {
            log::warn!("{kind} declared without a name");
            0
        }
    }
}

fn read_cluster<D: DocumentQuery>(doc: &D, node: D::Node) -> Result<Cluster> {
    let name = doc.name_attr(node).unwrap_or_else(|| {
        log::warn!("cluster declared without a name");
        String::new()
    });
    let private_subnet = doc
        .node_set("./subnet", node)
        .first()
        .map(|sn| read_subnet(doc, *sn))
        .unwrap_or_default();
    let nodes = doc
        .node_set("./property[@name='nodes']/node", node)
        .into_iter()
        .map(|n| Node {
            name: doc.name_attr(n).unwrap_or_default(),
            instance_names: doc.property("./instanceIds/value", n),
        })
        .collect();

    Ok(Cluster {
        enabled_cc_ip: addr(doc, "./property[@name='enabledCCIp']/value", node),
        mac_prefix: text(doc, "./property[@name='macPrefix']/value", node),
        private_ips: ranges(doc, "./property[@name='privateIps']/value", node)?,
        private_subnet,
        nodes,
        name,
    })
}

/// Record which node hosts each instance and interface.
fn assign_nodes(model: &mut NetworkModel) {
    for cluster in model.clusters.iter() {
        for node in cluster.nodes.iter() {
            for instance_name in node.instance_names.iter() {
                model
                    .instances
                    .iter_mut()
                    .filter(|i| &i.name == instance_name)
                    .for_each(|i| i.node = node.name.clone());
                model
                    .interfaces
                    .iter_mut()
                    .filter(|i| &i.instance_name == instance_name)
                    .for_each(|i| i.node = node.name.clone());
            }
        }
    }
}

/// Populate the global configuration: CLC address, DNS, public addresses,
/// mido settings, managed and global subnets and the clusters with their nodes.
///
/// # Returns
/// * `Err(GniError::NotFound)` - The document has no configuration section
/// * `Err(GniError::ResourceExhaustion)` - An address range cannot be stored
pub fn populate_configuration<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    configuration: Option<D::Node>,
) -> Result<()> {
    if !model.init {
        return Err(GniError::ContractViolation("model is not initialized".to_string()));
    }
    let config = configuration
        .ok_or_else(|| GniError::NotFound("configuration section is required".to_string()))?;

    model.enabled_clc_ip = addr(doc, "./property[@name='enabledCLCIp']/value", config);
    model.instance_dns_domain = text(doc, "./property[@name='instanceDNSDomain']/value", config);

    if model.is_vpcmido() {
        read_mido(model, doc, config);
    }

    model.instance_dns_servers = addrs(doc, "./property[@name='instanceDNSServers']/value", config);
    model.public_ips = ranges(doc, "./property[@name='publicIps']/value", config)?;

    // One entry per declared node, named or not
    model.managed_subnets = doc
        .node_set("./property[@name='managedSubnet']/managedSubnet", config)
        .into_iter()
        .map(|n| read_managed_subnet(doc, n))
        .collect();

    model.subnets = doc
        .node_set("./property[@name='subnets']/subnet", config)
        .into_iter()
        .map(|n| read_subnet(doc, n))
        .collect();

    model.clusters = doc
        .node_set("./property[@name='clusters']/cluster", config)
        .into_iter()
        .map(|n| read_cluster(doc, n))
        .collect::<Result<Vec<Cluster>>>()?;

    if model.is_vpcmido() {
        assign_nodes(model);
    }
    log::trace!(
        "configuration: {} clusters, {} public ips, {} dns servers",
        model.clusters.len(),
        model.public_ips.len(),
        model.instance_dns_servers.len()
    );
    Ok(())
}
