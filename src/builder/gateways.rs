//! Internet gateways and DHCP option sets.

use super::{addrs, ensure_empty, int, text};
use crate::document::DocumentQuery;
use crate::error::Result;
use crate::models::{DhcpOptionSet, InternetGateway, NetworkModel};

/// Populate `model.internet_gateways` from the `internetGateways` section.
pub fn populate_internet_gateways<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    section: Option<D::Node>,
) -> Result<()> {
    ensure_empty(model, "internet gateways", model.internet_gateways.is_empty())?;
    let Some(section) = section else {
        return Ok(());
    };
    model.internet_gateways = doc
        .node_set("./internetGateway", section)
        .into_iter()
        .map(|node| InternetGateway {
            name: doc.name_attr(node).unwrap_or_default(),
            account_id: text(doc, "./ownerId", node),
        })
        .collect();
    log::trace!("Found {} internet gateways", model.internet_gateways.len());
    Ok(())
}

fn read_dhcp_option_set<D: DocumentQuery>(doc: &D, node: D::Node) -> DhcpOptionSet {
    DhcpOptionSet {
        name: doc.name_attr(node).unwrap_or_default(),
        account_id: text(doc, "./ownerId", node),
        domain_names: doc.property("./property[@name='domain-name']/value", node),
        dns_servers: addrs(doc, "./property[@name='domain-name-servers']/value", node),
        ntp_servers: addrs(doc, "./property[@name='ntp-servers']/value", node),
        netbios_servers: addrs(doc, "./property[@name='netbios-name-servers']/value", node),
        netbios_type: int(doc, "./property[@name='netbios-node-type']/value", node),
    }
}

/// Populate `model.dhcp_option_sets` from the `dhcpOptionSets` section.
pub fn populate_dhcp_option_sets<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    section: Option<D::Node>,
) -> Result<()> {
    ensure_empty(model, "dhcp option sets", model.dhcp_option_sets.is_empty())?;
    let Some(section) = section else {
        return Ok(());
    };
    model.dhcp_option_sets = doc
        .node_set("./dhcpOptionSet", section)
        .into_iter()
        .map(|node| read_dhcp_option_set(doc, node))
        .collect();
    log::trace!("Found {} dhcp option sets", model.dhcp_option_sets.len());
    Ok(())
}
