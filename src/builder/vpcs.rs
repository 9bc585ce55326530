//! VPCs and everything nested in them.

use super::{addr, atoi, ensure_empty, int, text};
use crate::document::DocumentQuery;
use crate::error::Result;
use crate::models::{
    AclEntry, MacAddr, NatGateway, NetworkAcl, NetworkModel, RouteEntry, RouteTable, Vpc,
    VpcSubnet,
};

/// Route target elements, in order of precedence.
const ROUTE_TARGETS: [&str; 3] = ["./gatewayId", "./networkInterfaceId", "./natGatewayId"];

fn read_route<D: DocumentQuery>(doc: &D, node: D::Node) -> RouteEntry {
    let target = ROUTE_TARGETS
        .iter()
        .filter_map(|expr| doc.last_property(expr, node))
        .find(|t| !t.is_empty())
        .unwrap_or_default();
    RouteEntry {
        dest_cidr: text(doc, "./destinationCidr", node),
        target,
        applied: false,
    }
}

fn read_route_table<D: DocumentQuery>(doc: &D, node: D::Node) -> RouteTable {
    RouteTable {
        name: doc.name_attr(node).unwrap_or_default(),
        account_id: text(doc, "./ownerId", node),
        entries: doc
            .node_set("./routes/route", node)
            .into_iter()
            .map(|r| read_route(doc, r))
            .collect(),
    }
}

/// Read a VPC subnet, resolving its route table among `route_tables`.
fn read_vpc_subnet<D: DocumentQuery>(doc: &D, node: D::Node, route_tables: &[RouteTable]) -> VpcSubnet {
    let mut subnet = VpcSubnet {
        name: doc.name_attr(node).unwrap_or_default(),
        account_id: text(doc, "./ownerId", node),
        cidr: text(doc, "./cidr", node),
        cluster_name: text(doc, "./cluster", node),
        network_acl_name: text(doc, "./networkAcl", node),
        route_table_name: text(doc, "./routeTable", node),
        ..Default::default()
    };
    if !subnet.route_table_name.is_empty() {
        subnet.route_table = route_tables
            .iter()
            .position(|rt| rt.name == subnet.route_table_name);
        if subnet.route_table.is_none() {
            log::warn!(
                "Failed to find route table {} for {}",
                subnet.route_table_name,
                subnet.name
            );
        }
    }
    subnet
}

fn read_nat_gateway<D: DocumentQuery>(doc: &D, node: D::Node) -> NatGateway {
    let name = doc.name_attr(node).unwrap_or_default();
    let mac_address = doc
        .last_property("./macAddress", node)
        .and_then(|m| MacAddr::parse(&m))
        .unwrap_or_default();
    NatGateway {
        account_id: text(doc, "./ownerId", node),
        mac_address,
        public_ip: addr(doc, "./publicIp", node),
        private_ip: addr(doc, "./privateIp", node),
        vpc: text(doc, "./vpc", node),
        subnet: text(doc, "./subnet", node),
        name,
    }
}

/// Read one ACL `entry`. The rule number is carried by the `number`
/// attribute, falling back to `name`.
fn read_acl_entry<D: DocumentQuery>(doc: &D, node: D::Node) -> AclEntry {
    let number = doc
        .attribute(node, "number")
        .or_else(|| doc.attribute(node, "name"))
        .map(|n| atoi(&n))
        .unwrap_or(0);
    AclEntry {
        number,
        allow: doc.property("./action", node).iter().any(|a| a == "allow"),
        protocol: int(doc, "./protocol", node),
        cidr: text(doc, "./cidr", node),
        from_port: int(doc, "./portRangeFrom", node),
        to_port: int(doc, "./portRangeTo", node),
        icmp_type: int(doc, "./icmpType", node),
        icmp_code: int(doc, "./icmpCode", node),
    }
}

fn read_network_acl<D: DocumentQuery>(doc: &D, node: D::Node) -> NetworkAcl {
    let entries = |expr: &str| -> Vec<AclEntry> {
        doc.node_set(expr, node)
            .into_iter()
            .map(|e| read_acl_entry(doc, e))
            .collect()
    };
    NetworkAcl {
        name: doc.name_attr(node).unwrap_or_default(),
        account_id: text(doc, "./ownerId", node),
        ingress: entries("./ingressEntries/entry"),
        egress: entries("./egressEntries/entry"),
    }
}

/// Read one `vpc` element with its route tables, subnets, gateways and ACLs.
pub fn read_vpc<D: DocumentQuery>(doc: &D, node: D::Node) -> Vpc {
    let route_tables: Vec<RouteTable> = doc
        .node_set("./routeTables/routeTable", node)
        .into_iter()
        .map(|n| read_route_table(doc, n))
        .collect();
    let subnets = doc
        .node_set("./subnets/subnet", node)
        .into_iter()
        .map(|n| read_vpc_subnet(doc, n, &route_tables))
        .collect();

    Vpc {
        name: doc.name_attr(node).unwrap_or_default(),
        account_id: text(doc, "./ownerId", node),
        cidr: text(doc, "./cidr", node),
        dhcp_option_set_name: text(doc, "./dhcpOptionSet", node),
        route_tables,
        subnets,
        internet_gateway_names: doc.property("./internetGateways/value", node),
        nat_gateways: doc
            .node_set("./natGateways/natGateway", node)
            .into_iter()
            .map(|n| read_nat_gateway(doc, n))
            .collect(),
        network_acls: doc
            .node_set("./networkAcls/networkAcl", node)
            .into_iter()
            .map(|n| read_network_acl(doc, n))
            .collect(),
        ..Default::default()
    }
}

/// Populate `model.vpcs` from the `vpcs` section.
pub fn populate_vpcs<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    section: Option<D::Node>,
) -> Result<()> {
    ensure_empty(model, "vpcs", model.vpcs.is_empty())?;
    let Some(section) = section else {
        log::debug!("no vpcs section in document");
        return Ok(());
    };
    model.vpcs = doc
        .node_set("./vpc", section)
        .into_iter()
        .map(|n| read_vpc(doc, n))
        .collect();
    log::trace!("Found {} vpcs", model.vpcs.len());
    Ok(())
}
