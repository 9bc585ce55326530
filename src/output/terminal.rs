//! Terminal summary of a model.

use crate::models::{hex2dot, NetworkModel};
use colored::Colorize;
use itertools::Itertools;
use std::fmt;

/// Widths of the label, value and detail columns.
const COLUMNS: [usize; 3] = [8, 16, 10];

/// Quote each cell and right-align it in its column. Over-long cells push
/// the rest of the row out rather than being cut.
fn summary_row(cells: &[&dyn fmt::Display]) -> String {
    cells
        .iter()
        .zip(COLUMNS)
        .map(|(cell, width)| format!("{:>width$}", format!("\"{cell}\"")))
        .join(",")
}

/// One line per entity kind with its count, plus one line per cluster and VPC.
pub fn summary_lines(model: &NetworkModel) -> Vec<String> {
    let dns = model.instance_dns_servers.iter().map(|a| hex2dot(*a)).join(" ");
    let mut lines = vec![
        summary_row(&[&"mode", &model.mode, &format!("v{}", model.version)]),
        summary_row(&[&"dns", &dns]),
    ];
    let counts = [
        ("clusters", model.clusters.len()),
        ("instances", model.instances.len()),
        ("ifaces", model.interfaces.len()),
        ("secgroups", model.secgroups.len()),
        ("vpcs", model.vpcs.len()),
        ("igws", model.internet_gateways.len()),
        ("dhcpopts", model.dhcp_option_sets.len()),
    ];
    lines.extend(counts.iter().map(|(kind, count)| summary_row(&[kind, count])));
    for cluster in &model.clusters {
        lines.push(summary_row(&[
            &cluster.name,
            &format!("{}_cc", hex2dot(cluster.enabled_cc_ip)),
            &format!("{}/{}_vms", cluster.nodes.len(), cluster.instance_count()),
        ]));
    }
    for vpc in &model.vpcs {
        lines.push(summary_row(&[
            &vpc.name,
            &vpc.cidr,
            &format!("{}_subnets", vpc.subnets.len()),
        ]));
    }
    lines
}

/// Print [`summary_lines`] to stdout.
pub fn print_summary(model: &NetworkModel) {
    println!("#{}# network model summary", "GNI".on_blue());
    for line in summary_lines(model) {
        println!("{line}");
    }
    if model.hostnames.is_empty() {
        println!("#{}# no hostname cache loaded", "NOTE".on_red());
    }
}
