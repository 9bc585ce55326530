//! Model builder.
//!
//! Walks the document section by section and produces a fresh
//! [`NetworkModel`]:
//! - [`configuration`] - Version, mode and global configuration
//! - [`instances`] - Instances and their interfaces
//! - [`secgroups`] - Security groups and member back-references
//! - [`vpcs`] - VPCs, route tables, subnets, NAT gateways and ACLs
//! - [`gateways`] - Internet gateways and DHCP option sets
//! - [`link`] - Cross-linking pass
//! - [`iprange`] - IP range expansion

pub mod configuration;
pub mod gateways;
pub mod instances;
pub mod iprange;
pub mod link;
pub mod secgroups;
pub mod vpcs;

use crate::document::DocumentQuery;
use crate::error::{GniError, Result};
use crate::models::{dot2hex, HostnameCache, NetworkModel};
use crate::validate::validate;
use std::str::FromStr;

/// Name of the document root element.
pub const ROOT_ELEMENT: &str = "network-data";

/// How much of the document to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateMode {
    /// Everything.
    All,
    /// Version, mode and global configuration only.
    ConfigOnly,
    /// Nothing, a successful no-op.
    None,
}

impl FromStr for PopulateMode {
    type Err = GniError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(PopulateMode::All),
            "CONFIG_ONLY" => Ok(PopulateMode::ConfigOnly),
            "NONE" => Ok(PopulateMode::None),
            other => Err(GniError::ContractViolation(format!(
                "unknown populate mode '{other}'"
            ))),
        }
    }
}

/// Top-level section nodes found under the document root.
#[derive(Debug, Clone, Copy)]
pub struct Sections<N> {
    pub configuration: Option<N>,
    pub instances: Option<N>,
    pub security_groups: Option<N>,
    pub vpcs: Option<N>,
    pub internet_gateways: Option<N>,
    pub dhcp_option_sets: Option<N>,
}

impl<N: Copy> Sections<N> {
    /// Locate the named sections below `root`. Unknown names are ignored.
    pub fn locate<D: DocumentQuery<Node = N>>(doc: &D, root: N) -> Sections<N> {
        let mut sections = Sections {
            configuration: None,
            instances: None,
            security_groups: None,
            vpcs: None,
            internet_gateways: None,
            dhcp_option_sets: None,
        };
        for child in doc.children(root) {
            let name = doc.node_name(child);
            let slot = match name.as_str() {
                "configuration" => &mut sections.configuration,
                "instances" => &mut sections.instances,
                "securityGroups" => &mut sections.security_groups,
                "vpcs" => &mut sections.vpcs,
                "internetGateways" => &mut sections.internet_gateways,
                "dhcpOptionSets" => &mut sections.dhcp_option_sets,
                _ => {
                    log::trace!("ignoring unknown section '{name}'");
                    continue;
                }
            };
            if slot.is_none() {
                *slot = Some(child);
            }
        }
        sections
    }
}

/// Build and validate a model from `doc`.
///
/// # Arguments
/// * `doc` - The parsed network document
/// * `mode` - How much of the document to read
///
/// # Returns
/// * `Ok(NetworkModel)` - A validated model (empty for [`PopulateMode::None`])
/// * `Err` - Fatal input, resource exhaustion or the first validation failure
pub fn populate<D: DocumentQuery>(doc: &D, mode: PopulateMode) -> Result<NetworkModel> {
    populate_with_hostnames(doc, mode, HostnameCache::default())
}

/// Same as [`populate`], attaching a hostname cache to the new model.
pub fn populate_with_hostnames<D: DocumentQuery>(
    doc: &D,
    mode: PopulateMode,
    hostnames: HostnameCache,
) -> Result<NetworkModel> {
    let mut model = NetworkModel::new();
    if mode == PopulateMode::None {
        return Ok(model);
    }
    let started = chrono::Utc::now();

    let root = doc
        .root()
        .ok_or_else(|| GniError::FatalInput("document has no root element".to_string()))?;
    let root_name = doc.node_name(root);
    if root_name != ROOT_ELEMENT {
        return Err(GniError::FatalInput(format!(
            "unexpected root element '{root_name}', expected '{ROOT_ELEMENT}'"
        )));
    }
    let sections = Sections::locate(doc, root);
    log::trace!("begin parsing document into model");

    tolerate("gni data", configuration::populate_gnidata(&mut model, doc, root, sections.configuration))?;

    if mode == PopulateMode::All {
        tolerate("instances", instances::populate_instances(&mut model, doc, sections.instances))?;
        tolerate("security groups", secgroups::populate_secgroups(&mut model, doc, sections.security_groups))?;
        tolerate("vpcs", vpcs::populate_vpcs(&mut model, doc, sections.vpcs))?;
        tolerate(
            "internet gateways",
            gateways::populate_internet_gateways(&mut model, doc, sections.internet_gateways),
        )?;
        tolerate(
            "dhcp option sets",
            gateways::populate_dhcp_option_sets(&mut model, doc, sections.dhcp_option_sets),
        )?;
    }

    tolerate("configuration", configuration::populate_configuration(&mut model, doc, sections.configuration))?;

    if mode == PopulateMode::All {
        link::link_model(&mut model);
    }
    model.hostnames = hostnames;
    log::trace!("end parsing document into model");

    if let Err(e) = validate(&model) {
        log::debug!("could not validate model after parse: check network config ({e})");
        return Err(e);
    }

    let elapsed = chrono::Utc::now() - started;
    log::info!(
        "model version {} populated in {} ms",
        model.version,
        elapsed.num_milliseconds()
    );
    Ok(model)
}

/// Section failures are logged and skipped unless they leave the cycle unusable.
fn tolerate(section: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e @ GniError::FatalInput(_)) | Err(e @ GniError::ResourceExhaustion(_)) => Err(e),
        Err(e) => {
            log::error!("failed to populate {section}: {e}");
            Ok(())
        }
    }
}

/// Reject a section build into a collection that already holds data.
pub(crate) fn ensure_empty(model: &NetworkModel, section: &str, is_empty: bool) -> Result<()> {
    if !model.init {
        return Err(GniError::ContractViolation("model is not initialized".to_string()));
    }
    if !is_empty {
        return Err(GniError::ContractViolation(format!(
            "{section} section is not empty"
        )));
    }
    Ok(())
}

/// Last value of `expr`, or an empty string.
pub(crate) fn text<D: DocumentQuery>(doc: &D, expr: &str, node: D::Node) -> String {
    doc.last_property(expr, node).unwrap_or_default()
}

/// Last value of `expr` as an integer, `0` when absent or not numeric.
pub(crate) fn int<D: DocumentQuery>(doc: &D, expr: &str, node: D::Node) -> i32 {
    doc.last_property(expr, node).map(|v| atoi(&v)).unwrap_or(0)
}

/// Last value of `expr` as a host-order address, `0` when absent.
pub(crate) fn addr<D: DocumentQuery>(doc: &D, expr: &str, node: D::Node) -> u32 {
    doc.last_property(expr, node).map(|v| dot2hex(&v)).unwrap_or(0)
}

/// Every value of `expr` as host-order addresses.
pub(crate) fn addrs<D: DocumentQuery>(doc: &D, expr: &str, node: D::Node) -> Vec<u32> {
    doc.property(expr, node).iter().map(|v| dot2hex(v)).collect()
}

/// Leading integer of `value`, `0` if there is none.
pub(crate) fn atoi(value: &str) -> i32 {
    let value = value.trim();
    let end = value
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    value[..end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParseContext;

    #[test]
    fn test_atoi() {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi(" -1 "), -1);
        assert_eq!(atoi("17abc"), 17);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
    }

    #[test]
    fn test_populate_mode_parse() {
        assert_eq!("all".parse::<PopulateMode>().unwrap(), PopulateMode::All);
        assert_eq!("CONFIG_ONLY".parse::<PopulateMode>().unwrap(), PopulateMode::ConfigOnly);
        assert_eq!("None".parse::<PopulateMode>().unwrap(), PopulateMode::None);
        assert!("some".parse::<PopulateMode>().is_err());
    }

    #[test]
    fn test_none_mode_is_noop() {
        let doc = ParseContext::new().parse("<bogus/>").unwrap();
        let model = populate(&doc, PopulateMode::None).unwrap();
        assert!(model.init);
        assert!(model.instances.is_empty());
    }

    #[test]
    fn test_wrong_root_is_fatal() {
        let doc = ParseContext::new().parse("<bogus/>").unwrap();
        let err = populate(&doc, PopulateMode::All).unwrap_err();
        assert!(matches!(err, GniError::FatalInput(_)));
    }

    #[test]
    fn test_locate_sections() {
        let doc = ParseContext::new()
            .parse("<network-data><configuration/><extra/><vpcs/></network-data>")
            .unwrap();
        let root = doc.root().unwrap();
        let sections = Sections::locate(&doc, root);
        assert!(sections.configuration.is_some());
        assert!(sections.vpcs.is_some());
        assert!(sections.instances.is_none());
        assert!(sections.dhcp_option_sets.is_none());
    }

    #[test]
    fn test_ensure_empty() {
        let model = NetworkModel::new();
        assert!(ensure_empty(&model, "instances", true).is_ok());
        assert!(matches!(
            ensure_empty(&model, "instances", false),
            Err(GniError::ContractViolation(_))
        ));
        assert!(ensure_empty(&NetworkModel::default(), "instances", true).is_err());
    }
}
