//! Self identification and security group chain names.

use crate::config::{CHAIN_NAME_MAX_LEN, CHAIN_PREFIX};
use crate::error::{GniError, Result};
use crate::models::{hex2dot, Cluster, NetworkModel, Node, SecurityGroup};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use std::net::Ipv4Addr;

/// Answers whether an address belongs to this host.
pub trait LocalAddress {
    fn is_local(&self, ip: &str) -> bool;
}

/// A fixed list of local addresses, usually taken from `GNI_LOCAL_ADDRS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLocalAddresses {
    addrs: Vec<Ipv4Addr>,
}

impl StaticLocalAddresses {
    /// Entries that are not dotted-quad addresses are skipped with a warning.
    pub fn new<I, S>(addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addrs = addrs
            .into_iter()
            .filter_map(|a| match a.as_ref().trim().parse::<Ipv4Addr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    log::warn!("ignoring invalid local address '{}'", a.as_ref());
                    None
                }
            })
            .collect();
        StaticLocalAddresses { addrs }
    }
}

impl LocalAddress for StaticLocalAddresses {
    fn is_local(&self, ip: &str) -> bool {
        ip.trim()
            .parse::<Ipv4Addr>()
            .is_ok_and(|addr| self.addrs.contains(&addr))
    }
}

/// Cluster this host belongs to.
///
/// Clusters are checked in document order. A cluster matches when its
/// enabled controller address or one of its node names is local; the first
/// matching cluster wins.
pub fn find_self_cluster<'m>(model: &'m NetworkModel, local: &impl LocalAddress) -> Option<&'m Cluster> {
    model.clusters.iter().find(|c| {
        (c.enabled_cc_ip != 0 && local.is_local(&hex2dot(c.enabled_cc_ip)))
            || c.nodes.iter().any(|n| local.is_local(&n.name))
    })
}

/// First node, across clusters in document order, whose name is a local address.
pub fn find_self_node<'m>(model: &'m NetworkModel, local: &impl LocalAddress) -> Option<&'m Node> {
    model
        .clusters
        .iter()
        .flat_map(|c| c.nodes.iter())
        .find(|n| local.is_local(&n.name))
}

/// Produces the short hash embedded in a chain name.
pub trait ChainHasher {
    fn short_hash(&self, input: &str) -> String;
}

impl<F> ChainHasher for F
where
    F: Fn(&str) -> String,
{
    fn short_hash(&self, input: &str) -> String {
        self(input)
    }
}

/// SHA-256, URL-safe base64, cut so the chain name fits the packet-filter limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256ChainHasher;

impl ChainHasher for Sha256ChainHasher {
    fn short_hash(&self, input: &str) -> String {
        let mut encoded = URL_SAFE_NO_PAD.encode(Sha256::digest(input.as_bytes()));
        encoded.truncate(CHAIN_NAME_MAX_LEN - CHAIN_PREFIX.len());
        encoded
    }
}

/// `EU_<hash>` chain name of a security group, hashed over `<accountId>-<name>`.
///
/// # Returns
/// * `Ok(String)` - The chain name
/// * `Err(GniError::ConversionFailure)` - The hasher returned nothing
/// * `Err(GniError::ValueTooLong)` - The chain name exceeds the packet-filter limit
pub fn secgroup_chain_name(secgroup: &SecurityGroup, hasher: &impl ChainHasher) -> Result<String> {
    let hash = hasher.short_hash(&format!("{}-{}", secgroup.account_id, secgroup.name));
    if hash.is_empty() {
        log::error!(
            "could not create iptables compatible chain name for sec. group ({})",
            secgroup.name
        );
        return Err(GniError::conversion(format!(
            "empty chain hash for {}",
            secgroup.name
        )));
    }
    let chain = format!("{CHAIN_PREFIX}{hash}");
    if chain.len() > CHAIN_NAME_MAX_LEN {
        return Err(GniError::ValueTooLong {
            field: format!("chain name of {}", secgroup.name),
            len: chain.len(),
            max: CHAIN_NAME_MAX_LEN,
        });
    }
    Ok(chain)
}
