//! IP to hostname lookup table.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hostname {
    pub ip: u32,
    pub hostname: String,
}

/// Hostnames sorted by address, searched with a binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameCache {
    entries: Vec<Hostname>,
}

impl HostnameCache {
    /// Build the cache from `(ip, hostname)` pairs. Pairs whose address does
    /// not parse are skipped.
    pub fn new<I, A, H>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, H)>,
        A: AsRef<str>,
        H: Into<String>,
    {
        let mut entries: Vec<Hostname> = pairs
            .into_iter()
            .filter_map(|(ip, hostname)| match Ipv4Addr::from_str(ip.as_ref().trim()) {
                Ok(addr) => Some(Hostname {
                    ip: u32::from(addr),
                    hostname: hostname.into(),
                }),
                Err(_) => {
                    log::warn!("skipping hostname entry with bad address '{}'", ip.as_ref());
                    None
                }
            })
            .collect();
        entries.sort_by_key(|h| h.ip);
        HostnameCache { entries }
    }

    /// Look up the hostname of a dotted-decimal address.
    ///
    /// A value that is not an address (e.g. already a hostname) is a miss.
    pub fn lookup(&self, ip_address: &str) -> Option<&str> {
        let addr = match Ipv4Addr::from_str(ip_address.trim()) {
            Ok(addr) => u32::from(addr),
            Err(_) => {
                log::trace!("not an address, no hostname lookup for '{ip_address}'");
                return None;
            }
        };
        self.entries
            .binary_search_by_key(&addr, |h| h.ip)
            .ok()
            .map(|idx| self.entries[idx].hostname.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hostname> {
        self.entries.iter()
    }
}
