//! Constants and runtime settings.
//!
//! Runtime settings come from the environment (optionally a `.env` file loaded
//! by the binary with `dotenv`).

use crate::builder::PopulateMode;
use std::env;

/// Lowest VLAN index a managed subnet may use.
pub const MIN_VLAN_EUCA: i32 = 2;
/// Highest VLAN index a managed subnet may use.
pub const MAX_VLAN_EUCA: i32 = 4095;
/// Smallest managed subnet segment size.
pub const MIN_SEGMENT_SIZE: i32 = 16;

/// Packet mark set on traffic that is source-NAT'd in EDGE mode.
pub const MARK_EDGE_SNAT: &str = "0x2a";
/// Packet mark set on traffic that is source-NAT'd in MANAGED modes.
pub const MARK_MANAGED_SNAT: &str = "0x15";

/// Prefix of every security group chain name.
pub const CHAIN_PREFIX: &str = "EU_";
/// Packet-filter chain names are limited to 28 characters.
pub const CHAIN_NAME_MAX_LEN: usize = 28;

// Field limits enforced by the validator
pub const RESOURCE_ID_MAX_LEN: usize = 32;
pub const ACCOUNT_ID_MAX_LEN: usize = 128;
pub const HOSTNAME_MAX_LEN: usize = 255;
pub const MAC_PREFIX_MAX_LEN: usize = 5;
pub const CIDR_MAX_LEN: usize = 18;

/// Default location of the network document.
pub const DEFAULT_XML_PATH: &str = "global_network_info.xml";

/// Settings for one run of the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub xml_path: String,
    pub populate_mode: PopulateMode,
    /// Addresses owned by this host, used for self identification.
    pub local_addrs: Vec<String>,
    pub snapshot_dir: Option<String>,
    /// `(ip, hostname)` pairs for the hostname cache.
    pub hostnames: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            xml_path: DEFAULT_XML_PATH.to_string(),
            populate_mode: PopulateMode::All,
            local_addrs: Vec::new(),
            snapshot_dir: None,
            hostnames: Vec::new(),
        }
    }
}

impl Config {
    /// Read settings from `GNI_*` environment variables.
    ///
    /// # Returns
    /// * `Ok(Config)` - Settings, defaults filled in for anything unset
    /// * `Err` - If `GNI_POPULATE_MODE` holds an unknown mode
    pub fn from_env() -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = Config::default();

        if let Ok(path) = env::var("GNI_XML_PATH") {
            config.xml_path = path;
        }
        if let Ok(mode) = env::var("GNI_POPULATE_MODE") {
            config.populate_mode = mode.parse()?;
        }
        if let Ok(addrs) = env::var("GNI_LOCAL_ADDRS") {
            config.local_addrs = split_list(&addrs);
        }
        if let Ok(dir) = env::var("GNI_SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                config.snapshot_dir = Some(dir.trim().to_string());
            }
        }
        if let Ok(pairs) = env::var("GNI_HOSTNAMES") {
            config.hostnames = parse_hostnames(&pairs);
        }

        log::debug!("config: {config:?}");
        Ok(config)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parse `ip=hostname,ip=hostname` pairs, skipping malformed entries.
pub fn parse_hostnames(value: &str) -> Vec<(String, String)> {
    split_list(value)
        .into_iter()
        .filter_map(|pair| match pair.split_once('=') {
            Some((ip, host)) if !ip.trim().is_empty() && !host.trim().is_empty() => {
                Some((ip.trim().to_string(), host.trim().to_string()))
            }
            _ => {
                log::warn!("ignoring malformed hostname entry '{pair}'");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" 10.0.0.1, ,10.0.0.2 "),
            vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_hostnames() {
        let pairs = parse_hostnames("10.0.0.1=node1,bogus,10.0.0.2 = node2");
        assert_eq!(
            pairs,
            vec![
                ("10.0.0.1".to_string(), "node1".to_string()),
                ("10.0.0.2".to_string(), "node2".to_string())
            ]
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.xml_path, DEFAULT_XML_PATH);
        assert_eq!(config.populate_mode, PopulateMode::All);
        assert!(config.snapshot_dir.is_none());
    }
}
