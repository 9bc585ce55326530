//! IPv4 address and CIDR notation utilities.
//!
//! The model stores addresses as 32-bit host-order integers so equality and
//! ordering are plain integer comparisons. [`Ipv4`] is used where a
//! `a.b.c.d/n` range has to be checked.

use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Loopback address in host order.
pub const LOCALHOST: u32 = 0x7F00_0001;

/// Convert a dotted-decimal string to a host-order integer.
///
/// Unparseable input yields `0`, which the validator treats as "unset".
///
/// # Examples
/// ```
/// use gni_model::models::dot2hex;
/// assert_eq!(dot2hex("10.0.0.1"), 0x0A000001);
/// assert_eq!(dot2hex("bogus"), 0);
/// ```
pub fn dot2hex(addr: &str) -> u32 {
    match Ipv4Addr::from_str(addr.trim()) {
        Ok(ip) => u32::from(ip),
        Err(_) => {
            log::debug!("cannot parse '{addr}' as an IPv4 address");
            0
        }
    }
}

/// Convert a host-order integer back to dotted-decimal.
pub fn hex2dot(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use gni_model::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24), Some(0xFFFFFF00));
/// assert_eq!(get_cidr_mask(33), None);
/// ```
pub fn get_cidr_mask(len: u8) -> Option<u32> {
    if len > MAX_LENGTH {
        None
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;
        Some(((all_bits >> right_len) << right_len) as u32)
    }
}

/// Prefix length of a contiguous netmask, `None` for a non-contiguous one.
pub fn netmask_to_prefix(netmask: u32) -> Option<u8> {
    let prefix = netmask.leading_ones() as u8;
    match get_cidr_mask(prefix) {
        Some(mask) if mask == netmask => Some(prefix),
        _ => None,
    }
}

/// Split `a.b.c.d/n` (or a bare address, meaning `/32`) into its address and
/// prefix length.
///
/// # Returns
/// * `Some((addr, prefix))` - Host-order address and prefix length
/// * `None` - If either part does not parse
pub fn split_cidr(cidr: &str) -> Option<(u32, u8)> {
    let cidr = cidr.trim();
    if cidr.contains('/') {
        let ipv4 = Ipv4::new(cidr)?;
        Some((u32::from(ipv4.addr), ipv4.mask))
    } else {
        let addr = Ipv4Addr::from_str(cidr).ok()?;
        Some((u32::from(addr), MAX_LENGTH))
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Option<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    Some(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Option<Ipv4Addr> {
    let mask = get_cidr_mask(len)?;
    let network_bits = u32::from(addr) & mask;
    Some(Ipv4Addr::from(network_bits | !mask))
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Option<Ipv4> {
        let (addr, mask) = addr_cidr.trim().split_once('/')?;
        let addr = Ipv4Addr::from_str(addr).ok()?;
        let mask = u8::from_str(mask).ok()?;
        if mask > MAX_LENGTH {
            return None;
        }
        Some(Ipv4 { addr, mask })
    }

    /// Lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        cut_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// Highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// True if `addr` (host order) falls inside this subnet.
    pub fn contains(&self, addr: u32) -> bool {
        u32::from(self.lo()) <= addr && addr <= u32::from(self.hi())
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot2hex_hex2dot() {
        assert_eq!(dot2hex("192.168.1.42"), 0xC0A8012A);
        assert_eq!(hex2dot(0xC0A8012A), "192.168.1.42");
        assert_eq!(dot2hex(" 127.0.0.1 "), LOCALHOST);
        assert_eq!(dot2hex(""), 0);
        assert_eq!(dot2hex("10.0.0"), 0);
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0), Some(0x00000000));
        assert_eq!(get_cidr_mask(8), Some(0xFF000000));
        assert_eq!(get_cidr_mask(16), Some(0xFFFF0000));
        assert_eq!(get_cidr_mask(32), Some(0xFFFFFFFF));
        assert!(get_cidr_mask(33).is_none());
    }

    #[test]
    fn test_netmask_to_prefix() {
        assert_eq!(netmask_to_prefix(0xFFFFFF00), Some(24));
        assert_eq!(netmask_to_prefix(0), Some(0));
        assert_eq!(netmask_to_prefix(0xFF00FF00), None);
    }

    #[test]
    fn test_split_cidr() {
        assert_eq!(split_cidr("10.0.0.0/24"), Some((0x0A000000, 24)));
        assert_eq!(split_cidr("10.0.0.7"), Some((0x0A000007, 32)));
        assert_eq!(split_cidr("10.0.0.0/40"), None);
        assert_eq!(split_cidr("sg-1234"), None);
    }

    #[test]
    fn test_cut_and_broadcast() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        assert_eq!(cut_addr(ip, 24), Some(Ipv4Addr::new(192, 168, 1, 0)));
        assert_eq!(broadcast_addr(ip, 16), Some(Ipv4Addr::new(192, 168, 255, 255)));
        assert!(cut_addr(ip, 33).is_none());
    }

    #[test]
    fn test_ipv4_contains() {
        let net = Ipv4::new("10.1.0.0/16").unwrap();
        assert!(net.contains(dot2hex("10.1.200.3")));
        assert!(!net.contains(dot2hex("10.2.0.1")));
        assert_eq!(net.to_string(), "10.1.0.0/16");
        assert!(Ipv4::new("10.1.0.0").is_none());
    }
}
