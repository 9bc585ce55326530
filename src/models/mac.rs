//! 48-bit MAC addresses packed into an integer.

use serde::{Deserialize, Serialize};

/// MAC address packed into the low 48 bits of a `u64`. Zero means unset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MacAddr(pub u64);

impl MacAddr {
    /// Parse `aa:bb:cc:dd:ee:ff` (`-` separators are accepted too).
    pub fn parse(mac: &str) -> Option<MacAddr> {
        let octets: Vec<&str> = mac.trim().split([':', '-']).collect();
        if octets.len() != 6 {
            return None;
        }
        let mut packed: u64 = 0;
        for octet in octets {
            if octet.is_empty() || octet.len() > 2 {
                return None;
            }
            let byte = u8::from_str_radix(octet, 16).ok()?;
            packed = (packed << 8) | byte as u64;
        }
        Some(MacAddr(packed))
    }

    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub fn octets(&self) -> [u8; 6] {
        let b = self.0.to_be_bytes();
        [b[2], b[3], b[4], b[5], b[6], b[7]]
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let o = self.octets();
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mac() {
        let mac = MacAddr::parse("D0:0D:12:34:56:78").unwrap();
        assert_eq!(mac.0, 0xD00D_1234_5678);
        assert_eq!(mac.to_string(), "d0:0d:12:34:56:78");
        assert!(mac.is_set());
    }

    #[test]
    fn test_parse_mac_invalid() {
        assert!(MacAddr::parse("d0:0d:12:34:56").is_none());
        assert!(MacAddr::parse("d0:0d:12:34:56:zz").is_none());
        assert!(MacAddr::parse("d0:0d:12:34:56:789").is_none());
        assert!(!MacAddr::default().is_set());
    }
}
