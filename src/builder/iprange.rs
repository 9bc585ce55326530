//! Expansion of `A-B` / `A` address range lists into individual addresses.

use crate::error::{GniError, Result};
use crate::models::{dot2hex, LOCALHOST};

/// Addresses produced by [`IpRangeList::expand`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpRangeList {
    /// Every address of every accepted range, in input order.
    pub addrs: Vec<u32>,
    /// Set when at least one entry was rejected.
    pub rejected: bool,
}

/// Split one entry into its start and end strings.
fn split_range(entry: &str) -> Option<(&str, &str)> {
    match entry.split_once('-') {
        Some((_, "")) => None,
        Some((start, end)) => Some((start.trim(), end.trim())),
        None => Some((entry.trim(), entry.trim())),
    }
}

impl IpRangeList {
    /// Expand every entry of `ranges`.
    ///
    /// A malformed entry, a reversed range or a range touching the loopback
    /// address is logged and skipped; the remaining entries are still
    /// expanded and [`IpRangeList::rejected`] is set.
    ///
    /// # Returns
    /// * `Err(GniError::ResourceExhaustion)` - If the addresses cannot be stored
    pub fn expand<S: AsRef<str>>(ranges: &[S]) -> Result<IpRangeList> {
        let mut list = IpRangeList::default();
        for entry in ranges.iter().map(|r| r.as_ref()) {
            log::trace!("parsing input range: {entry}");
            let Some((start, end)) = split_range(entry) else {
                log::error!("empty end range from input '{entry}': check network config");
                list.rejected = true;
                continue;
            };
            let (startb, endb) = (dot2hex(start), dot2hex(end));
            if startb > endb || startb == LOCALHOST || endb == LOCALHOST {
                log::error!(
                    "end range '{end}' is smaller than start range '{start}' from input '{entry}': check network config"
                );
                list.rejected = true;
                continue;
            }
            let count = (endb - startb) as usize + 1;
            list.addrs.try_reserve(count).map_err(|e| {
                GniError::ResourceExhaustion(format!("cannot expand range '{entry}': {e}"))
            })?;
            list.addrs.extend(startb..=endb);
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_range_and_single() {
        let list = IpRangeList::expand(&["10.0.0.1-10.0.0.3", "10.0.1.1"]).unwrap();
        assert_eq!(
            list.addrs,
            vec![0x0A000001, 0x0A000002, 0x0A000003, 0x0A000101]
        );
        assert!(!list.rejected);
    }

    #[test]
    fn test_reversed_range_rejected_others_kept() {
        let list = IpRangeList::expand(&["10.0.0.5-10.0.0.1", "10.0.0.9"]).unwrap();
        assert_eq!(list.addrs, vec![0x0A000009]);
        assert!(list.rejected);
    }

    #[test]
    fn test_empty_end_rejected() {
        let list = IpRangeList::expand(&["10.0.0.5-"]).unwrap();
        assert!(list.addrs.is_empty());
        assert!(list.rejected);
    }

    #[test]
    fn test_localhost_rejected() {
        let list = IpRangeList::expand(&["127.0.0.1", "127.0.0.0-127.0.0.1"]).unwrap();
        assert!(list.addrs.is_empty());
        assert!(list.rejected);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(IpRangeList::expand(&empty).unwrap(), IpRangeList::default());
    }
}
