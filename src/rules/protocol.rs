//! IP protocol numbers and the names the packet filter knows them by.

/// `(number, name)` pairs, sorted by number.
const PROTOCOLS: &[(i32, &str)] = &[
    (0, "ip"),
    (1, "icmp"),
    (2, "igmp"),
    (4, "ipencap"),
    (6, "tcp"),
    (8, "egp"),
    (17, "udp"),
    (41, "ipv6"),
    (47, "gre"),
    (50, "esp"),
    (51, "ah"),
    (58, "ipv6-icmp"),
    (89, "ospf"),
    (94, "ipip"),
    (112, "vrrp"),
    (132, "sctp"),
];

/// Registered name of a protocol number.
///
/// # Examples
/// ```
/// use gni_model::rules::protocol_name;
/// assert_eq!(protocol_name(6), Some("tcp"));
/// assert_eq!(protocol_name(250), None);
/// ```
pub fn protocol_name(number: i32) -> Option<&'static str> {
    PROTOCOLS
        .binary_search_by_key(&number, |(n, _)| *n)
        .ok()
        .map(|idx| PROTOCOLS[idx].1)
}

/// True for any number that fits the 8-bit protocol field.
pub fn is_valid_protocol_number(number: i32) -> bool {
    (0..=255).contains(&number)
}
