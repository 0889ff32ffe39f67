//! Address extraction from probe command output.
//!
//! The output formats of `ip`, `dig` and `ifconfig` are external contracts, so
//! each rule lives in its own pure function pinned to literal fixtures below.

/// Value of the first whitespace-delimited token following `key`.
fn value_after<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    output
        .split_whitespace()
        .skip_while(|&tok| tok != key)
        .nth(1)
}

/// Source address from `ip route get <dst>` output (`... src 10.0.0.5 ...`).
pub fn route_source(output: &str) -> Option<String> {
    value_after(output, "src").map(str::to_string)
}

/// First IPv4 address from `ifconfig <iface>` output.
///
/// Accepts both `inet 10.8.0.2` and the net-tools 1.x `inet addr:10.8.0.2`
/// spellings. `inet6` lines never match.
pub fn interface_inet(output: &str) -> Option<String> {
    let value = value_after(output, "inet")?;
    let value = value.strip_prefix("addr:").unwrap_or(value);
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Strip quoting from a `dig TXT +short` answer and return its first line.
pub fn unquote_txt(output: &str) -> String {
    output
        .lines()
        .map(|line| line.trim().replace('"', ""))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

/// Loose dotted-quad check: four non-empty period-separated segments, no whitespace.
pub fn looks_like_ipv4(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let segments: Vec<&str> = candidate.split('.').collect();
    segments.len() == 4 && segments.iter().all(|s| !s.is_empty())
}

/// Public address from the resolver's TXT answer, or `None` if it is not address-shaped.
pub fn wan_address(output: &str) -> Option<String> {
    let candidate = unquote_txt(output);
    looks_like_ipv4(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_source_ipv4() {
        let out = "1.2.3.4 dev eth0 src 10.0.0.5 uid 1000";
        assert_eq!(route_source(out).as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_route_source_real_ip_output() {
        let out = "1.1.1.1 via 192.168.1.1 dev wlp2s0 src 192.168.1.42 uid 1000 \n    cache \n";
        assert_eq!(route_source(out).as_deref(), Some("192.168.1.42"));
    }

    #[test]
    fn test_route_source_ipv6() {
        let out = "2001:: from :: via fe80::1 dev eth0 proto ra src 2a02:8070:1:2::7 metric 100 pref medium\n";
        assert_eq!(route_source(out).as_deref(), Some("2a02:8070:1:2::7"));
    }

    #[test]
    fn test_route_source_unreachable() {
        assert_eq!(route_source("RTNETLINK answers: Network is unreachable\n"), None);
        assert_eq!(route_source(""), None);
    }

    #[test]
    fn test_route_source_trailing_src_without_value() {
        assert_eq!(route_source("1.2.3.4 dev eth0 src"), None);
    }

    #[test]
    fn test_interface_inet_modern_format() {
        let out = "vpn0: flags=4305<UP,POINTOPOINT,RUNNING,NOARP,MULTICAST>  mtu 1500\n        inet 10.8.0.2  netmask 255.255.255.0  destination 10.8.0.2\n        inet6 fe80::1  prefixlen 64\n";
        assert_eq!(interface_inet(out).as_deref(), Some("10.8.0.2"));
    }

    #[test]
    fn test_interface_inet_single_line_fixture() {
        let out = "vpn0: flags=... inet 10.8.0.2 netmask ...";
        assert_eq!(interface_inet(out).as_deref(), Some("10.8.0.2"));
    }

    #[test]
    fn test_interface_inet_net_tools_format() {
        let out = "tun0      Link encap:UNSPEC\n          inet addr:10.9.0.6  P-t-P:10.9.0.5  Mask:255.255.255.255\n";
        assert_eq!(interface_inet(out).as_deref(), Some("10.9.0.6"));
    }

    #[test]
    fn test_interface_inet_ignores_inet6_only() {
        let out = "tun0: flags=4305<UP>  mtu 1500\n        inet6 fe80::abcd  prefixlen 64\n";
        assert_eq!(interface_inet(out), None);
    }

    #[test]
    fn test_interface_inet_missing_device() {
        let out = "vpn0: error fetching interface information: Device not found\n";
        assert_eq!(interface_inet(out), None);
    }

    #[test]
    fn test_wan_address_quoted() {
        assert_eq!(wan_address("\"203.0.113.7\"\n").as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_wan_address_rejects_non_ip() {
        assert_eq!(wan_address("\"not-an-ip\"\n"), None);
    }

    #[test]
    fn test_wan_address_empty_and_error_output() {
        assert_eq!(wan_address(""), None);
        assert_eq!(wan_address(";; connection timed out; no servers could be reached\n"), None);
    }

    #[test]
    fn test_wan_address_takes_first_line() {
        let out = "\"198.51.100.20\"\n\"edns0-client-subnet 198.51.100.0/24\"\n";
        assert_eq!(wan_address(out).as_deref(), Some("198.51.100.20"));
    }

    #[test]
    fn test_looks_like_ipv4() {
        assert!(looks_like_ipv4("1.2.3.4"));
        assert!(!looks_like_ipv4("1.2.3"));
        assert!(!looks_like_ipv4("1..3.4"));
        assert!(!looks_like_ipv4("1.2.3.4.5"));
        assert!(!looks_like_ipv4("1.2 .3.4"));
    }
}
