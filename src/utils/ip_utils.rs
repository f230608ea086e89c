//! IPv4 helper functions for CIDR validation.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

/// Check if an IPv4 address is in RFC 1918 private space
///
/// Covers 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
pub fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    // 10.0.0.0/8
    octets[0] == 10 ||
    // 172.16.0.0/12
    (octets[0] == 172 && (16..=31).contains(&octets[1])) ||
    // 192.168.0.0/16
    (octets[0] == 192 && octets[1] == 168)
}

/// Check if every address of a block lies in RFC 1918 private space
///
/// The private ranges are aligned blocks, so checking both ends is enough.
pub fn is_private_net(net: &Ipv4Net) -> bool {
    is_private_ipv4(net.network()) && is_private_ipv4(net.broadcast())
}

/// Parse a CIDR string such as `192.168.128.0/24`
///
/// Host bits must be zero: `10.0.0.1/24` is rejected rather than silently truncated.
pub fn parse_ipv4_net(cidr: &str) -> Result<Ipv4Net, String> {
    let net: Ipv4Net = cidr
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an IPv4 CIDR block", cidr))?;
    if net.trunc() != net {
        return Err(format!("'{}' has host bits set (did you mean {}?)", cidr, net.trunc()));
    }
    Ok(net)
}

/// Usable host range of a block as inclusive `u32` bounds
///
/// /31 and /32 blocks have no network or broadcast address, so every
/// address is usable. Larger blocks exclude both.
pub fn host_bounds(net: &Ipv4Net) -> (u32, u32) {
    let network = u32::from(net.network());
    let broadcast = u32::from(net.broadcast());
    if net.prefix_len() >= 31 {
        (network, broadcast)
    } else {
        (network + 1, broadcast - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ranges() {
        assert!(is_private_ipv4(Ipv4Addr::new(10, 1, 2, 3)));
        assert!(is_private_ipv4(Ipv4Addr::new(172, 16, 0, 1)));
        assert!(is_private_ipv4(Ipv4Addr::new(172, 31, 255, 254)));
        assert!(is_private_ipv4(Ipv4Addr::new(192, 168, 1, 1)));
        assert!(!is_private_ipv4(Ipv4Addr::new(172, 32, 0, 1)));
        assert!(!is_private_ipv4(Ipv4Addr::new(8, 8, 8, 8)));
        assert!(!is_private_ipv4(Ipv4Addr::new(127, 0, 0, 1)));
    }

    #[test]
    fn test_private_net_must_fit_entirely() {
        assert!(is_private_net(&"10.0.0.0/8".parse().unwrap()));
        assert!(is_private_net(&"172.16.0.0/12".parse().unwrap()));
        assert!(!is_private_net(&"10.0.0.0/7".parse().unwrap()));
        assert!(!is_private_net(&"172.0.0.0/8".parse().unwrap()));
        assert!(!is_private_net(&"203.0.113.0/24".parse().unwrap()));
    }

    #[test]
    fn test_parse_rejects_host_bits() {
        assert!(parse_ipv4_net("10.0.0.0/24").is_ok());
        assert!(parse_ipv4_net(" 10.0.0.0/24 ").is_ok());
        assert!(parse_ipv4_net("10.0.0.1/24").is_err());
        assert!(parse_ipv4_net("10.0.0.0").is_err());
        assert!(parse_ipv4_net("not-a-cidr").is_err());
    }

    #[test]
    fn test_host_bounds() {
        let net = parse_ipv4_net("10.0.0.0/30").unwrap();
        assert_eq!(host_bounds(&net), (u32::from(Ipv4Addr::new(10, 0, 0, 1)), u32::from(Ipv4Addr::new(10, 0, 0, 2))));

        let p2p = parse_ipv4_net("10.0.0.0/31").unwrap();
        assert_eq!(host_bounds(&p2p), (u32::from(Ipv4Addr::new(10, 0, 0, 0)), u32::from(Ipv4Addr::new(10, 0, 0, 1))));

        let single = parse_ipv4_net("10.0.0.7/32").unwrap();
        assert_eq!(host_bounds(&single).0, host_bounds(&single).1);
    }
}
