use anyhow::{anyhow, Context, Result};
use std::net::IpAddr;
use tokio::net::lookup_host;

/// Resolve a hostname or literal IP to the address the scan will target.
///
/// Literal addresses short-circuit DNS entirely. For hostnames the first IPv4
/// record wins, falling back to the first address of any family.
pub async fn resolve_target(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs: Vec<IpAddr> = lookup_host((host, 0u16))
        .await
        .with_context(|| format!("failed to resolve host: {host}"))?
        .map(|sock| sock.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| anyhow!("DNS lookup returned no addresses for {host}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn literal_ipv4_skips_dns() {
        let ip = resolve_target("192.0.2.7").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)));
    }

    #[tokio::test]
    async fn literal_ipv6_skips_dns() {
        let ip = resolve_target("::1").await.unwrap();
        assert_eq!(ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn localhost_resolves() {
        // `localhost` is present in /etc/hosts on any platform we run tests on.
        let ip = resolve_target("localhost").await.unwrap();
        assert!(ip.is_loopback());
    }
}
