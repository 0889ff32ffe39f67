//! Per-mode address lookup.
//!
//! Each mode maps to one probe command and one extraction rule from
//! [`parse`](super::parse). Failures are logged with their kind and flattened
//! to an empty address, which the display renders as `"LAN: "`.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::core::mode::Mode;
use crate::core::parse;
use crate::core::runner::{CommandRunner, CommandSpec};
use crate::error::ResolveError;

/// Commands used to look up each kind of address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Probes {
    pub lan_ipv4: CommandSpec,
    pub lan_ipv6: CommandSpec,
    pub wan_ipv4: CommandSpec,
    /// Program invoked as `<interface_program> <iface>` for VPN mode.
    pub interface_program: String,
    /// Tunnel interfaces tried in order; the first one with an address wins.
    pub vpn_interfaces: Vec<String>,
}

impl Default for Probes {
    fn default() -> Self {
        let server = format!("@{}", config::WAN_RESOLVER);
        Self {
            lan_ipv4: CommandSpec::new("ip", ["route", "get", config::LAN_IPV4_PROBE_TARGET]),
            lan_ipv6: CommandSpec::new("ip", ["route", "get", config::LAN_IPV6_PROBE_TARGET]),
            // Force IPv4 transport: an IPv6 query would not report the NAT address.
            wan_ipv4: CommandSpec::new(
                "dig",
                ["TXT", "+short", config::WAN_QUERY_NAME, server.as_str(), "-4"],
            ),
            interface_program: "ifconfig".to_string(),
            vpn_interfaces: config::VPN_INTERFACES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Probes {
    fn interface_command(&self, iface: &str) -> CommandSpec {
        CommandSpec::new(&self.interface_program, [iface])
    }
}

/// Looks up the address for a mode using a [`CommandRunner`].
pub struct AddressResolver<R> {
    runner: R,
    probes: Probes,
}

impl<R: CommandRunner> AddressResolver<R> {
    pub fn new(runner: R, probes: Probes) -> Self {
        Self { runner, probes }
    }

    /// Address for `mode`, or an empty string if it could not be determined.
    pub async fn resolve(&self, mode: Mode) -> String {
        match self.try_resolve(mode).await {
            Ok(address) => {
                tracing::debug!(%mode, %address, "address resolved");
                address
            }
            Err(e) => {
                tracing::debug!(%mode, kind = e.kind(), "address lookup failed: {e}");
                String::new()
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but keeps the failure kind.
    pub async fn try_resolve(&self, mode: Mode) -> Result<String, ResolveError> {
        match mode {
            Mode::LanIpv4 => self.route_source(&self.probes.lan_ipv4).await,
            Mode::LanIpv6 => self.route_source(&self.probes.lan_ipv6).await,
            Mode::WanIpv4 => {
                let spec = &self.probes.wan_ipv4;
                let output = self.runner.run(spec).await?;
                let candidate = parse::unquote_txt(&output);
                if candidate.is_empty() {
                    return Err(ResolveError::NoMatch(spec.to_string()));
                }
                parse::wan_address(&output).ok_or(ResolveError::MalformedOutput(candidate))
            }
            Mode::Vpn => self.tunnel_address().await,
        }
    }

    async fn route_source(&self, spec: &CommandSpec) -> Result<String, ResolveError> {
        let output = self.runner.run(spec).await?;
        parse::route_source(&output).ok_or_else(|| ResolveError::NoMatch(spec.to_string()))
    }

    /// First tunnel interface carrying an IPv4 address. When none does, the
    /// error from the last interface tried is returned.
    async fn tunnel_address(&self) -> Result<String, ResolveError> {
        let mut last_err = None;
        for iface in &self.probes.vpn_interfaces {
            let spec = self.probes.interface_command(iface);
            match self.runner.run(&spec).await {
                Ok(output) => match parse::interface_inet(&output) {
                    Some(address) => return Ok(address),
                    None => last_err = Some(ResolveError::NoMatch(spec.to_string())),
                },
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| ResolveError::NoMatch("no VPN interfaces configured".into())))
    }
}
