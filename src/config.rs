//! Runtime constants and user settings.
//!
//! The defaults live here as constants so they can be found in one place.
//! A JSON settings file, named by the `IP_INDICATOR_CONFIG` environment
//! variable, may override any of them:
//!
//! ```json
//! { "refresh_interval_secs": 30, "initial_mode": "wan_ipv4", "output": "waybar",
//!   "probes": { "vpn_interfaces": ["wg0", "tun0"] } }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::mode::Mode;
use crate::core::resolver::Probes;
use crate::error::AppError;
use crate::sink::OutputFormat;

/// Interval between label refreshes (seconds).
pub const REFRESH_INTERVAL_SECS: u64 = 20;

/// Upper bound on a single probe command (seconds).
pub const COMMAND_TIMEOUT_SECS: u64 = 5;

/// Public IPv4 destination whose outbound route names the LAN source address.
pub const LAN_IPV4_PROBE_TARGET: &str = "1.1.1.1";

/// IPv6 destination whose outbound route names the IPv6 source address.
pub const LAN_IPV6_PROBE_TARGET: &str = "2001::";

/// TXT record that answers with the querying client's address.
pub const WAN_QUERY_NAME: &str = "o-o.myaddr.l.google.com";

/// Authoritative server queried for [`WAN_QUERY_NAME`].
pub const WAN_RESOLVER: &str = "ns1.google.com";

/// Tunnel interfaces checked for VPN mode, in order.
pub const VPN_INTERFACES: [&str; 2] = ["vpn0", "tun0"];

/// Label shown before the first lookup completes.
pub const LOADING_TEXT: &str = "Loading...";

/// Environment variable naming the JSON settings file.
pub const CONFIG_ENV_VAR: &str = "IP_INDICATOR_CONFIG";

/// User-tunable settings. Every field is optional in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub refresh_interval_secs: u64,
    pub command_timeout_secs: u64,
    pub initial_mode: Mode,
    pub output: OutputFormat,
    pub probes: Probes,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: REFRESH_INTERVAL_SECS,
            command_timeout_secs: COMMAND_TIMEOUT_SECS,
            initial_mode: Mode::LanIpv4,
            output: OutputFormat::Plain,
            probes: Probes::default(),
        }
    }
}

impl Settings {
    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults if it is unset.
    pub fn load() -> Result<Self, AppError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("{}: {e}", path.display())))?;
        let settings = Self::from_json(&text)?;
        tracing::info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.refresh_interval_secs == 0 {
            return Err(AppError::InvalidInput("refresh_interval_secs must be positive".into()));
        }
        if self.command_timeout_secs == 0 {
            return Err(AppError::InvalidInput("command_timeout_secs must be positive".into()));
        }
        let programs = [
            &self.probes.lan_ipv4.program,
            &self.probes.lan_ipv6.program,
            &self.probes.wan_ipv4.program,
            &self.probes.interface_program,
        ];
        if programs.iter().any(|p| p.trim().is_empty()) {
            return Err(AppError::InvalidInput("probe program must not be empty".into()));
        }
        if self.probes.vpn_interfaces.is_empty() {
            return Err(AppError::InvalidInput("vpn_interfaces must list at least one interface".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
