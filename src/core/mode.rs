//! Display modes and the click-driven rotation between them.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Which address the indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Source address of the outbound IPv4 route.
    #[default]
    LanIpv4,
    /// Source address of the outbound IPv6 route.
    LanIpv6,
    /// Public IPv4 address as reported by an external resolver.
    WanIpv4,
    /// Address on the VPN tunnel interface.
    Vpn,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::LanIpv4, Mode::LanIpv6, Mode::WanIpv4, Mode::Vpn];

    /// The next mode in the fixed cycle LAN → IP6 → WAN → VPN → LAN.
    pub fn next(self) -> Mode {
        match self {
            Mode::LanIpv4 => Mode::LanIpv6,
            Mode::LanIpv6 => Mode::WanIpv4,
            Mode::WanIpv4 => Mode::Vpn,
            Mode::Vpn => Mode::LanIpv4,
        }
    }

    /// Short label shown before the address.
    pub fn label(self) -> &'static str {
        match self {
            Mode::LanIpv4 => "LAN",
            Mode::LanIpv6 => "IP6",
            Mode::WanIpv4 => "WAN",
            Mode::Vpn => "VPN",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render the label text for a mode. An empty address yields `"LAN: "`.
pub fn format_label(mode: Mode, address: &str) -> String {
    format!("{}: {}", mode.label(), address)
}

/// Holds the currently selected mode for one indicator instance.
#[derive(Debug)]
pub struct ModeCycle {
    initial: Mode,
    current: Mutex<Mode>,
}

impl ModeCycle {
    pub fn new(initial: Mode) -> Self {
        Self {
            initial,
            current: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> Mode {
        *self.current.lock().unwrap()
    }

    /// Step to the next mode and return it.
    pub fn advance(&self) -> Mode {
        let mut current = self.current.lock().unwrap();
        *current = current.next();
        *current
    }

    /// Return to the mode this cycle was created with.
    pub fn reset(&self) {
        *self.current.lock().unwrap() = self.initial;
    }
}

impl Default for ModeCycle {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_lan_ipv4() {
        assert_eq!(Mode::default(), Mode::LanIpv4);
        assert_eq!(ModeCycle::default().current(), Mode::LanIpv4);
    }

    #[test]
    fn test_next_follows_fixed_order() {
        assert_eq!(Mode::LanIpv4.next(), Mode::LanIpv6);
        assert_eq!(Mode::LanIpv6.next(), Mode::WanIpv4);
        assert_eq!(Mode::WanIpv4.next(), Mode::Vpn);
        assert_eq!(Mode::Vpn.next(), Mode::LanIpv4);
    }

    #[test]
    fn test_four_steps_return_to_start_for_every_mode() {
        for start in Mode::ALL {
            let mut m = start;
            for _ in 0..4 {
                m = m.next();
            }
            assert_eq!(m, start, "cycle from {start:?} did not close");
        }
    }

    #[test]
    fn test_next_is_a_bijection() {
        let mut images: Vec<Mode> = Mode::ALL.iter().map(|m| m.next()).collect();
        images.sort_by_key(|m| m.label());
        let mut all = Mode::ALL.to_vec();
        all.sort_by_key(|m| m.label());
        assert_eq!(images, all);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Mode::LanIpv4.label(), "LAN");
        assert_eq!(Mode::LanIpv6.label(), "IP6");
        assert_eq!(Mode::WanIpv4.label(), "WAN");
        assert_eq!(Mode::Vpn.label(), "VPN");
    }

    #[test]
    fn test_format_label_with_and_without_address() {
        assert_eq!(format_label(Mode::LanIpv4, "10.0.0.5"), "LAN: 10.0.0.5");
        assert_eq!(format_label(Mode::Vpn, ""), "VPN: ");
    }

    #[test]
    fn test_cycle_advance_and_reset() {
        let cycle = ModeCycle::new(Mode::LanIpv4);
        assert_eq!(cycle.advance(), Mode::LanIpv6);
        assert_eq!(cycle.advance(), Mode::WanIpv4);
        assert_eq!(cycle.current(), Mode::WanIpv4);
        cycle.reset();
        assert_eq!(cycle.current(), Mode::LanIpv4);
    }

    #[test]
    fn test_mode_deserializes_from_snake_case() {
        let m: Mode = serde_json::from_str("\"wan_ipv4\"").unwrap();
        assert_eq!(m, Mode::WanIpv4);
        assert!(serde_json::from_str::<Mode>("\"wan\"").is_err());
    }
}
