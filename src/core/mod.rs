//! Core logic: mode rotation, address lookup, periodic refresh.
//!
//! - [`Mode`] / [`ModeCycle`] — the four display modes and click rotation
//! - [`parse`] — address extraction from `ip`, `dig` and `ifconfig` output
//! - [`CommandRunner`] / [`SystemRunner`] — probe execution with a timeout
//! - [`AddressResolver`] — per-mode probe + extraction, failures flattened to ""
//! - [`RefreshLoop`] — cancellable self-rearming refresh timer

pub mod mode;
pub mod parse;
pub mod refresh;
pub mod resolver;
pub mod runner;

pub use mode::{format_label, Mode, ModeCycle};
pub use refresh::RefreshLoop;
pub use resolver::{AddressResolver, Probes};
pub use runner::{CommandRunner, CommandSpec, SystemRunner};
