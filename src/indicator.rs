//! Indicator lifecycle: enable, click handling, disable.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{self, Settings};
use crate::core::mode::{Mode, ModeCycle};
use crate::core::refresh::RefreshLoop;
use crate::core::resolver::AddressResolver;
use crate::core::runner::{CommandRunner, SystemRunner};
use crate::sink::DisplaySink;

/// One enabled indicator: owns the current mode and the refresh loop.
///
/// Dropping it cancels the refresh task along with the loop.
pub struct Indicator<R> {
    modes: Arc<ModeCycle>,
    refresh: RefreshLoop<R>,
}

impl Indicator<SystemRunner> {
    /// Enable with real probe commands as described by `settings`.
    pub fn from_settings(settings: &Settings, sink: Arc<dyn DisplaySink>) -> Self {
        let runner = SystemRunner::new(settings.command_timeout());
        let resolver = AddressResolver::new(runner, settings.probes.clone());
        Self::enable(resolver, settings.initial_mode, settings.refresh_interval(), sink)
    }
}

impl<R: CommandRunner> Indicator<R> {
    /// Show the loading text and start refreshing. Must run inside a tokio runtime.
    pub fn enable(
        resolver: AddressResolver<R>,
        initial_mode: Mode,
        interval: Duration,
        sink: Arc<dyn DisplaySink>,
    ) -> Self {
        let modes = Arc::new(ModeCycle::new(initial_mode));
        let refresh = RefreshLoop::new(resolver, interval);
        sink.show(config::LOADING_TEXT);
        refresh.start(Arc::clone(&modes), Arc::clone(&sink));
        tracing::info!(mode = %initial_mode, "indicator enabled");
        Self { modes, refresh }
    }

    /// Click: switch to the next mode and refresh right away.
    /// Ignored once the indicator has been disabled.
    pub fn activate(&self) -> Mode {
        if !self.refresh.is_running() {
            tracing::debug!("activate ignored, indicator is disabled");
            return self.modes.current();
        }
        let mode = self.modes.advance();
        tracing::info!(%mode, "mode switched");
        self.refresh.refresh_now();
        mode
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Stop refreshing and forget the selected mode. Idempotent.
    pub fn disable(&self) {
        self.refresh.stop();
        self.modes.reset();
        tracing::info!("indicator disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::tests::ScriptedRunner;
    use crate::core::resolver::Probes;
    use crate::sink::RecordingSink;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    fn enabled(sink: Arc<RecordingSink>) -> Indicator<ScriptedRunner> {
        let runner = ScriptedRunner::default()
            .with("ip route get 1.1.1.1", "1.1.1.1 dev eth0 src 10.0.0.5 uid 1000")
            .with("ip route get 2001::", "2001:: dev eth0 src fd00::5 metric 100")
            .with(
                "dig TXT +short o-o.myaddr.l.google.com @ns1.google.com -4",
                "\"203.0.113.7\"\n",
            )
            .missing("ifconfig vpn0")
            .missing("ifconfig tun0");
        Indicator::enable(
            AddressResolver::new(runner, Probes::default()),
            Mode::LanIpv4,
            Duration::from_secs(20),
            sink,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_shows_loading_then_address() {
        let sink = Arc::new(RecordingSink::default());
        let indicator = enabled(sink.clone());
        settle().await;
        assert_eq!(sink.lines(), vec!["Loading...", "LAN: 10.0.0.5"]);
        indicator.disable();
    }

    #[tokio::test(start_paused = true)]
    async fn test_clicks_cycle_through_all_modes() {
        let sink = Arc::new(RecordingSink::default());
        let indicator = enabled(sink.clone());
        settle().await;
        for expected in [Mode::LanIpv6, Mode::WanIpv4, Mode::Vpn, Mode::LanIpv4] {
            assert_eq!(indicator.activate(), expected);
            settle().await;
        }
        assert_eq!(
            sink.lines(),
            vec![
                "Loading...",
                "LAN: 10.0.0.5",
                "IP6: fd00::5",
                "WAN: 203.0.113.7",
                "VPN: ",
                "LAN: 10.0.0.5",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_resets_mode_and_stops_updates() {
        let sink = Arc::new(RecordingSink::default());
        let indicator = enabled(sink.clone());
        settle().await;
        indicator.activate();
        settle().await;
        indicator.disable();
        indicator.disable();
        assert_eq!(indicator.mode(), Mode::LanIpv4);

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(sink.lines().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_after_disable_is_ignored() {
        let sink = Arc::new(RecordingSink::default());
        let indicator = enabled(sink.clone());
        settle().await;
        indicator.disable();
        assert_eq!(indicator.activate(), Mode::LanIpv4);
        settle().await;
        assert_eq!(sink.lines(), vec!["Loading...", "LAN: 10.0.0.5"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_indicator_stops_refresh() {
        let sink = Arc::new(RecordingSink::default());
        drop(enabled(sink.clone()));
        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(sink.lines(), vec!["Loading..."]);
    }
}
