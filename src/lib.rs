pub mod config;
pub mod core;
pub mod error;
pub mod indicator;
pub mod services;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use config::Settings;
use indicator::Indicator;
use services::{BackgroundServices, Event};
use sink::{DisplaySink, StdoutSink};

pub fn run() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in ip-indicator: {info}");
        default_hook(info);
    }));

    // stdout carries the label, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ip_indicator=info,ip_indicator_lib=info".into()),
        )
        .init();

    if let Err(e) = try_run() {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn try_run() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ip-indicator")
        .build()
        .context("failed to build tokio runtime")?;
    let result = runtime.block_on(serve(settings));
    // The stdin reader may still sit in a blocking read; don't wait on it.
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel(16);
    let _services = BackgroundServices::start(tx).context("failed to install input listeners")?;

    let sink: Arc<dyn DisplaySink> = Arc::new(StdoutSink::new(settings.output));
    let indicator = Indicator::from_settings(&settings, sink);

    while let Some(event) = rx.recv().await {
        match event {
            Event::Activate => {
                indicator.activate();
            }
            Event::Shutdown => break,
        }
    }

    indicator.disable();
    Ok(())
}
