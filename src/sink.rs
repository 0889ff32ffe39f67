//! Display sinks: where rendered labels go.
//!
//! The daemon writes one line per update to stdout so any status bar that
//! tails a command can show it. `waybar` output wraps the label in the JSON
//! object waybar's `custom` module expects with `"return-type": "json"`.

use std::io::Write;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Accepts rendered label text.
pub trait DisplaySink: Send + Sync {
    fn show(&self, text: &str);
}

/// Line format written by [`StdoutSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Plain,
    Waybar,
}

#[derive(Debug, Serialize)]
struct WaybarLine<'a> {
    text: &'a str,
    tooltip: &'a str,
    class: String,
}

/// Render one output line (without the trailing newline).
pub fn render_line(format: OutputFormat, text: &str) -> String {
    match format {
        OutputFormat::Plain => text.to_string(),
        OutputFormat::Waybar => {
            // "LAN: 10.0.0.5" -> class "lan"
            let class = text
                .split(':')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            let line = WaybarLine {
                text,
                tooltip: "Click to switch between LAN, IPv6, WAN and VPN addresses",
                class,
            };
            serde_json::to_string(&line).unwrap_or_else(|_| text.to_string())
        }
    }
}

/// Writes each label as a line on a writer (stdout by default).
pub struct StdoutSink<W = std::io::Stdout> {
    format: OutputFormat,
    out: Mutex<W>,
}

impl StdoutSink {
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writer(format, std::io::stdout())
    }
}

impl<W: Write + Send> StdoutSink<W> {
    pub fn with_writer(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> DisplaySink for StdoutSink<W> {
    fn show(&self, text: &str) {
        let line = render_line(self.format, text);
        let mut out = self.out.lock().unwrap();
        // Status bars read line-buffered; flush so the update appears now.
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!("Failed to write label: {e}");
        }
    }
}

/// Keeps every label shown, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl DisplaySink for RecordingSink {
    fn show(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
