//! Background listeners that turn outside input into indicator events.
//!
//! `BackgroundServices` owns the listener tasks:
//! 1. Signal listener: `SIGUSR1` is a click, `SIGINT`/`SIGTERM` shut down.
//! 2. Stdin reader: every line is a click, `quit` shuts down. Status bars that
//!    keep the child's stdin open (i3blocks persistent mode) can forward clicks
//!    this way; EOF only ends this listener.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;

/// Something the control loop has to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Switch to the next mode.
    Activate,
    /// Disable the indicator and exit.
    Shutdown,
}

/// Map one stdin line to an event.
pub fn parse_input_line(line: &str) -> Event {
    match line.trim() {
        "quit" | "exit" => Event::Shutdown,
        _ => Event::Activate,
    }
}

/// Owns the listener tasks; dropping it stops them.
pub struct BackgroundServices {
    tasks: Vec<JoinHandle<()>>,
}

impl BackgroundServices {
    /// Start all listeners, sending their events to `events`.
    pub fn start(events: mpsc::Sender<Event>) -> Result<Self, AppError> {
        let signals = Self::start_signal_listener(events.clone())?;
        let stdin = Self::start_stdin_reader(events);
        Ok(Self {
            tasks: vec![signals, stdin],
        })
    }

    fn start_signal_listener(events: mpsc::Sender<Event>) -> Result<JoinHandle<()>, AppError> {
        let mut usr1 = signal(SignalKind::user_defined1())?;
        let mut term = signal(SignalKind::terminate())?;
        let mut int = signal(SignalKind::interrupt())?;

        Ok(tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = usr1.recv() => Event::Activate,
                    _ = term.recv() => Event::Shutdown,
                    _ = int.recv() => Event::Shutdown,
                };
                tracing::debug!(?event, "signal received");
                if events.send(event).await.is_err() || event == Event::Shutdown {
                    break;
                }
            }
        }))
    }

    fn start_stdin_reader(events: mpsc::Sender<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let event = parse_input_line(&line);
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("stdin closed, click input via stdin disabled");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {e}");
                        break;
                    }
                }
            }
        })
    }
}

impl Drop for BackgroundServices {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_line_is_a_click() {
        assert_eq!(parse_input_line(""), Event::Activate);
        assert_eq!(parse_input_line("1"), Event::Activate);
        assert_eq!(parse_input_line(r#"{"name":"ip","button":1}"#), Event::Activate);
    }

    #[test]
    fn test_quit_line_shuts_down() {
        assert_eq!(parse_input_line("quit\n"), Event::Shutdown);
        assert_eq!(parse_input_line("  exit "), Event::Shutdown);
    }

    #[tokio::test]
    async fn test_sigusr1_becomes_activate() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = BackgroundServices::start_signal_listener(tx).unwrap();
        let pid = std::process::id().to_string();
        let status = std::process::Command::new("kill")
            .args(["-USR1", pid.as_str()])
            .status()
            .unwrap();
        assert!(status.success());
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(Event::Activate));
        handle.abort();
    }
}
