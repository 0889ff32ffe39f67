//! Periodic label refresh.
//!
//! A `RefreshLoop` is either `Idle` or `Armed` with exactly one refresh task.
//! The task resolves the address for the current mode, pushes the label to the
//! sink, sleeps one interval and repeats. Re-arming (a click) always cancels the
//! running task first, so two refresh tasks never run side by side.
//!
//! Every arming gets a generation number. A label is only pushed while its
//! generation is still current, and the check and the push happen under the
//! same lock that `stop()` takes to bump the generation. Once `stop()` returns,
//! nothing resolved earlier can reach the display.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::mode::{format_label, ModeCycle};
use crate::core::resolver::AddressResolver;
use crate::core::runner::CommandRunner;
use crate::sink::DisplaySink;

/// Where a running loop reads the mode from and writes labels to.
#[derive(Clone)]
struct Target {
    modes: Arc<ModeCycle>,
    sink: Arc<dyn DisplaySink>,
}

enum TimerState {
    Idle,
    Armed(JoinHandle<()>),
}

struct Control {
    state: TimerState,
    target: Option<Target>,
}

struct Shared<R> {
    resolver: AddressResolver<R>,
    interval: Duration,
    generation: Mutex<u64>,
}

impl<R: CommandRunner> Shared<R> {
    async fn cycle(&self, target: &Target, generation: u64) {
        let mode = target.modes.current();
        let address = self.resolver.resolve(mode).await;
        self.publish(target, generation, &format_label(mode, &address));
    }

    /// Push `text` unless `generation` has been superseded. Returns whether it was shown.
    fn publish(&self, target: &Target, generation: u64, text: &str) -> bool {
        let current = self.generation.lock().unwrap();
        if *current != generation {
            tracing::debug!(generation, current = *current, "discarding stale label {text:?}");
            return false;
        }
        target.sink.show(text);
        true
    }
}

async fn drive<R: CommandRunner>(shared: Arc<Shared<R>>, target: Target, generation: u64) {
    loop {
        shared.cycle(&target, generation).await;
        tokio::time::sleep(shared.interval).await;
    }
}

/// Self-rearming refresh timer. Must be started from within a tokio runtime.
pub struct RefreshLoop<R> {
    shared: Arc<Shared<R>>,
    control: Mutex<Control>,
}

impl<R: CommandRunner> RefreshLoop<R> {
    pub fn new(resolver: AddressResolver<R>, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                resolver,
                interval,
                generation: Mutex::new(0),
            }),
            control: Mutex::new(Control {
                state: TimerState::Idle,
                target: None,
            }),
        }
    }

    /// Refresh immediately and then every interval, reading the mode from
    /// `modes` and writing labels to `sink`. Restarts if already running.
    pub fn start(&self, modes: Arc<ModeCycle>, sink: Arc<dyn DisplaySink>) {
        let mut control = self.control.lock().unwrap();
        control.target = Some(Target { modes, sink });
        self.arm(&mut control);
        tracing::info!(interval_secs = self.shared.interval.as_secs(), "refresh loop started");
    }

    /// Run a refresh now instead of waiting for the timer, then restart the
    /// interval from here. Returns `false` if the loop is not running.
    pub fn refresh_now(&self) -> bool {
        let mut control = self.control.lock().unwrap();
        if control.target.is_none() {
            return false;
        }
        self.arm(&mut control);
        true
    }

    /// Cancel the pending refresh and discard any result still in flight.
    /// Safe to call repeatedly and when nothing is pending.
    pub fn stop(&self) {
        let mut control = self.control.lock().unwrap();
        let was_running = control.target.take().is_some();
        self.cancel(&mut control);
        if was_running {
            tracing::info!("refresh loop stopped");
        }
    }

    /// Started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.control.lock().unwrap().target.is_some()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.control.lock().unwrap().state, TimerState::Armed(_))
    }

    fn arm(&self, control: &mut Control) {
        let Some(target) = control.target.clone() else {
            return;
        };
        self.cancel(control);
        let generation = *self.shared.generation.lock().unwrap();
        let task = tokio::spawn(drive(Arc::clone(&self.shared), target, generation));
        control.state = TimerState::Armed(task);
    }

    /// Armed -> Idle. Bumping the generation invalidates whatever the old task
    /// may still be about to publish.
    fn cancel(&self, control: &mut Control) {
        *self.shared.generation.lock().unwrap() += 1;
        if let TimerState::Armed(task) = std::mem::replace(&mut control.state, TimerState::Idle) {
            task.abort();
        }
    }
}

impl<R> Drop for RefreshLoop<R> {
    fn drop(&mut self) {
        if let Ok(mut control) = self.control.lock() {
            if let TimerState::Armed(task) = std::mem::replace(&mut control.state, TimerState::Idle) {
                task.abort();
            }
        }
    }
}
