//! Tick sources for the timer engine.
//!
//! The engine never sleeps. It asks a [`TickSource`] to start or cancel the
//! periodic one-second callback and the caller feeds each delivered tick back
//! into [`TimerEngine::tick`](super::TimerEngine::tick). At most one source
//! is active at any time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A cancellable, repeating tick schedule.
pub trait TickSource {
    /// Begin delivering ticks. Replaces any schedule already running.
    fn start(&mut self);
    /// Stop delivering ticks. Safe to call when nothing is scheduled.
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Tick source driven by hand; used by tests and headless callers.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    active: bool,
    starts: u32,
    cancels: u32,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a schedule was started.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// How many times cancellation was requested.
    pub fn cancels(&self) -> u32 {
        self.cancels
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self) {
        self.active = true;
        self.starts += 1;
    }

    fn cancel(&mut self) {
        self.active = false;
        self.cancels += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// One delivered tick, tagged with the schedule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Tokio-backed tick source.
///
/// `start()` spawns a task driving a `tokio::time::interval`; `cancel()`
/// aborts it. Each start or cancel moves to a new generation, and
/// [`TickReceiver::recv`] drops ticks from older generations, so a tick
/// queued before a pause can never reach a later countdown.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

/// Receiving half of an [`IntervalTicker`].
#[derive(Debug)]
pub struct TickReceiver {
    rx: mpsc::UnboundedReceiver<Tick>,
    generation: Arc<AtomicU64>,
}

impl IntervalTicker {
    /// Create a ticker firing every `period` and the receiver for its ticks.
    pub fn channel(period: Duration) -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        (
            Self {
                period,
                tx,
                generation: Arc::clone(&generation),
                task: None,
            },
            TickReceiver { rx, generation },
        )
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) {
        self.abort_task();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let tx = self.tx.clone();
        let period = self.period;
        tracing::debug!(generation, ?period, "tick schedule started");

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if self.task.is_some() {
            tracing::debug!("tick schedule cancelled");
        }
        self.abort_task();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.abort_task();
    }
}

impl TickReceiver {
    /// Wait for the next tick of the current schedule.
    ///
    /// Returns `None` once the ticker has been dropped.
    pub async fn recv(&mut self) -> Option<Tick> {
        loop {
            let tick = self.rx.recv().await?;
            if tick.generation == self.generation.load(Ordering::SeqCst) {
                return Some(tick);
            }
            tracing::trace!(generation = tick.generation, "dropping stale tick");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Duration = Duration::from_millis(5);

    #[test]
    fn manual_ticker_tracks_activity() {
        let mut t = ManualTicker::new();
        assert!(!t.is_active());
        t.start();
        assert!(t.is_active());
        t.cancel();
        assert!(!t.is_active());
        assert_eq!((t.starts(), t.cancels()), (1, 1));
    }

    #[tokio::test]
    async fn interval_ticker_delivers_ticks() {
        let (mut ticker, mut ticks) = IntervalTicker::channel(FAST);
        ticker.start();
        assert!(ticker.is_active());

        let tick = tokio::time::timeout(Duration::from_secs(2), ticks.recv())
            .await
            .expect("tick within timeout")
            .expect("ticker alive");
        assert_eq!(tick.generation, 1);

        ticker.cancel();
        assert!(!ticker.is_active());
    }

    #[tokio::test]
    async fn ticks_from_cancelled_schedule_are_dropped() {
        let (mut ticker, mut ticks) = IntervalTicker::channel(FAST);
        ticker.start();
        tokio::time::sleep(Duration::from_millis(40)).await;
        ticker.cancel();
        ticker.start();

        let tick = tokio::time::timeout(Duration::from_secs(2), ticks.recv())
            .await
            .expect("tick within timeout")
            .expect("ticker alive");
        // start (1), cancel (2), start (3)
        assert_eq!(tick.generation, 3);
    }

    #[tokio::test]
    async fn restart_replaces_running_schedule() {
        let (mut ticker, _ticks) = IntervalTicker::channel(FAST);
        ticker.start();
        ticker.start();
        assert!(ticker.is_active());
        ticker.cancel();
        assert!(!ticker.is_active());
    }
}
