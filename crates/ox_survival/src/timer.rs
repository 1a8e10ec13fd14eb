//! Cancellable per-turn countdowns.
//!
//! A [`TurnTimer`] runs at most one countdown task at a time. The task only
//! sends [`TimerEvent`]s over a channel; it never touches game state. Every
//! schedule bumps a generation counter so the receiver can drop events from
//! a countdown that was superseded while they were in flight.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace};

/// Which countdown an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum TimerKind {
    /// Pre-question countdown.
    #[strum(serialize = "countdown")]
    Countdown,
    /// Answer window.
    #[strum(serialize = "answer")]
    Answer,
}

/// Event emitted by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Whole seconds left, sent once per second starting at the full length.
    Tick {
        /// Countdown kind.
        kind: TimerKind,
        /// Schedule this event came from.
        generation: u64,
        /// Seconds remaining, rounded up.
        remaining: u64,
    },
    /// The countdown ran out.
    Elapsed {
        /// Countdown kind.
        kind: TimerKind,
        /// Schedule this event came from.
        generation: u64,
    },
}

impl TimerEvent {
    /// Countdown kind of this event.
    pub fn kind(&self) -> TimerKind {
        match self {
            Self::Tick { kind, .. } | Self::Elapsed { kind, .. } => *kind,
        }
    }

    /// Generation of the schedule that produced this event.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Tick { generation, .. } | Self::Elapsed { generation, .. } => *generation,
        }
    }
}

/// Owner of the single running countdown.
#[derive(Debug)]
pub struct TurnTimer {
    tx: mpsc::UnboundedSender<TimerEvent>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
    active: Option<TimerKind>,
}

impl TurnTimer {
    /// Creates a timer sending into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            tx,
            handle: None,
            generation: 0,
            active: None,
        }
    }

    /// Creates a timer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Starts a countdown, aborting any running one first.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// the new countdown's events carry.
    #[instrument(skip(self), fields(previous = self.generation))]
    pub fn schedule(&mut self, kind: TimerKind, duration: Duration) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();

        self.handle = Some(tokio::spawn(async move {
            let step = Duration::from_secs(1);
            let mut left = duration;
            while !left.is_zero() {
                let remaining = whole_seconds(left);
                trace!(%kind, generation, remaining, "Tick");
                if tx
                    .send(TimerEvent::Tick {
                        kind,
                        generation,
                        remaining,
                    })
                    .is_err()
                {
                    return;
                }
                let nap = left.min(step);
                tokio::time::sleep(nap).await;
                left -= nap;
            }
            debug!(%kind, generation, "Countdown elapsed");
            let _ = tx.send(TimerEvent::Elapsed { kind, generation });
        }));
        self.active = Some(kind);
        generation
    }

    /// Aborts the running countdown, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(generation = self.generation, "Countdown cancelled");
        }
        self.active = None;
    }

    /// Whether `event` comes from the countdown currently scheduled.
    pub fn is_current(&self, event: &TimerEvent) -> bool {
        self.active == Some(event.kind()) && event.generation() == self.generation
    }

    /// Kind of the running countdown.
    pub fn active(&self) -> Option<TimerKind> {
        self.active
    }

    /// Generation of the most recent schedule.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn whole_seconds(duration: Duration) -> u64 {
    duration.as_millis().div_ceil(1000) as u64
}
