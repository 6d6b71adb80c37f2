use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Default)]
struct ClockState {
    started_at: OnceLock<Instant>,
    ended_at: OnceLock<Instant>,
    /// Set once the game is over or thrown away; tickers stop when they see it.
    halted: AtomicBool,
}

/// Shared handle to one game's elapsed time. Clones observe the same clock.
#[derive(Clone, Debug, Default)]
pub struct GameClock(Arc<ClockState>);

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting, returns `false` if it was already started.
    pub fn start(&self) -> bool {
        let now = Instant::now();
        let started = self.0.started_at.set(now).is_ok();
        if started {
            log::debug!("Clock started");
        }
        started
    }

    /// Freezes the elapsed time and halts any ticker watching this clock.
    pub fn stop(&self) {
        if self.0.started_at.get().is_some() && self.0.ended_at.set(Instant::now()).is_ok() {
            log::debug!("Clock stopped at {}s", self.elapsed_secs());
        }
        self.halt();
    }

    /// Halts tickers without recording an end time, for a game being discarded.
    pub fn halt(&self) {
        self.0.halted.store(true, Ordering::Release);
    }

    pub fn is_started(&self) -> bool {
        self.0.started_at.get().is_some()
    }

    pub fn is_halted(&self) -> bool {
        self.0.halted.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.is_started() && !self.is_halted()
    }

    /// How many seconds have passed since the clock started, 0 if it hasn't started
    pub fn elapsed_secs(&self) -> u32 {
        let Some(&started_at) = self.0.started_at.get() else {
            return 0;
        };
        let until = self.0.ended_at.get().copied().unwrap_or_else(Instant::now);
        let secs = until.saturating_duration_since(started_at).as_secs();
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    pub fn same_clock(&self, other: &GameClock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Background task that reports the elapsed seconds of a running clock every `period`.
///
/// It never touches the game: `on_tick` receives the seconds and is expected to request a redraw.
/// The thread exits once the clock halts, the ticker is dropped, or `on_tick` returns `false`.
#[derive(Debug)]
pub struct Ticker {
    clock: GameClock,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(clock: GameClock, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u32) -> bool + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let handle = {
            let clock = clock.clone();
            let cancelled = cancelled.clone();
            thread::spawn(move || {
                log::trace!("Ticker started");
                loop {
                    thread::sleep(period);
                    if clock.is_halted() || cancelled.load(Ordering::Acquire) {
                        break;
                    }
                    if clock.is_started() && !on_tick(clock.elapsed_secs()) {
                        break;
                    }
                }
                log::trace!("Ticker stopped");
            })
        };
        Self {
            clock,
            cancelled,
            handle: Some(handle),
        }
    }

    /// Whether this ticker follows `clock`, so a collaborator knows when to spawn a new one.
    pub fn watches(&self, clock: &GameClock) -> bool {
        self.clock.same_clock(clock)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the ticker and waits for the thread, which takes at most one period.
    pub fn join(mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
