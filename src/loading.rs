//! Load/retry state machine
//!
//! Coordinates the minimum loading-screen time, the load-timeout watchdog,
//! scene-ready/scene-error signals, and the bounded auto-retry countdown.
//! The machine is driven by an explicit clock (`tick(now)`) so tests can
//! run it against synthetic times.

use std::time::{Duration, Instant};

/// Auto-retry countdown after a failure, in seconds.
pub const AUTO_RETRY_DELAY_SECS: u64 = 5;

/// Maximum auto-retry attempts before the counter wraps.
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// User-visible loading phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Waiting for the scene pipeline
    #[default]
    Loading,
    /// Scene is live
    Ready,
    /// The loader or initializer reported a failure
    Error,
    /// The watchdog fired before any signal arrived
    TimedOut,
}

/// Action requested from the owner of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// Tear down the current scene attempt and start a fresh load
    Reload,
}

/// Timing knobs for the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadTimings {
    /// Minimum time the loading screen stays visible
    pub min_display: Duration,
    /// Watchdog deadline for the whole pipeline
    pub load_timeout: Duration,
    /// Delay before an automatic retry fires
    pub retry_delay: Duration,
    /// Retry attempts before the counter wraps
    pub max_retries: u32,
}

impl Default for LoadTimings {
    fn default() -> Self {
        Self {
            min_display: Duration::from_millis(1000),
            load_timeout: Duration::from_millis(30_000),
            retry_delay: Duration::from_secs(AUTO_RETRY_DELAY_SECS),
            max_retries: MAX_RETRY_ATTEMPTS,
        }
    }
}

/// The app-level load/retry state machine.
#[derive(Debug, Clone)]
pub struct LoadController {
    timings: LoadTimings,
    phase: LoadPhase,
    /// Earliest instant `Ready` may be committed
    min_deadline: Instant,
    /// Watchdog deadline; disarmed on any terminal signal
    watchdog: Option<Instant>,
    /// Scene reported ready before the minimum display time elapsed
    pending_ready: bool,
    /// When the auto-retry fires
    retry_at: Option<Instant>,
    retry_count: u32,
}

impl LoadController {
    /// Start a new loading session: both timers armed in parallel.
    pub fn new(timings: LoadTimings, now: Instant) -> Self {
        Self {
            timings,
            phase: LoadPhase::Loading,
            min_deadline: now + timings.min_display,
            watchdog: Some(now + timings.load_timeout),
            pending_ready: false,
            retry_at: None,
            retry_count: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// Whether the scene is live.
    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// Whether the loading overlay (spinner or failure message) is visible.
    pub fn overlay_visible(&self) -> bool {
        self.phase != LoadPhase::Ready
    }

    /// Completed retry attempts since the last success.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Seconds left on the auto-retry countdown, when one is armed.
    pub fn countdown_remaining(&self, now: Instant) -> Option<u64> {
        let at = self.retry_at?;
        let remaining = at.saturating_duration_since(now);
        // Ceil to whole seconds so the display reaches 1 before firing
        Some(remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0))
    }

    /// Scene-ready signal. Commits `Ready` only once the minimum display
    /// time has elapsed; earlier arrivals are held and committed by `tick`.
    pub fn on_loaded(&mut self, now: Instant) {
        if self.phase != LoadPhase::Loading {
            return;
        }
        if now >= self.min_deadline {
            self.commit_ready();
        } else {
            self.pending_ready = true;
        }
    }

    /// Scene-error signal. Immediate transition, watchdog disarmed.
    /// Accepted from `Ready` too: a live scene failing later re-enters
    /// the error flow.
    pub fn on_error(&mut self, now: Instant) {
        if matches!(self.phase, LoadPhase::Error | LoadPhase::TimedOut) {
            return;
        }
        log::warn!("Scene load failed, retry {} queued", self.retry_count + 1);
        self.phase = LoadPhase::Error;
        self.fail_common(now);
    }

    /// Timeout signal (watchdog or the initializer's own deadline).
    pub fn on_timeout(&mut self, now: Instant) {
        if self.phase != LoadPhase::Loading {
            return;
        }
        log::warn!(
            "Scene load timed out after {:?}",
            self.timings.load_timeout
        );
        self.phase = LoadPhase::TimedOut;
        self.fail_common(now);
    }

    /// Advance the clock. Returns a pipeline action when one is due.
    pub fn tick(&mut self, now: Instant) -> Option<LoadAction> {
        match self.phase {
            LoadPhase::Loading => {
                if self.pending_ready && now >= self.min_deadline {
                    self.commit_ready();
                } else if self.watchdog.is_some_and(|deadline| now >= deadline) {
                    self.on_timeout(now);
                }
                None
            }
            LoadPhase::Error | LoadPhase::TimedOut => {
                if self.retry_at.is_some_and(|at| now >= at) {
                    Some(self.begin_retry(now))
                } else {
                    None
                }
            }
            LoadPhase::Ready => None,
        }
    }

    /// Manual "retry now". Valid only in a failure phase.
    pub fn retry_now(&mut self, now: Instant) -> Option<LoadAction> {
        if matches!(self.phase, LoadPhase::Error | LoadPhase::TimedOut) {
            Some(self.begin_retry(now))
        } else {
            None
        }
    }

    fn commit_ready(&mut self) {
        log::info!("Scene ready, loading screen dismissed");
        self.phase = LoadPhase::Ready;
        self.pending_ready = false;
        self.watchdog = None;
        self.retry_at = None;
        self.retry_count = 0;
    }

    fn fail_common(&mut self, now: Instant) {
        self.pending_ready = false;
        self.watchdog = None;
        self.retry_at = Some(now + self.timings.retry_delay);
    }

    /// Re-arm the timers and account the attempt. At the cap the counter
    /// wraps to zero and the reload proceeds exactly as below the cap.
    fn begin_retry(&mut self, now: Instant) -> LoadAction {
        if self.retry_count < self.timings.max_retries {
            self.retry_count += 1;
        } else {
            self.retry_count = 0;
        }
        log::info!("Reloading scene pipeline (attempt {})", self.retry_count);
        self.phase = LoadPhase::Loading;
        self.pending_ready = false;
        self.min_deadline = now + self.timings.min_display;
        self.watchdog = Some(now + self.timings.load_timeout);
        self.retry_at = None;
        LoadAction::Reload
    }
}
