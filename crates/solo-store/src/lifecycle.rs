//! Mount lifecycle for removable media.
//!
//! Drives detect -> mount with bounded retries and paced transitions so the
//! overlay showing it stays readable. `step` advances at most one phase per
//! call and is safe to call every UI tick.

use tracing::{debug, warn};

use crate::blockstore::BlockStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdPhase {
    Idle,
    Detecting,
    Mounting,
    /// Waiting out the delay before the next mount attempt.
    RetryWait,
    Success,
    Failed,
}

#[derive(Debug)]
pub struct SdLifecycle {
    phase: SdPhase,
    attempts: u32,
    max_attempts: u32,
    retry_delay_ms: u64,
    min_display_ms: u64,
    started_ms: u64,
    phase_since_ms: u64,
}

impl SdLifecycle {
    pub fn new(max_attempts: u32, retry_delay_ms: u64, min_display_ms: u64) -> Self {
        Self {
            phase: SdPhase::Idle,
            attempts: 0,
            max_attempts,
            retry_delay_ms,
            min_display_ms,
            started_ms: 0,
            phase_since_ms: 0,
        }
    }

    /// Starts a fresh detect/mount sequence.
    pub fn begin(&mut self, now_ms: u64) {
        self.phase = SdPhase::Detecting;
        self.attempts = 0;
        self.started_ms = now_ms;
        self.phase_since_ms = now_ms;
    }

    /// Advances the sequence one phase. Terminal phases are sticky until
    /// the next `begin`.
    pub fn step<S: BlockStore>(&mut self, store: &mut S, now_ms: u64) -> SdPhase {
        match self.phase {
            SdPhase::Idle | SdPhase::Success | SdPhase::Failed => {}
            SdPhase::Detecting => {
                if store.detect() {
                    self.enter(SdPhase::Mounting, now_ms);
                } else {
                    warn!("no medium detected, giving up without mounting");
                    self.enter(SdPhase::Failed, now_ms);
                }
            }
            SdPhase::Mounting => {
                store.unmount();
                self.attempts += 1;
                match store.mount() {
                    Ok(()) => {
                        debug!("medium mounted after {} attempt(s)", self.attempts);
                        self.enter(SdPhase::Success, now_ms);
                    }
                    Err(e) if self.attempts >= self.max_attempts => {
                        warn!("giving up after {} mount attempts: {}", self.attempts, e);
                        self.enter(SdPhase::Failed, now_ms);
                    }
                    Err(e) => {
                        debug!("mount attempt {} failed, will retry: {}", self.attempts, e);
                        self.enter(SdPhase::RetryWait, now_ms);
                    }
                }
            }
            SdPhase::RetryWait => {
                if now_ms.saturating_sub(self.phase_since_ms) >= self.retry_delay_ms {
                    self.enter(SdPhase::Mounting, now_ms);
                }
            }
        }
        self.phase
    }

    fn enter(&mut self, phase: SdPhase, now_ms: u64) {
        self.phase = phase;
        self.phase_since_ms = now_ms;
    }

    /// Cancels an in-flight sequence.
    pub fn abort(&mut self, now_ms: u64) {
        if !self.is_terminal() {
            self.enter(SdPhase::Failed, now_ms);
        }
    }

    #[inline]
    pub fn phase(&self) -> SdPhase {
        self.phase
    }

    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SdPhase::Success | SdPhase::Failed)
    }

    pub fn succeeded(&self) -> bool {
        self.phase == SdPhase::Success
    }

    /// Whether the overlay has been up long enough to close.
    pub fn min_display_elapsed(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) >= self.min_display_ms
    }
}
