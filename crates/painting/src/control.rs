//! Pause and cancel signals shared between the worker and its host

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

use tracing::info;

/// Cooperative pause/cancel flags polled by the drawing worker
///
/// Share it behind an `Arc`; every method takes `&self`.
#[derive(Debug, Default)]
pub struct ControlSignals {
    cancelled: AtomicBool,
    paused: Mutex<bool>,
    resumed: Condvar,
}

impl ControlSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; also lifts a pause so a waiting worker wakes up
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.set_paused(false);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.set_paused(true);
    }

    pub fn resume(&self) {
        self.set_paused(false);
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&self) -> bool {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        *paused = !*paused;
        let now = *paused;
        drop(paused);
        if !now {
            self.resumed.notify_all();
        }
        info!("{}", if now { "Drawing paused" } else { "Drawing resumed" });
        now
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block while paused; returns immediately otherwise
    pub fn wait_while_paused(&self) {
        let paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        let _unpaused = self
            .resumed
            .wait_while(paused, |p| *p)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn set_paused(&self, value: bool) {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        *paused = value;
        drop(paused);
        if !value {
            self.resumed.notify_all();
        }
    }
}
