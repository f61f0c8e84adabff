use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use tracing::debug;

/// Pending-request indicator.
///
/// Shown while any [`SpinnerGuard`] is alive or while the manual flag set by
/// [`Spinner::toggle`] is on. Visibility is derived from both on every read,
/// so a guard dropping never clears a concurrent raise or a manual toggle.
#[derive(Debug, Default)]
pub struct Spinner {
    manual: AtomicBool,
    in_flight: AtomicUsize,
}

impl Spinner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_visible(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0 || self.manual.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Flips the manual flag and returns its new state.
    pub fn toggle(&self) -> bool {
        let manual = !self.manual.fetch_xor(true, Ordering::SeqCst);
        debug!(manual, "spinner toggled");
        manual
    }

    pub fn raise(self: &Arc<Self>) -> SpinnerGuard {
        let previous = self.in_flight.fetch_add(1, Ordering::SeqCst);
        debug!(in_flight = previous + 1, "spinner raised");
        SpinnerGuard {
            spinner: Arc::clone(self),
        }
    }
}

#[must_use = "the spinner hides as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SpinnerGuard {
    spinner: Arc<Spinner>,
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        let previous = self.spinner.in_flight.fetch_sub(1, Ordering::SeqCst);
        if previous == 1 {
            debug!("last pending request settled");
        }
    }
}

#[cfg(test)]
#[path = "tests/spinner_tests.rs"]
mod tests;
