//! Cooperative stop flag shared between a worker loop and whoever stops it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Starts alive; once stopped it stays stopped. Workers check it once per loop
/// iteration, so stopping takes effect within one poll interval.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Safe to call from the interrupt handler: a single atomic store.
    pub fn stop(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
