//! Cancellation flag shared by the walker, the collector and the binary
//!
//! The binary trips it on Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag
///
/// The walker checks it before each listing page and the collector before
/// each detail item; work already in flight is allowed to finish so the
/// output keeps its discovery order.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the run to stop
    pub fn trigger(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
