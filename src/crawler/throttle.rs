//! Shared request gate for rate limiting
//!
//! Every request waits for the gate to open. After an item or a listing
//! page, the pipeline pushes the gate forward by the configured pause, so
//! the next request starts no earlier than that pause after the previous
//! unit of work finished. Pauses pushed back to back add up.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Request gate shared by everything issuing requests
///
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone, Default)]
pub struct Throttle {
    /// Earliest instant the next request may start
    next_allowed: Arc<Mutex<Option<Instant>>>,
}

impl Throttle {
    /// Creates an open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the gate is open
    ///
    /// The lock is held while sleeping, so concurrent waiters pass one at a
    /// time and observe any pause pushed while they were queued.
    pub async fn wait_turn(&self) {
        let guard = self.next_allowed.lock().await;
        if let Some(next) = *guard {
            let now = Instant::now();
            if next > now {
                tracing::debug!("Throttle: waiting {:?}", next - now);
                tokio::time::sleep_until(next).await;
            }
        }
    }

    /// Keeps the gate closed for another `pause`
    ///
    /// If the gate is still closed, `pause` is added to the pending one, so
    /// a detail pause followed by a listing pause lasts as long as both.
    pub async fn defer(&self, pause: Duration) {
        if pause.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut guard = self.next_allowed.lock().await;
        let from = match *guard {
            Some(existing) if existing > now => existing,
            _ => now,
        };
        *guard = Some(from + pause);
    }

    /// Time left until the gate opens, `None` if it is open now
    pub async fn time_until_open(&self) -> Option<Duration> {
        let guard = self.next_allowed.lock().await;
        (*guard).and_then(|next| {
            let now = Instant::now();
            (next > now).then(|| next - now)
        })
    }
}
