//! Single-flight guard for summarize requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// At most one summarize request per page at a time.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    busy: Arc<AtomicBool>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate, or `None` while another request holds it.
    pub fn try_acquire(&self) -> Option<RequestPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RequestPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the lifetime of one request; releases the gate on drop.
#[derive(Debug)]
pub struct RequestPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
