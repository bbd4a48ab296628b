use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number of a dispatched request.
pub type Generation = u64;

/// Monotonic per-coordinator counter, advanced once per dispatch.
///
/// Zero means "nothing dispatched yet"; the first dispatch is generation 1.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return it.
    pub fn advance(&self) -> Generation {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> Generation {
        self.current.load(Ordering::SeqCst)
    }

    /// Whether a response tagged `generation` is still authoritative.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}
