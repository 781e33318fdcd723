use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Liveness token for a mounted page.
///
/// Clones share one flag. Async work holds a clone and checks it before
/// writing results back, so late completions after teardown are dropped.
#[derive(Clone, Debug)]
pub struct Lifetime {
    alive: Arc<AtomicBool>,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifetime {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the page as torn down. Returns true only for the first call.
    pub fn end(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    /// Runs `apply` only while the page is alive.
    pub fn deliver<T>(&self, value: T, apply: impl FnOnce(T)) -> bool {
        if !self.is_alive() {
            tracing::debug!("dropping result that arrived after teardown");
            return false;
        }
        apply(value);
        true
    }
}
