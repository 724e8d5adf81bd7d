//! # Completion counter shared by the reaper and the coordinator.
//!
//! Single writer (the reaper), single reader (the coordinator's wait loop).
//! The value only grows, so a reader may observe an intermediate value but
//! never needs a lower one later.

use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic completion counter.
#[derive(Debug, Default)]
pub struct CompletionCounter {
    value: AtomicU32,
}

impl CompletionCounter {
    /// Counter starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` and returns the new value.
    pub fn add(&self, n: u32) -> u32 {
        self.value.fetch_add(n, Ordering::AcqRel) + n
    }

    /// Current value.
    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn add_returns_new_value() {
        let c = CompletionCounter::new();
        assert_eq!(c.get(), 0);
        assert_eq!(c.add(2), 2);
        assert_eq!(c.add(2), 4);
        assert_eq!(c.get(), 4);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let c = Arc::new(CompletionCounter::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        c.add(2);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(c.get(), 16_000);
    }
}
