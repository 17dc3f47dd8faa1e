//! Trade id allocation. A single generator instance is shared across every
//! trade produced by a book, so it must be safe under concurrent `next_id`
//! calls even though the matching engine itself is single-writer — a trade
//! logger or downstream consumer may read ids from another thread.

use std::sync::atomic::{AtomicU64, Ordering};

pub trait TradeIdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

pub struct MonotonicTradeIdGenerator {
    next: AtomicU64,
}

impl MonotonicTradeIdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }
}

impl Default for MonotonicTradeIdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TradeIdGenerator for MonotonicTradeIdGenerator {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn default_seed_starts_at_one() {
        let gen = MonotonicTradeIdGenerator::default();
        assert_eq!(gen.next_id(), 1);
        assert_eq!(gen.next_id(), 2);
    }

    #[test]
    fn custom_seed_is_honored() {
        let gen = MonotonicTradeIdGenerator::new(100);
        assert_eq!(gen.next_id(), 100);
        assert_eq!(gen.next_id(), 101);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let gen = Arc::new(MonotonicTradeIdGenerator::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let gen = Arc::clone(&gen);
            handles.push(thread::spawn(move || {
                (0..200).map(|_| gen.next_id()).collect::<Vec<_>>()
            }));
        }
        let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
