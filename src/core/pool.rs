//! # Permit pool: the chairs of one round.
//!
//! [`PermitPool`] is a counting semaphore sized to the round's chair count.
//! A successful claim consumes its permit for good: pools are never
//! replenished, the game state replaces the whole pool every round and
//! retires the old one so a late claim against it fails.
//!
//! ```text
//! round k:   PermitPool::new(chairs_k) ── try_claim() × players_k ──► retire()
//! round k+1: PermitPool::new(chairs_k - 1) ...
//! ```

use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::Semaphore;

/// Non-replenishable counting semaphore holding one round's chairs.
#[derive(Debug)]
pub struct PermitPool {
    sem: Semaphore,
    capacity: u32,
    claimed: AtomicU32,
}

impl PermitPool {
    /// Creates a pool with `capacity` free chairs.
    pub fn new(capacity: u32) -> Self {
        Self {
            sem: Semaphore::new(capacity as usize),
            capacity,
            claimed: AtomicU32::new(0),
        }
    }

    /// Non-blocking attempt to take one chair.
    ///
    /// Returns `true` if a permit was consumed, `false` if the pool is
    /// exhausted or retired.
    pub fn try_claim(&self) -> bool {
        match self.sem.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.claimed.fetch_add(1, Ordering::AcqRel);
                true
            }
            Err(_no_permits_or_closed) => false,
        }
    }

    /// Closes the pool; every later claim fails.
    pub fn retire(&self) {
        self.sem.close();
    }

    /// True once [`retire`](Self::retire) was called.
    pub fn is_retired(&self) -> bool {
        self.sem.is_closed()
    }

    /// Chairs the pool was created with.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Chairs taken so far.
    pub fn claimed(&self) -> u32 {
        self.claimed.load(Ordering::Acquire)
    }

    /// Chairs still free.
    pub fn available(&self) -> u32 {
        self.capacity.saturating_sub(self.claimed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn exhaustion_is_permanent() {
        let pool = PermitPool::new(2);
        assert!(pool.try_claim());
        assert!(pool.try_claim());
        assert!(!pool.try_claim());
        assert!(!pool.try_claim());
        assert_eq!(pool.claimed(), 2);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn empty_pool_refuses_everyone() {
        let pool = PermitPool::new(0);
        assert!(!pool.try_claim());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn retired_pool_refuses_claims() {
        let pool = PermitPool::new(3);
        assert!(pool.try_claim());
        pool.retire();
        assert!(pool.is_retired());
        assert!(!pool.try_claim());
        assert_eq!(pool.claimed(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_claims_never_exceed_capacity() {
        let pool = Arc::new(PermitPool::new(7));
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let pool = Arc::clone(&pool);
            set.spawn(async move { pool.try_claim() });
        }

        let mut won = 0;
        while let Some(res) = set.join_next().await {
            if res.unwrap() {
                won += 1;
            }
        }
        assert_eq!(won, 7);
        assert_eq!(pool.claimed(), 7);
    }
}
