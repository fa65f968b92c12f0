//! Peterson's two-party mutual exclusion.
//!
//! Each party `id` raises `flag[id]`, hands `turn` to the other party and
//! waits while the other party is interested and holds the turn. Whoever
//! writes `turn` last waits, so a waiting party is let in after at most one
//! more entry by the other.
//!
//! The protocol relies on a store to `flag`/`turn` being visible to the other
//! party before its own subsequent load, which only sequentially consistent
//! atomics provide. It is defined for exactly two parties; there is no N-party
//! extension here and any party id other than 0 or 1 is rejected.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{Result, SpoolError};

/// Number of parties the algorithm can arbitrate between.
pub const PARTIES: usize = 2;

#[derive(Debug)]
pub struct PetersonLock {
    flag: [AtomicBool; PARTIES],
    turn: AtomicUsize,
}

impl Default for PetersonLock {
    fn default() -> Self {
        Self::new()
    }
}

impl PetersonLock {
    pub fn new() -> Self {
        Self {
            flag: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicUsize::new(0),
        }
    }

    /// Reject configurations with more contenders than the algorithm supports.
    pub fn check_contenders(contexts: usize) -> Result<()> {
        if contexts > PARTIES {
            return Err(SpoolError::ContentionViolation { contexts });
        }
        Ok(())
    }

    /// Enter the critical section as `party`, spinning until it is safe.
    ///
    /// The spin yields to the runtime on every iteration so the other party
    /// can make progress even on a single-threaded runtime. Dropping the
    /// returned guard, or dropping this future while it waits, withdraws
    /// the party's interest.
    pub async fn acquire(&self, party: usize) -> Result<PetersonGuard<'_>> {
        if party >= PARTIES {
            return Err(SpoolError::ContentionViolation { contexts: party + 1 });
        }
        let other = 1 - party;

        self.flag[party].store(true, Ordering::SeqCst);
        let guard = PetersonGuard { lock: self, party };
        self.turn.store(other, Ordering::SeqCst);

        while self.flag[other].load(Ordering::SeqCst) && self.turn.load(Ordering::SeqCst) == other
        {
            std::hint::spin_loop();
            tokio::task::yield_now().await;
        }

        Ok(guard)
    }

    /// Whether `party` has announced interest in the critical section.
    pub fn wants_entry(&self, party: usize) -> bool {
        self.flag
            .get(party)
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn turn(&self) -> usize {
        self.turn.load(Ordering::SeqCst)
    }
}

/// Held while inside the critical section; leaving clears the party's flag.
#[derive(Debug)]
pub struct PetersonGuard<'a> {
    lock: &'a PetersonLock,
    party: usize,
}

impl PetersonGuard<'_> {
    pub fn party(&self) -> usize {
        self.party
    }
}

impl Drop for PetersonGuard<'_> {
    fn drop(&mut self) {
        self.lock.flag[self.party].store(false, Ordering::SeqCst);
    }
}
