//! Nonce generation for Korbit write requests.
//!
//! Korbit rejects a write whose nonce is not greater than the last one it saw
//! for the token, so every POST carries a fresh value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing nonces for authenticated writes.
///
/// The nonce must be strictly increasing for each request.
pub trait NonceProvider: Send + Sync {
    /// Generate the next nonce value.
    ///
    /// This value must be greater than any previously returned value.
    fn next_nonce(&self) -> u64;
}

/// A counter seeded from the clock at construction and incremented per request.
///
/// Seeding with unix seconds keeps a fresh session ahead of the values used by
/// an earlier one without persisting anything.
#[derive(Debug)]
pub struct IncreasingNonce {
    counter: AtomicU64,
}

impl IncreasingNonce {
    /// Create a provider seeded with the current unix time in seconds.
    pub fn new() -> Self {
        Self::starting_at(Self::current_time_secs())
    }

    /// Create a provider whose first nonce is `seed + 1`.
    pub fn starting_at(seed: u64) -> Self {
        Self {
            counter: AtomicU64::new(seed),
        }
    }

    fn current_time_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

impl Default for IncreasingNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for IncreasingNonce {
    fn next_nonce(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}
