//! Retry pacing for RPC calls.

#[cfg(feature = "native")]
use rand::{thread_rng, Rng};

const BASE_DELAY_MS: u64 = 150;
const MAX_JITTER_MS: u64 = 100;

/// Delay before retry number `attempt` (1-based): 150, 300, 600, ... ms
/// capped at the 6th doubling, plus random jitter on native builds.
pub fn backoff_delay_ms(attempt: u32) -> u64 {
    let exp = attempt.clamp(1, 6) - 1;
    BASE_DELAY_MS.saturating_mul(1u64 << exp) + jitter_ms()
}

#[cfg(feature = "native")]
fn jitter_ms() -> u64 {
    thread_rng().gen_range(0..=MAX_JITTER_MS)
}

#[cfg(not(feature = "native"))]
fn jitter_ms() -> u64 {
    0
}

/// HTTP statuses worth retrying.
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}
