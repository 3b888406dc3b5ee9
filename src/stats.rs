//! Derived block metrics shown in the monitor panel.
//!
//! Everything here is pure; numeric edge cases (no non-coinbase
//! transactions, empty blocks, non-positive denominators, clock skew) map to
//! substitute values instead of errors.

use crate::types::{BlockRecord, Timestamp, TxRecord};
use crate::util_text::{coins_to_units, COIN};

pub const HALVING_INTERVAL: u64 = 210_000;
pub const INITIAL_SUBSIDY: i64 = 50 * COIN;
/// Serialized block header size, excluded from the fee-rate denominator.
pub const HEADER_BYTES: i64 = 80;
/// Blocks older than this are assumed to be historical replay, not lag.
pub const SYNCING_THRESHOLD_SECS: i64 = 3 * 3600;

/// Subsidy in smallest units at `height` (halving schedule).
pub fn block_subsidy(height: u64) -> i64 {
    let halvings = height / HALVING_INTERVAL;
    if halvings >= 63 {
        0
    } else {
        INITIAL_SUBSIDY >> halvings
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TxAverages {
    pub bytes_per_tx: u64,
    pub weight_per_tx: u64,
}

/// Floor-divided size and weight per transaction; `None` for an empty tx list.
pub fn tx_averages(block: &BlockRecord) -> Option<TxAverages> {
    let n = block.tx.len() as u64;
    if n == 0 {
        return None;
    }
    Some(TxAverages {
        bytes_per_tx: block.size / n,
        weight_per_tx: block.weight / n,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeeStats {
    /// Sum of coinbase outputs.
    pub reward: i64,
    pub subsidy: i64,
    /// reward - subsidy
    pub fees: i64,
    /// Only present when the block has transactions besides the coinbase.
    pub detail: Option<FeeDetail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeeDetail {
    /// Fees as a percentage of the reward (0 when the reward is not positive).
    pub fee_pct: f64,
    /// Average fee per non-coinbase transaction, in milli-coins.
    pub mcoin_per_tx: f64,
    /// Approximate fee rate in smallest units per kilobyte (0 when the
    /// non-coinbase byte total is not positive).
    pub units_per_kb: f64,
}

pub fn fee_stats(block: &BlockRecord, coinbase: &TxRecord) -> FeeStats {
    let reward: i64 = coinbase.vout.iter().map(|o| coins_to_units(o.value)).sum();
    let subsidy = block_subsidy(block.height);
    let fees = reward - subsidy;

    let n = block.tx.len() as i64;
    let detail = if n > 1 {
        let fee_pct = if reward > 0 {
            fees as f64 * 100.0 / reward as f64
        } else {
            0.0
        };
        let mcoin_per_tx = fees as f64 / COIN as f64 / (n - 1) as f64 * 1000.0;

        let total_tx_size = block.size as i64 - HEADER_BYTES - coinbase.size as i64;
        let units_per_kb = if total_tx_size > 0 {
            fees as f64 * 1024.0 / total_tx_size as f64
        } else {
            0.0
        };
        Some(FeeDetail {
            fee_pct,
            mcoin_per_tx,
            units_per_kb,
        })
    } else {
        None
    };

    FeeStats {
        reward,
        subsidy,
        fees,
        detail,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockAge {
    /// Seconds since the block's embedded timestamp.
    Elapsed(u64),
    Syncing,
    InFuture,
}

pub fn block_age(now: Timestamp, block_time: i64) -> BlockAge {
    let delta = now.timestamp() - block_time;
    if delta > SYNCING_THRESHOLD_SECS {
        BlockAge::Syncing
    } else if delta > 0 {
        BlockAge::Elapsed(delta as u64)
    } else {
        BlockAge::InFuture
    }
}

/// log2 of a hex-encoded cumulative work value. `None` for zero or garbage.
pub fn chainwork_log2(hex: &str) -> Option<f64> {
    let hex = hex.trim().trim_start_matches("0x");
    if hex.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for ch in hex.chars() {
        let digit = ch.to_digit(16)?;
        value = value * 16.0 + digit as f64;
    }
    if value > 0.0 {
        Some(value.log2())
    } else {
        None
    }
}
