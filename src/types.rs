use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modes::Mode;

/// Wall-clock time carried by tick events.
pub type Timestamp = DateTime<Utc>;

/// A requested mode change: either an absolute mode or a relative seek.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Set(Mode),
    Seek(isize),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ModeChange(ModeRequest),
    Tick(Timestamp),
    /// Terminal size as (rows, cols).
    WindowResize(u16, u16),
    /// Raw `getbestblockhash` response envelope; the hash lives under `result`.
    BestBlockHash(Value),
    Quit,
}

/// Verbose `getblockheader` result (only the fields the dashboard reads).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub hash: String,
    pub height: u64,
}

/// Verbose `getblock` result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub hash: String,
    pub height: u64,
    pub size: u64,
    pub weight: u64,
    /// Block timestamp in unix seconds.
    pub time: i64,
    pub tx: Vec<String>,
    pub difficulty: f64,
    /// Cumulative work, hex encoded.
    pub chainwork: String,
}

impl BlockRecord {
    /// The first listed transaction creates the block reward.
    pub fn coinbase_txid(&self) -> Option<&str> {
        self.tx.first().map(String::as_str)
    }
}

/// Verbose `getrawtransaction` result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    pub txid: String,
    pub size: u64,
    pub vout: Vec<TxOut>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxOut {
    /// Output value in whole coins, as reported by the node.
    pub value: f64,
}
