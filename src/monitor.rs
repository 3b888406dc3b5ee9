//! Monitor panel: best block statistics.
//!
//! The best-block snapshot (hash, header, block, coinbase) and the clock sit
//! behind one async lock. A hash change fetches header, block and coinbase
//! while holding that lock and commits them together, and `draw` holds the
//! same lock for the whole render, so a panel never mixes two blocks.
//!
//! A failed fetch commits nothing: the previous snapshot stays on screen, the
//! new hash is not recorded (the next poll retries it) and the error is
//! returned to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;

use crate::canvas::Canvas;
use crate::footer::ModeSubscriber;
use crate::modes::Mode;
use crate::rpc_utils::{fetch_block, fetch_header, fetch_tx, ChainSource};
use crate::screen::{with_screen, Region, SharedScreen, MIN_WINDOW_SIZE};
use crate::stats::{block_age, chainwork_log2, fee_stats, tx_averages, BlockAge};
use crate::theme::ColorScheme;
use crate::types::{BlockRecord, HeaderRecord, Timestamp, TxRecord};
use crate::util_text::{format_coins, format_dhms, group_thousands};

pub const PANEL_ROWS: u16 = 20;
pub const PANEL_COLS: u16 = 100;
/// First terminal row of the panel.
const TOP_ROW: u16 = 4;
/// Last terminal row the panel may reach.
const MAX_BOTTOM_ROW: u16 = 24;
const MIN_ROWS: u16 = 8;
const MIN_COLS: u16 = 3;
/// Column of the right-hand field group.
const RIGHT_COL: u16 = 64;

/// Header, block and coinbase for one best-block hash.
#[derive(Clone, Debug, PartialEq)]
pub struct BestBlock {
    pub hash: String,
    pub header: HeaderRecord,
    pub block: BlockRecord,
    pub coinbase: TxRecord,
}

#[derive(Default)]
struct MonitorState {
    best: Option<BestBlock>,
    clock: Option<Timestamp>,
    canvas: Option<Canvas>,
}

pub struct MonitorView {
    source: Arc<dyn ChainSource>,
    screen: SharedScreen,
    colors: ColorScheme,

    state: AsyncMutex<MonitorState>,

    visible: AtomicBool,
    window_size: Mutex<(u16, u16)>,
}

impl MonitorView {
    pub fn new(source: Arc<dyn ChainSource>, screen: SharedScreen, colors: ColorScheme) -> Self {
        Self {
            source,
            screen,
            colors,
            state: AsyncMutex::new(MonitorState::default()),
            visible: AtomicBool::new(false),
            window_size: Mutex::new(MIN_WINDOW_SIZE),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn window_size(&self) -> (u16, u16) {
        *self.window_size.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current snapshot, taken under the lock.
    pub async fn best_block(&self) -> Option<BestBlock> {
        self.state.lock().await.best.clone()
    }

    /// Handle a `getbestblockhash` response envelope. Payloads without a
    /// string `result` are ignored.
    pub async fn on_best_block_hash(&self, envelope: &Value) -> Result<()> {
        let Some(hash) = envelope.get("result").and_then(Value::as_str) else {
            return Ok(());
        };

        let changed = {
            let mut state = self.state.lock().await;
            if state.best.as_ref().is_some_and(|b| b.hash == hash) {
                false
            } else {
                let best = fetch_best_block(self.source.as_ref(), hash)
                    .await
                    .with_context(|| format!("refreshing best block {hash}"))?;
                log::info!(
                    "best block {} at height {} ({} txs)",
                    best.hash,
                    best.header.height,
                    best.block.tx.len()
                );
                state.best = Some(best);
                true
            }
        };

        if changed && self.is_visible() {
            self.draw().await;
        }
        Ok(())
    }

    pub async fn on_tick(&self, now: Timestamp) {
        self.state.lock().await.clock = Some(now);
        if self.is_visible() {
            self.draw().await;
        }
    }

    pub async fn on_mode_change(&self, mode: Mode) {
        if mode != Mode::Monitor {
            // Stored data is kept for an instant redraw on return.
            if self.visible.swap(false, Ordering::SeqCst) {
                self.erase().await;
            }
            return;
        }
        self.visible.store(true, Ordering::SeqCst);
        self.draw().await;
    }

    pub async fn on_window_resize(&self, rows: u16, cols: u16) {
        *self.window_size.lock().unwrap_or_else(|e| e.into_inner()) = (rows, cols);
        if self.is_visible() {
            self.draw().await;
        }
    }

    pub async fn draw(&self) {
        let mut guard = self.state.lock().await;
        let MonitorState { best, clock, canvas } = &mut *guard;

        if let Some(canvas) = canvas.as_mut() {
            canvas.clear();
        }
        let canvas = canvas.get_or_insert_with(|| Canvas::new(PANEL_ROWS, PANEL_COLS));
        render_panel(canvas, best.as_ref(), *clock, &self.colors);
        self.project(canvas);
    }

    /// Blank the panel region without touching stored data.
    async fn erase(&self) {
        let mut guard = self.state.lock().await;
        if let Some(canvas) = guard.canvas.as_mut() {
            canvas.clear();
            self.project(canvas);
        }
    }

    fn project(&self, canvas: &Canvas) {
        let (rows, cols) = self.window_size();
        if rows < MIN_ROWS || cols < MIN_COLS {
            return;
        }
        let region = Region {
            top: TOP_ROW,
            left: 0,
            bottom: (rows - 3).min(MAX_BOTTOM_ROW),
            right: (cols - 1).min(PANEL_COLS),
        };
        with_screen(&self.screen, |s| s.project(canvas, 0, 0, region));
    }
}

#[async_trait]
impl ModeSubscriber for MonitorView {
    async fn on_mode_change(&self, mode: Mode) {
        MonitorView::on_mode_change(self, mode).await;
    }
}

/// Header, then block, then the block's coinbase transaction.
async fn fetch_best_block(source: &dyn ChainSource, hash: &str) -> Result<BestBlock> {
    let header = fetch_header(source, hash).await?;
    let block = fetch_block(source, hash).await?;
    let txid = block
        .coinbase_txid()
        .ok_or_else(|| anyhow!("block {hash} lists no transactions"))?
        .to_string();
    let coinbase = fetch_tx(source, &txid).await?;
    Ok(BestBlock {
        hash: hash.to_string(),
        header,
        block,
        coinbase,
    })
}

fn put_field(canvas: &mut Canvas, row: u16, col: u16, label: &str, value: &str, colors: &ColorScheme) {
    canvas.put_str(row, col, label, colors.label());
    canvas.put_str(row, col + label.len() as u16 + 1, value, colors.text());
}

/// Lay out the statistics panel for `best` (if any) onto `canvas`.
pub fn render_panel(
    canvas: &mut Canvas,
    best: Option<&BestBlock>,
    clock: Option<Timestamp>,
    colors: &ColorScheme,
) {
    let Some(best) = best else {
        return;
    };
    let (header, block) = (&best.header, &best.block);

    put_field(canvas, 0, 1, "Height:", &format!("{:>8}", header.height), colors);
    canvas.put_str(0, 36, &header.hash, colors.text());

    put_field(canvas, 1, 1, "Size:", &format!("{:>8} bytes", block.size), colors);
    put_field(canvas, 1, 36, "Weight:", &format!("{:>8} WU", block.weight), colors);
    let stamp = DateTime::from_timestamp(block.time, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".into());
    put_field(canvas, 1, RIGHT_COL, "Block timestamp:", &stamp, colors);

    if let Some(now) = clock {
        let (text, style) = match block_age(now, block.time) {
            BlockAge::Elapsed(secs) => (format!("({} by stamp)", format_dhms(secs)), colors.text()),
            BlockAge::Syncing => ("(syncing)".to_string(), colors.warn()),
            BlockAge::InFuture => ("(stamp in future)".to_string(), colors.warn()),
        };
        canvas.put_str(2, RIGHT_COL, "Age:", colors.label());
        canvas.put_str(2, RIGHT_COL + 14, &format!("{text:>22}"), style);
    }

    let txs = match tx_averages(block) {
        Some(avg) => format!(
            "{} ({} bytes/tx, {} WU/tx)",
            block.tx.len(),
            avg.bytes_per_tx,
            avg.weight_per_tx
        ),
        None => "0".to_string(),
    };
    put_field(canvas, 2, 1, "Transactions:", &txs, colors);

    let fees = fee_stats(block, &best.coinbase);
    put_field(canvas, 4, 1, "Block reward:", &format!("{} BTC", format_coins(fees.reward)), colors);
    if let Some(d) = &fees.detail {
        let text = format!(
            "{} BTC ({:6.2}%, avg {:6.2} mBTC/tx, ~{:7.0} sat/kB)",
            format_coins(fees.fees),
            d.fee_pct,
            d.mcoin_per_tx,
            d.units_per_kb
        );
        put_field(canvas, 4, 34, "Fees:", &text, colors);
    }

    put_field(canvas, 6, 1, "Diff:", &group_thousands(block.difficulty as u64), colors);
    let work = chainwork_log2(&block.chainwork)
        .map(|w| format!("2**{w:.6}"))
        .unwrap_or_else(|| "-".into());
    put_field(canvas, 7, 1, "Chain work:", &work, colors);
}
