use crate::{rpc_utils::ChainSource, types::AppEvent};
use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};

/// Poll `getbestblockhash` forever, forwarding every answer as
/// [`AppEvent::BestBlockHash`]. Dedup is left to the monitor. Returns once
/// the event channel is closed.
pub async fn run_best_block_poller(
    source: Arc<dyn ChainSource>,
    poll_interval_ms: u64,
    tx: UnboundedSender<AppEvent>,
) -> Result<()> {
    log::info!("best block poller started, every {poll_interval_ms}ms");

    loop {
        match source.request("getbestblockhash", vec![]).await {
            Ok(hash) => {
                log::debug!("getbestblockhash -> {hash}");
                if tx.send(AppEvent::BestBlockHash(json!({ "result": hash }))).is_err() {
                    log::debug!("event channel closed, poller exiting");
                    return Ok(());
                }
            }
            Err(e) => {
                log::error!("RPC error: {e:#}");
            }
        }

        sleep(Duration::from_millis(poll_interval_ms)).await;
        if tx.is_closed() {
            return Ok(());
        }
    }
}

/// Emit [`AppEvent::Tick`] with the current time every `interval_ms`.
pub async fn run_ticker(interval_ms: u64, tx: UnboundedSender<AppEvent>) -> Result<()> {
    let mut ticks = interval(Duration::from_millis(interval_ms));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticks.tick().await;
        if tx.send(AppEvent::Tick(Utc::now())).is_err() {
            return Ok(());
        }
    }
}
