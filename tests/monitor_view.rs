mod support;

use chainmon::modes::Mode;
use chainmon::monitor::MonitorView;
use chainmon::screen::{with_screen, Screen, SharedScreen};
use chainmon::theme::Theme;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{envelope, wait_until, ScriptedSource};
use tokio::time::timeout;

const HASH_A: &str = "0000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const HASH_B: &str = "0000000000000000000bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const BLOCK_TIME: i64 = 1_631_333_672;

/// Panel rows on a 30-row terminal.
const PANEL: std::ops::RangeInclusive<u16> = 4..=24;

struct Fixture {
    source: Arc<ScriptedSource>,
    screen: SharedScreen,
    monitor: Arc<MonitorView>,
}

async fn fixture(visible: bool) -> Fixture {
    let source = ScriptedSource::new();
    source.add_block(HASH_A, 700_000, 2000, BLOCK_TIME, 6.35);
    source.add_block(HASH_B, 700_001, 1500, BLOCK_TIME + 600, 6.30);
    let screen = Screen::shared(30, 100);
    let monitor = Arc::new(MonitorView::new(
        source.clone(),
        screen.clone(),
        Theme::Classic.colors(),
    ));
    monitor.on_window_resize(30, 100).await;
    if visible {
        monitor.on_mode_change(Mode::Monitor).await;
    }
    Fixture { source, screen, monitor }
}

fn panel_text(screen: &SharedScreen) -> Vec<String> {
    with_screen(screen, |s| PANEL.map(|r| s.row_text(r)).collect())
}

fn take_dirty(screen: &SharedScreen) -> bool {
    with_screen(screen, |s| s.take_dirty())
}

#[tokio::test]
async fn new_hash_fetches_and_draws() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();

    assert_eq!(f.source.call_count("getblockheader"), 1);
    assert_eq!(f.source.call_count("getblock"), 1);
    assert_eq!(f.source.call_count("getrawtransaction"), 1);

    let rows = panel_text(&f.screen);
    assert!(rows[0].starts_with(" Height:   700000"));
    assert!(rows[0].contains(HASH_A));
    assert!(rows[2].contains("Transactions: 2000 (500 bytes/tx, 1996 WU/tx)"));
    assert!(rows[4].contains("Block reward: 6.350000 BTC"));
}

#[tokio::test]
async fn same_hash_is_not_refetched_or_redrawn() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    take_dirty(&f.screen);

    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();

    assert_eq!(f.source.calls().len(), 3);
    assert!(!take_dirty(&f.screen));
}

#[tokio::test]
async fn malformed_payloads_are_ignored() {
    let f = fixture(true).await;
    for payload in [
        json!({}),
        json!({"result": null, "error": {"code": -28, "message": "Loading block index..."}}),
        json!({"result": 42}),
        json!("not an object"),
    ] {
        f.monitor.on_best_block_hash(&payload).await.unwrap();
    }
    assert!(f.source.calls().is_empty());
    assert!(f.monitor.best_block().await.is_none());
}

#[tokio::test]
async fn draw_waits_for_in_flight_fetch() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();

    let gate = f.source.gate("getblock");
    let monitor = f.monitor.clone();
    let task = tokio::spawn(async move { monitor.on_best_block_hash(&envelope(HASH_B)).await });

    // The fetch for B is parked between header and block.
    let source = f.source.clone();
    wait_until(move || source.call_count("getblock") == 2).await;

    assert!(timeout(Duration::from_millis(50), f.monitor.draw()).await.is_err());
    assert!(timeout(Duration::from_millis(50), f.monitor.on_tick(Utc::now()))
        .await
        .is_err());
    assert!(panel_text(&f.screen)[0].contains(HASH_A));

    gate.notify_one();
    task.await.unwrap().unwrap();

    let best = f.monitor.best_block().await.unwrap();
    assert_eq!(best.hash, HASH_B);
    assert_eq!(best.header.hash, HASH_B);
    assert_eq!(best.block.hash, HASH_B);
    assert_eq!(best.coinbase.txid, support::coinbase_txid(HASH_B));
    let rows = panel_text(&f.screen);
    assert!(rows[0].contains(HASH_B));
    assert!(rows[0].contains("700001"));

    // Back to immediate answers: switching to A again completes unaided.
    f.source.ungate("getblock");
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    assert_eq!(f.monitor.best_block().await.unwrap().hash, HASH_A);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_block_and_retries() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    let before = panel_text(&f.screen);
    take_dirty(&f.screen);

    let coinbase_b = support::coinbase_txid(HASH_B);
    f.source.remove("getrawtransaction", &coinbase_b);
    let err = f.monitor.on_best_block_hash(&envelope(HASH_B)).await.unwrap_err();
    assert!(format!("{err:#}").contains(HASH_B));

    let best = f.monitor.best_block().await.unwrap();
    assert_eq!(best.hash, HASH_A);
    assert_eq!(best.block.hash, HASH_A);
    assert!(!take_dirty(&f.screen));
    assert_eq!(panel_text(&f.screen), before);

    // Same hash on the next poll is fetched again, not deduplicated.
    f.source.add_block(HASH_B, 700_001, 1500, BLOCK_TIME + 600, 6.30);
    f.monitor.on_best_block_hash(&envelope(HASH_B)).await.unwrap();
    assert_eq!(f.monitor.best_block().await.unwrap().hash, HASH_B);
    assert_eq!(f.source.call_count("getblockheader"), 3);
}

#[tokio::test]
async fn hidden_and_shown_again_without_refetch() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    let shown = panel_text(&f.screen);
    let calls = f.source.calls().len();

    f.monitor.on_mode_change(Mode::Peers).await;
    assert!(!f.monitor.is_visible());
    assert!(panel_text(&f.screen).iter().all(|r| r.is_empty()));

    f.monitor.on_mode_change(Mode::Monitor).await;
    assert!(f.monitor.is_visible());
    assert_eq!(panel_text(&f.screen), shown);
    assert_eq!(f.source.calls().len(), calls);
}

#[tokio::test]
async fn invisible_monitor_updates_data_without_drawing() {
    let f = fixture(false).await;
    take_dirty(&f.screen);

    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    f.monitor.on_tick(Utc::now()).await;
    f.monitor.on_window_resize(30, 90).await;

    assert_eq!(f.monitor.best_block().await.unwrap().hash, HASH_A);
    assert!(!take_dirty(&f.screen));
}

#[tokio::test]
async fn tick_refreshes_age() {
    let f = fixture(true).await;
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();

    let now = Utc.timestamp_opt(BLOCK_TIME + 3_725, 0).unwrap();
    f.monitor.on_tick(now).await;
    assert!(panel_text(&f.screen)[2].ends_with("(0d 01:02:05 by stamp)"));

    let later = Utc.timestamp_opt(BLOCK_TIME + 4 * 3600, 0).unwrap();
    f.monitor.on_tick(later).await;
    assert!(panel_text(&f.screen)[2].ends_with("(syncing)"));
}

#[tokio::test]
async fn tiny_terminal_is_not_drawn() {
    let f = fixture(true).await;
    f.monitor.on_window_resize(7, 100).await;
    take_dirty(&f.screen);
    f.monitor.on_best_block_hash(&envelope(HASH_A)).await.unwrap();
    assert!(!take_dirty(&f.screen));
}
