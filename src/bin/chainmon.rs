// Native binary for Chainmon - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::{interval, MissedTickBehavior};

use chainmon::{
    app::App,
    config::load,
    input, logging,
    rpc_utils::{ChainSource, RpcClient},
    screen::{with_screen, Screen, SharedScreen},
    source_rpc,
    types::{AppEvent, ModeRequest},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    logging::init(cfg.log_file.as_deref())?;
    cfg.log_summary();

    let source: Arc<dyn ChainSource> = Arc::new(RpcClient::new(
        &cfg.rpc_url,
        cfg.rpc_auth.clone(),
        cfg.rpc_timeout_ms,
        cfg.rpc_retries,
    )?);

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (cols, rows) = terminal::size()?;
    let screen = Screen::shared(rows, cols);

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(source.clone(), screen.clone(), cfg.theme.colors());

    let poll_task = tokio::spawn(source_rpc::run_best_block_poller(
        source,
        cfg.poll_interval_ms,
        tx.clone(),
    ));
    let tick_task = tokio::spawn(source_rpc::run_ticker(cfg.tick_interval_ms, tx.clone()));
    let input_task = input::spawn_input_reader(tx);

    app.on_event(AppEvent::WindowResize(rows, cols)).await;
    app.on_event(AppEvent::ModeChange(ModeRequest::Set(cfg.mode))).await;

    // main loop
    let result = run_loop(&mut app, &mut terminal, &screen, rx, cfg.render_fps).await;

    // cleanup
    poll_task.abort();
    tick_task.abort();
    app.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    // The reader notices the closed channel within one poll timeout.
    let _ = input_task.await;
    log::info!("chainmon exiting");
    result
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    screen: &SharedScreen,
    mut rx: UnboundedReceiver<AppEvent>,
    fps: u32,
) -> Result<()> {
    // frame budget (coalesced renders)
    let frame_ms = 1000u32.saturating_div(fps.max(1)) as u64;
    let mut frames = interval(Duration::from_millis(frame_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            ev = rx.recv() => match ev {
                Some(ev) => app.on_event(ev).await,
                None => break,
            },
            _ = frames.tick() => {
                if with_screen(screen, |s| s.take_dirty()) {
                    terminal.draw(|f| {
                        let area = f.area();
                        with_screen(screen, |s| f.render_widget(&*s, area));
                    })?;
                }
            }
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}
