use std::sync::Arc;

use tokio::task::JoinSet;

use crate::footer::FooterView;
use crate::monitor::MonitorView;
use crate::rpc_utils::ChainSource;
use crate::screen::{with_screen, SharedScreen};
use crate::theme::ColorScheme;
use crate::types::AppEvent;

/// Routes every [`AppEvent`] to the footer and the monitor.
///
/// Footer handlers run inline. Monitor handlers that may wait on the node
/// run as their own tasks so a slow fetch never holds up input; the
/// monitor's lock keeps them ordered against each other.
pub struct App {
    quit: bool,
    screen: SharedScreen,
    footer: FooterView,
    monitor: Arc<MonitorView>,
    tasks: JoinSet<()>,
}

impl App {
    pub fn new(source: Arc<dyn ChainSource>, screen: SharedScreen, colors: ColorScheme) -> Self {
        let mut footer = FooterView::new(screen.clone(), colors);
        let monitor = Arc::new(MonitorView::new(source, screen.clone(), colors));
        footer.add_subscriber(monitor.clone());
        Self {
            quit: false,
            screen,
            footer,
            monitor,
            tasks: JoinSet::new(),
        }
    }

    pub fn quit_flag(&self) -> bool {
        self.quit
    }

    pub fn footer(&self) -> &FooterView {
        &self.footer
    }

    pub fn monitor(&self) -> &Arc<MonitorView> {
        &self.monitor
    }

    pub fn screen(&self) -> &SharedScreen {
        &self.screen
    }

    pub async fn on_event(&mut self, ev: AppEvent) {
        self.reap();
        match ev {
            AppEvent::ModeChange(request) => {
                self.footer.on_mode_change(request).await;
            }
            AppEvent::Tick(now) => {
                self.footer.on_tick(now).await;
                let monitor = self.monitor.clone();
                self.tasks.spawn(async move { monitor.on_tick(now).await });
            }
            AppEvent::WindowResize(rows, cols) => {
                log::debug!("terminal resized to {rows}x{cols}");
                with_screen(&self.screen, |s| s.resize(rows, cols));
                self.footer.on_window_resize(rows, cols).await;
                let monitor = self.monitor.clone();
                self.tasks
                    .spawn(async move { monitor.on_window_resize(rows, cols).await });
            }
            AppEvent::BestBlockHash(envelope) => {
                let monitor = self.monitor.clone();
                self.tasks.spawn(async move {
                    if let Err(e) = monitor.on_best_block_hash(&envelope).await {
                        log::warn!("best block update failed: {e:#}");
                    }
                });
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    /// Wait for every monitor task spawned so far.
    pub async fn settle(&mut self) {
        while let Some(res) = self.tasks.join_next().await {
            log_task_result(res);
        }
    }

    /// Abort outstanding monitor tasks.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
    }

    fn reap(&mut self) {
        while let Some(res) = self.tasks.try_join_next() {
            log_task_result(res);
        }
    }
}

fn log_task_result(res: Result<(), tokio::task::JoinError>) {
    if let Err(e) = res {
        if e.is_panic() {
            log::error!("monitor task panicked: {e}");
        }
    }
}
