//! Background timers that keep a mounted live board current.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::controller::{LiveBoardController, RefreshOutcome};
use crate::config::BoardTimingConfig;

/// Owns the clock tick and periodic refresh loops for one board.
///
/// Dropping the runtime stops both loops and tears the controller down, so
/// nothing touches the board after the view is gone.
#[derive(Debug)]
pub struct BoardRuntime {
    controller: Arc<LiveBoardController>,
    shutdown_notify: Arc<Notify>,
    handles: Vec<JoinHandle<()>>,
}

impl BoardRuntime {
    /// Run an initial refresh, then start the tick and refresh loops.
    pub async fn mount(controller: Arc<LiveBoardController>, timing: &BoardTimingConfig) -> Self {
        controller.tick(Utc::now());
        controller.refresh().await;
        Self::start(controller, timing.clock_tick(), timing.refresh_interval())
    }

    /// Start the loops without an initial refresh
    pub fn start(
        controller: Arc<LiveBoardController>,
        tick_interval: Duration,
        refresh_interval: Duration,
    ) -> Self {
        let shutdown_notify = Arc::new(Notify::new());

        let tick_controller = controller.clone();
        let tick_shutdown = shutdown_notify.clone();
        let tick_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(tick_interval) => {
                        if tick_controller.is_detached() {
                            break;
                        }
                        tick_controller.tick(Utc::now());
                    }
                    _ = tick_shutdown.notified() => {
                        debug!("Board clock loop shutting down");
                        break;
                    }
                }
            }
        });

        let refresh_controller = controller.clone();
        let refresh_shutdown = shutdown_notify.clone();
        let refresh_handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(refresh_interval) => {
                        if let RefreshOutcome::Detached = refresh_controller.refresh().await {
                            break;
                        }
                    }
                    _ = refresh_shutdown.notified() => {
                        debug!("Board refresh loop shutting down");
                        break;
                    }
                }
            }
        });

        info!(
            tick_seconds = tick_interval.as_secs(),
            refresh_seconds = refresh_interval.as_secs(),
            "Live board timers started"
        );

        Self {
            controller,
            shutdown_notify,
            handles: vec![tick_handle, refresh_handle],
        }
    }

    pub fn controller(&self) -> &Arc<LiveBoardController> {
        &self.controller
    }

    /// Stop both loops and detach the controller.
    pub fn shutdown(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.controller.teardown();
        self.shutdown_notify.notify_waiters();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        info!("Live board timers stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|handle| !handle.is_finished())
    }
}

impl Drop for BoardRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
