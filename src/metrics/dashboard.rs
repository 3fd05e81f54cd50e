//! Metrics dashboard controller: date selection, stale-retaining loads and
//! today-only auto-refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::cards::MetricsView;
use crate::board::BoardPhase;
use crate::client::ClinicApi;
use crate::config::MetricsConfig;
use crate::constants::messages;
use crate::events::{BoardEvent, BoardEventPublisher};
use crate::labels::ClinicConfigProvider;
use crate::logging::log_error;
use crate::models::DashboardMetrics;

/// Auto-refresh runs only while the selected date is today
pub fn should_auto_refresh(selected: NaiveDate, today: NaiveDate) -> bool {
    selected == today
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsOutcome {
    Applied,
    Failed { message: String },
    /// A load for a newer request was already applied
    Superseded,
    Detached,
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub phase: BoardPhase,
    pub selected_date: NaiveDate,
    /// Most recent successful payload, kept across failed loads
    pub metrics: Option<DashboardMetrics>,
    /// Day the retained payload belongs to
    pub metrics_date: Option<NaiveDate>,
    pub view: Option<MetricsView>,
    pub banner: Option<String>,
}

impl MetricsSnapshot {
    /// Loaded, but nothing to show
    pub fn no_metrics_message(&self) -> Option<&'static str> {
        match (self.phase, &self.metrics) {
            (BoardPhase::Loading | BoardPhase::Idle, _) => None,
            (_, None) => Some(messages::NO_METRICS),
            (_, Some(_)) => None,
        }
    }
}

#[derive(Debug)]
struct DashboardState {
    phase: BoardPhase,
    last_outcome: BoardPhase,
    selected_date: NaiveDate,
    metrics: Option<DashboardMetrics>,
    metrics_date: Option<NaiveDate>,
    banner: Option<String>,
    next_sequence: u64,
    applied_sequence: u64,
    pending: usize,
    detached: bool,
}

pub struct MetricsDashboard {
    api: Arc<dyn ClinicApi>,
    labels: Arc<ClinicConfigProvider>,
    waiter_limit: usize,
    refresh_interval: Duration,
    events: BoardEventPublisher,
    state: RwLock<DashboardState>,
    shutdown_notify: Arc<Notify>,
    refresh_handle: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for MetricsDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("MetricsDashboard")
            .field("phase", &state.phase)
            .field("selected_date", &state.selected_date)
            .field("detached", &state.detached)
            .finish()
    }
}

impl MetricsDashboard {
    pub fn new(
        api: Arc<dyn ClinicApi>,
        labels: Arc<ClinicConfigProvider>,
        config: &MetricsConfig,
        events: BoardEventPublisher,
        selected_date: NaiveDate,
    ) -> Self {
        Self {
            api,
            labels,
            waiter_limit: config.longest_waiters_limit,
            refresh_interval: config.refresh_interval(),
            events,
            state: RwLock::new(DashboardState {
                phase: BoardPhase::Idle,
                last_outcome: BoardPhase::Idle,
                selected_date,
                metrics: None,
                metrics_date: None,
                banner: None,
                next_sequence: 0,
                applied_sequence: 0,
                pending: 0,
                detached: false,
            }),
            shutdown_notify: Arc::new(Notify::new()),
            refresh_handle: parking_lot::Mutex::new(None),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.read().selected_date
    }

    /// Reload the currently selected day
    pub async fn reload(&self) -> MetricsOutcome {
        let date = self.selected_date();
        self.load(date).await
    }

    /// Select `date` and fetch its metrics. A failed load keeps the previous
    /// payload and raises a banner; a response for a date that is no longer
    /// selected is discarded.
    #[instrument(skip(self))]
    pub async fn load(&self, date: NaiveDate) -> MetricsOutcome {
        let sequence = {
            let mut state = self.state.write();
            if state.detached {
                return MetricsOutcome::Detached;
            }
            state.selected_date = date;
            state.next_sequence += 1;
            state.pending += 1;
            state.phase = BoardPhase::Loading;
            state.next_sequence
        };

        let (_, result) = futures::join!(self.labels.load(), self.api.dashboard_metrics(date));

        let mut state = self.state.write();
        state.pending = state.pending.saturating_sub(1);
        if state.detached {
            return MetricsOutcome::Detached;
        }
        if sequence < state.applied_sequence || date != state.selected_date {
            state.phase = if state.pending > 0 {
                BoardPhase::Loading
            } else {
                state.last_outcome
            };
            return MetricsOutcome::Superseded;
        }
        state.applied_sequence = sequence;

        let outcome = match result {
            Ok(metrics) => {
                let generated_at = metrics.generated_at;
                state.metrics = Some(metrics);
                state.metrics_date = Some(date);
                state.banner = None;
                state.last_outcome = BoardPhase::Ready;
                debug!(%date, "Applied dashboard metrics");
                self.events
                    .publish(BoardEvent::MetricsRefreshed { generated_at });
                MetricsOutcome::Applied
            }
            Err(e) => {
                log_error("metrics_dashboard", "load", &e.to_string(), Some(&date.to_string()));
                state.banner = Some(messages::METRICS_LOAD_FAILED.to_string());
                state.last_outcome = BoardPhase::Error;
                MetricsOutcome::Failed {
                    message: messages::METRICS_LOAD_FAILED.to_string(),
                }
            }
        };
        state.phase = if state.pending > 0 {
            BoardPhase::Loading
        } else {
            state.last_outcome
        };
        outcome
    }

    pub fn dismiss_banner(&self) {
        self.state.write().banner = None;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let labels = self.labels.current();
        let state = self.state.read();
        MetricsSnapshot {
            phase: state.phase,
            selected_date: state.selected_date,
            view: state
                .metrics
                .as_ref()
                .map(|metrics| MetricsView::build(metrics, &labels, self.waiter_limit)),
            metrics: state.metrics.clone(),
            metrics_date: state.metrics_date,
            banner: state.banner.clone(),
        }
    }

    /// Load the selected date, then auto-refresh at the configured interval.
    pub async fn mount<F>(self: &Arc<Self>, today: F) -> MetricsOutcome
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        let outcome = self.reload().await;
        self.start_auto_refresh(self.refresh_interval, today);
        outcome
    }

    /// [`MetricsDashboard::mount`] against the UTC wall clock
    pub async fn mount_utc(self: &Arc<Self>) -> MetricsOutcome {
        self.mount(|| Utc::now().date_naive()).await
    }

    /// Start the auto-refresh loop. Each tick reloads the selected date only
    /// if it equals `today()`. The loop only holds a weak reference, so it
    /// ends once the dashboard is dropped or torn down.
    pub fn start_auto_refresh<F>(self: &Arc<Self>, interval: Duration, today: F)
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        let weak = Arc::downgrade(self);
        let shutdown = self.shutdown_notify.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        let Some(dashboard) = weak.upgrade() else {
                            debug!("Metrics dashboard dropped; refresh loop exiting");
                            break;
                        };
                        let selected = dashboard.selected_date();
                        if !should_auto_refresh(selected, today()) {
                            continue;
                        }
                        if let MetricsOutcome::Detached = dashboard.load(selected).await {
                            break;
                        }
                    }
                    _ = shutdown.notified() => {
                        debug!("Metrics refresh loop shutting down");
                        break;
                    }
                }
            }
        });

        if let Some(previous) = self.refresh_handle.lock().replace(handle) {
            previous.abort();
        }
        info!(
            refresh_seconds = interval.as_secs(),
            "Metrics auto-refresh started"
        );
    }

    /// Stop auto-refresh and ignore any response still in flight.
    pub fn teardown(&self) {
        self.state.write().detached = true;
        self.shutdown_notify.notify_waiters();
        if let Some(handle) = self.refresh_handle.lock().take() {
            handle.abort();
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh_handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for MetricsDashboard {
    fn drop(&mut self) {
        self.shutdown_notify.notify_waiters();
        if let Some(handle) = self.refresh_handle.get_mut().take() {
            handle.abort();
        }
    }
}
