//! Scripted in-memory stand-in for the clinic backend.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use clinic_flow::client::{ClientError, ClientResult, ClinicApi};
use clinic_flow::models::{CheckIn, ClinicConfig, DashboardMetrics};
use clinic_flow::state_machine::{CheckInStatus, WorkflowStatus};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    LiveCheckins,
    SetStatus { checkin_id: i64, status: CheckInStatus },
    Complete { checkin_id: i64 },
    ClinicConfig,
    DashboardMetrics { date: NaiveDate },
}

/// One scripted response: immediate, or held until the test releases it
pub enum Scripted<T> {
    Respond(ClientResult<T>),
    Gated(oneshot::Receiver<ClientResult<T>>),
}

/// Fake backend. Unscripted reads answer from the server-side state, and
/// accepted commands mutate that state the way the real backend would.
pub struct FakeClinicApi {
    live: Mutex<Vec<CheckIn>>,
    live_script: Mutex<VecDeque<Scripted<Vec<CheckIn>>>>,
    command_script: Mutex<VecDeque<Scripted<()>>>,
    clinic_config: Mutex<Option<ClinicConfig>>,
    clinic_config_delay: Mutex<Option<Duration>>,
    metrics_script: Mutex<VecDeque<Scripted<DashboardMetrics>>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeClinicApi {
    pub fn new(live: Vec<CheckIn>) -> Self {
        Self {
            live: Mutex::new(live),
            live_script: Mutex::new(VecDeque::new()),
            command_script: Mutex::new(VecDeque::new()),
            clinic_config: Mutex::new(Some(ClinicConfig::default())),
            clinic_config_delay: Mutex::new(None),
            metrics_script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_live(&self, live: Vec<CheckIn>) {
        *self.live.lock() = live;
    }

    pub fn fail_next_live(&self, error: ClientError) {
        self.live_script
            .lock()
            .push_back(Scripted::Respond(Err(error)));
    }

    /// Hold the next live response until the returned sender fires
    pub fn gate_next_live(&self) -> oneshot::Sender<ClientResult<Vec<CheckIn>>> {
        let (tx, rx) = oneshot::channel();
        self.live_script.lock().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn reject_next_command(&self, error: ClientError) {
        self.command_script
            .lock()
            .push_back(Scripted::Respond(Err(error)));
    }

    /// Hold the next command until the returned sender fires; `Ok` applies it
    pub fn gate_next_command(&self) -> oneshot::Sender<ClientResult<()>> {
        let (tx, rx) = oneshot::channel();
        self.command_script.lock().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn set_clinic_config(&self, config: Option<ClinicConfig>) {
        *self.clinic_config.lock() = config;
    }

    pub fn delay_clinic_config(&self, delay: Duration) {
        *self.clinic_config_delay.lock() = Some(delay);
    }

    pub fn respond_metrics(&self, result: ClientResult<DashboardMetrics>) {
        self.metrics_script
            .lock()
            .push_back(Scripted::Respond(result));
    }

    pub fn gate_next_metrics(&self) -> oneshot::Sender<ClientResult<DashboardMetrics>> {
        let (tx, rx) = oneshot::channel();
        self.metrics_script.lock().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, matcher: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| matcher(call)).count()
    }

    pub fn live_calls(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::LiveCheckins))
    }

    pub fn command_calls(&self) -> usize {
        self.count(|call| {
            matches!(call, ApiCall::SetStatus { .. } | ApiCall::Complete { .. })
        })
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }

    async fn resolve<T>(scripted: Scripted<T>) -> ClientResult<T> {
        match scripted {
            Scripted::Respond(result) => result,
            Scripted::Gated(rx) => rx.await.unwrap_or_else(|_| {
                Err(ClientError::invalid_response("gate", "sender dropped"))
            }),
        }
    }

    async fn run_command(&self, checkin_id: i64, status: CheckInStatus) -> ClientResult<()> {
        let scripted = self.command_script.lock().pop_front();
        if let Some(scripted) = scripted {
            Self::resolve(scripted).await?;
        }
        self.apply_status(checkin_id, status)
    }

    fn apply_status(&self, checkin_id: i64, status: CheckInStatus) -> ClientResult<()> {
        let mut live = self.live.lock();
        let Some(checkin) = live.iter_mut().find(|checkin| checkin.id == checkin_id) else {
            return Err(ClientError::api_error(404, "Not found."));
        };
        checkin.status = WorkflowStatus::Known(status);
        checkin.status_changed_at = Some(chrono::Utc::now());
        if status == CheckInStatus::Completed {
            live.retain(|checkin| checkin.id != checkin_id);
        }
        Ok(())
    }
}

#[async_trait]
impl ClinicApi for FakeClinicApi {
    async fn live_checkins(&self) -> ClientResult<Vec<CheckIn>> {
        self.record(ApiCall::LiveCheckins);
        let scripted = self.live_script.lock().pop_front();
        match scripted {
            Some(scripted) => Self::resolve(scripted).await,
            None => Ok(self.live.lock().clone()),
        }
    }

    async fn set_status(&self, checkin_id: i64, status: CheckInStatus) -> ClientResult<()> {
        self.record(ApiCall::SetStatus { checkin_id, status });
        self.run_command(checkin_id, status).await
    }

    async fn complete(&self, checkin_id: i64) -> ClientResult<()> {
        self.record(ApiCall::Complete { checkin_id });
        self.run_command(checkin_id, CheckInStatus::Completed).await
    }

    async fn clinic_config(&self) -> ClientResult<ClinicConfig> {
        self.record(ApiCall::ClinicConfig);
        let delay = *self.clinic_config_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let config = self.clinic_config.lock().clone();
        config.ok_or_else(|| ClientError::api_error(500, "clinic config unavailable"))
    }

    async fn dashboard_metrics(&self, date: NaiveDate) -> ClientResult<DashboardMetrics> {
        self.record(ApiCall::DashboardMetrics { date });
        let scripted = self.metrics_script.lock().pop_front();
        match scripted {
            Some(scripted) => Self::resolve(scripted).await,
            None => Ok(DashboardMetrics::default()),
        }
    }
}
