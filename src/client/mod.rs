//! # Clinic API Collaborator
//!
//! The live board talks to the backend only through [`ClinicApi`]. The
//! production implementation is [`HttpClinicApi`]; tests substitute an
//! in-memory fake.

pub mod error;
pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{CheckIn, ClinicConfig, DashboardMetrics};
use crate::state_machine::CheckInStatus;

pub use error::{ClientError, ClientResult};
pub use http::HttpClinicApi;

/// HTTP contract of the clinic backend consumed by the status workflow
#[async_trait]
pub trait ClinicApi: Send + Sync {
    /// `GET checkins/live/`, normalized to a flat list
    async fn live_checkins(&self) -> ClientResult<Vec<CheckIn>>;

    /// `POST checkins/{id}/set-status/`
    async fn set_status(&self, checkin_id: i64, status: CheckInStatus) -> ClientResult<()>;

    /// `POST checkins/{id}/complete/`
    async fn complete(&self, checkin_id: i64) -> ClientResult<()>;

    /// `GET clinic/config/`
    async fn clinic_config(&self) -> ClientResult<ClinicConfig>;

    /// `GET metrics/dashboard/?date=YYYY-MM-DD`
    async fn dashboard_metrics(&self, date: NaiveDate) -> ClientResult<DashboardMetrics>;
}
