#![allow(clippy::doc_markdown)] // Allow technical terms like EMR, MRN in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Clinic Flow
//!
//! Client-side core of the check-in status workflow for an ambulatory surgery
//! center EMR front-end.
//!
//! ## Overview
//!
//! A patient check-in moves through `checked_in -> roomed -> ready ->
//! in_progress -> completed`. The backend owns that state; this crate decides
//! which transitions the client may request, keeps a polled live board of
//! active check-ins with time-in-status, and renders the server-aggregated
//! metrics dashboard with client-side alert interpretation.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Check-in statuses and the allowed-transition policy
//! - [`timing`] - Time-in-status calculation and formatting
//! - [`board`] - Live board controller, display order, row view-models, timers
//! - [`metrics`] - Dashboard cards, waiter ordering and threshold alerts
//! - [`labels`] - Clinic label overrides with built-in fallbacks
//! - [`client`] - HTTP collaborator contract and its reqwest implementation
//! - [`config`] - Layered configuration (defaults, TOML file, environment)
//! - [`events`] - Broadcast change notifications
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use clinic_flow::board::{BoardRuntime, LiveBoardController};
//! use clinic_flow::client::{ClinicApi, HttpClinicApi};
//! use clinic_flow::config::ConfigLoader;
//! use clinic_flow::labels::ClinicConfigProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! let api: Arc<dyn ClinicApi> = Arc::new(HttpClinicApi::new(config.api.clone())?);
//! let labels = Arc::new(ClinicConfigProvider::new(api.clone()));
//! let board = Arc::new(LiveBoardController::new(
//!     api,
//!     labels,
//!     config.transition_policy()?,
//! ));
//!
//! let runtime = BoardRuntime::mount(board.clone(), &config.board).await;
//! for row in board.snapshot().rows {
//!     println!("{} {} {}", row.patient_name, row.status.label, row.time_in_status);
//! }
//! drop(runtime);
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod labels;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod state_machine;
pub mod timing;

pub use board::{BoardError, BoardRuntime, BoardSnapshot, LiveBoardController, RefreshOutcome};
pub use client::{ClientError, ClinicApi, HttpClinicApi};
pub use config::{BoardConfig, ConfigLoader, ConfigurationError};
pub use error::{ClinicFlowError, Result};
pub use events::{BoardEvent, BoardEventPublisher};
pub use labels::{ClinicConfigProvider, WorkflowLabels};
pub use metrics::{is_alert, MetricsDashboard, MetricsView};
pub use models::{CheckIn, ClinicConfig, DashboardMetrics, WaiterRecord};
pub use state_machine::{CheckInStatus, TransitionPolicy, WorkflowStatus};
pub use timing::TimeInStatus;
