//! # Error Types
//!
//! Crate-level error handling. Each layer has its own `thiserror` enum
//! (`ClientError`, `BoardError`, `ConfigurationError`, `PolicyError`) and they
//! all convert into [`ClinicFlowError`].

use thiserror::Error;

use crate::board::BoardError;
use crate::client::ClientError;
use crate::config::ConfigurationError;
use crate::state_machine::PolicyError;

#[derive(Debug, Error)]
pub enum ClinicFlowError {
    #[error("Collaborator API error: {0}")]
    Client(#[from] ClientError),

    #[error("Live board error: {0}")]
    Board(#[from] BoardError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transition policy error: {0}")]
    Policy(#[from] PolicyError),
}

pub type Result<T> = std::result::Result<T, ClinicFlowError>;
