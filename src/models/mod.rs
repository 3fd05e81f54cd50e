pub mod checkin;
pub mod clinic;
pub mod metrics;
pub mod payload;

// Re-export core models for easy access
pub use checkin::{CheckIn, SetStatusRequest};
pub use clinic::ClinicConfig;
pub use metrics::{
    DashboardMetrics, OutcomeCount, ProviderCount, ProviderOutcomeCount, StatusCount,
    WaiterRecord,
};
pub use payload::ListPayload;
