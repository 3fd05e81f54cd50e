// State machine module for the check-in workflow
//
// The backend owns check-in state; this module only decides which transitions
// the client may request, so the board can disable everything else up front.

pub mod errors;
pub mod policy;
pub mod states;

// Re-export main types for convenient access
pub use errors::{PolicyError, PolicyResult};
pub use policy::TransitionPolicy;
pub use states::{CheckInStatus, WorkflowStatus};
