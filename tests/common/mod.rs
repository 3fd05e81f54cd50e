pub mod builders;
pub mod fake_api;
pub mod strategies;

pub use builders::*;
pub use fake_api::*;
pub use strategies::*;

use std::sync::Arc;

use clinic_flow::board::LiveBoardController;
use clinic_flow::client::ClinicApi;
use clinic_flow::labels::ClinicConfigProvider;
use clinic_flow::state_machine::TransitionPolicy;

/// Board wired to a fake backend with the standard transition table
#[allow(dead_code)]
pub fn board_with(api: Arc<FakeClinicApi>) -> LiveBoardController {
    let dyn_api: Arc<dyn ClinicApi> = api;
    let labels = Arc::new(ClinicConfigProvider::new(dyn_api.clone()));
    LiveBoardController::new(dyn_api, labels, TransitionPolicy::standard())
}
