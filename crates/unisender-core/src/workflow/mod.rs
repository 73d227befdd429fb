//! Campaign workflow module

pub mod contacts;
pub mod orchestrator;
pub mod steps;
pub mod traits;
pub mod types;

pub use orchestrator::CampaignWorkflow;
pub use steps::ApiCampaignSteps;
pub use traits::CampaignSteps;
pub use types::{CampaignCreation, CampaignOutcome, CampaignRequest, CampaignSettings, EmailMessage};
