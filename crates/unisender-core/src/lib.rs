//! UniSender Core Library
//!
//! Client for the UniSender marketing API plus the multi-step campaign
//! workflow built on top of it: find-or-create a recipient list, make sure
//! contact fields exist, import contacts, create the message and finally the
//! campaign.

pub mod config;
pub mod clients;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod hashing;
pub mod workflow;

// Re-export main types for easy access
pub use config::UnisenderConfig;
pub use error::{UnisenderError, Result};

pub use clients::{
    ApiMethod,
    ApiResponse,
    HttpTransport,
    NoopHook,
    ResponseHook,
    StrictResponseHook,
    Transport,
    UnisenderClient,
};

pub use encoding::{encode, RequestParameters};
pub use hashing::{fingerprint, list_title};

pub use workflow::{
    ApiCampaignSteps,
    CampaignCreation,
    CampaignOutcome,
    CampaignRequest,
    CampaignSettings,
    CampaignSteps,
    CampaignWorkflow,
    EmailMessage,
};

pub use unisender_types::{ContactField, EmailType, MailingList, NestedValue, Recipient, Scalar};
