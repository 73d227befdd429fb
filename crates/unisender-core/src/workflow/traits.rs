//! Campaign workflow step traits

use async_trait::async_trait;
use crate::error::Result;
use super::types::{CampaignCreation, CampaignSettings, EmailMessage};
use std::collections::BTreeSet;
use unisender_types::Recipient;

/// The individual remote steps of a campaign run.
///
/// Each step takes exactly what it needs, which keeps the orchestrator
/// testable with an in-memory implementation.
#[async_trait]
pub trait CampaignSteps: Send + Sync {
    /// Step 1: find or create the list named after the recipients' fingerprint
    async fn resolve_list(&self, recipients: &[Recipient]) -> Result<u64>;

    /// Step 2: create the contact fields not yet known remotely; returns the created names
    async fn ensure_fields(&self, field_names: &BTreeSet<String>) -> Result<Vec<String>>;

    /// Step 3: bulk import, replacing existing subscriptions on `list_ids`
    async fn import_contacts(&self, recipients: &[Recipient], list_ids: &[u64]) -> Result<()>;

    /// Step 4: create the email message for `list_id`; returns the message id
    async fn create_message(&self, message: &EmailMessage, list_id: u64) -> Result<u64>;

    /// Step 5: create the campaign. Remote failures are reported, not raised.
    async fn create_campaign(&self, message_id: u64, settings: &CampaignSettings) -> Result<CampaignCreation>;
}
