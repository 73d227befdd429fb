//! Campaign workflow orchestrator with strongly-typed steps

use super::contacts::{contact_field_names, validate_recipients};
use super::traits::CampaignSteps;
use super::types::{CampaignOutcome, CampaignRequest, CampaignSettings, EmailMessage};
use crate::error::{UnisenderError, Result};
use std::collections::BTreeMap;
use unisender_types::{NestedValue, Recipient};

/// Runs the five campaign steps in a fixed order.
///
/// Nothing is rolled back on failure: lists, fields, contacts and messages
/// created by earlier steps stay on the remote side.
pub struct CampaignWorkflow<T: CampaignSteps> {
    steps: T,
}

impl<T: CampaignSteps> CampaignWorkflow<T> {
    pub fn new(steps: T) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &T {
        &self.steps
    }

    /// Create one campaign for `recipients`.
    ///
    /// Input is validated before the first remote call. Steps 1-4 propagate
    /// their errors; the final campaign creation is reported through
    /// [`CampaignOutcome::success`].
    pub async fn create_email_campaign(
        &self,
        recipients: &[Recipient],
        message: &EmailMessage,
        settings: &CampaignSettings,
    ) -> Result<CampaignOutcome> {
        validate_recipients(recipients)?;
        message.validate()?;

        log::info!("Starting campaign workflow for {} recipients ({} message)",
                   recipients.len(), message.email_type);

        // Step 1: resolve list
        let list_id = self.steps.resolve_list(recipients).await?;
        log::info!("Step 1: Using mailing list {}", list_id);

        // Step 2: ensure fields
        let created_fields = self.steps.ensure_fields(&contact_field_names(recipients)).await?;
        log::info!("Step 2: Created {} missing contact fields", created_fields.len());

        // Step 3: import contacts
        self.steps.import_contacts(recipients, &[list_id]).await?;
        log::info!("Step 3: Imported {} contacts", recipients.len());

        // Step 4: create message
        let message_id = self.steps.create_message(message, list_id).await?;
        log::info!("Step 4: Created message {}", message_id);

        // Step 5: create campaign
        let creation = self.steps.create_campaign(message_id, settings).await?;
        log::info!("Step 5: Campaign creation {}",
                   if creation.success { "succeeded" } else { "failed" });

        Ok(CampaignOutcome {
            list_id,
            message_id,
            campaign_id: creation.campaign_id,
            success: creation.success,
        })
    }

    /// Create several campaigns for the same recipients, one after another.
    ///
    /// Defaults only fill keys a campaign leaves unset. The first failure
    /// stops the batch and is returned tagged with the campaign's index;
    /// campaigns before it have already been created.
    pub async fn create_many_email_campaigns(
        &self,
        campaigns: Vec<CampaignRequest>,
        recipients: &[Recipient],
        default_email_data: Option<&BTreeMap<String, NestedValue>>,
        default_settings: Option<&CampaignSettings>,
    ) -> Result<Vec<CampaignOutcome>> {
        let mut outcomes = Vec::with_capacity(campaigns.len());

        for (index, mut campaign) in campaigns.into_iter().enumerate() {
            if let Some(defaults) = default_email_data {
                campaign.message.merge_defaults(defaults);
            }
            if let Some(defaults) = default_settings {
                campaign.settings.merge_defaults(defaults);
            }

            let outcome = self.create_email_campaign(recipients, &campaign.message, &campaign.settings)
                .await
                .map_err(|e| {
                    log::error!("Campaign {} failed: {}", index, e);
                    UnisenderError::Batch { index, source: Box::new(e) }
                })?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
