//! Campaign steps backed by the UniSender API

use async_trait::async_trait;
use super::contacts::{contact_field_names, contact_rows, validate_recipients};
use super::traits::CampaignSteps;
use super::types::{CampaignCreation, CampaignSettings, EmailMessage};
use crate::clients::unisender::id_value;
use crate::clients::{ApiMethod, StrictResponseHook, UnisenderClient};
use crate::config::UnisenderConfig;
use crate::constants::EMAIL_SYSTEM_FIELDS;
use crate::error::{UnisenderError, Result};
use crate::hashing::list_title;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use unisender_types::{NestedValue, Recipient};

/// Runs each step as API calls.
///
/// Steps 1-4 abort on HTTP errors and on error responses, so the client is
/// always switched to [`StrictResponseHook`] whatever hook it came with.
pub struct ApiCampaignSteps {
    client: UnisenderClient,
}

impl ApiCampaignSteps {
    pub fn new(client: UnisenderClient) -> Self {
        Self { client: client.with_hook(Arc::new(StrictResponseHook)) }
    }

    /// Steps over a strict HTTP client
    pub fn from_config(config: UnisenderConfig) -> Result<Self> {
        Ok(Self::new(UnisenderClient::strict(config)?))
    }

    pub fn client(&self) -> &UnisenderClient {
        &self.client
    }

    /// Id of the last list titled exactly `title`
    pub async fn find_list_id(&self, title: &str) -> Result<Option<u64>> {
        let lists = self.client.get_lists().await?;
        Ok(lists.into_iter()
            .filter(|list| list.title == title)
            .last()
            .map(|list| list.id))
    }
}

#[async_trait]
impl CampaignSteps for ApiCampaignSteps {
    async fn resolve_list(&self, recipients: &[Recipient]) -> Result<u64> {
        let title = list_title(recipients);

        // A list with this title usually means these recipients were sent to before
        let created = match self.client.create_list(&title).await {
            Ok(id) => id,
            Err(e @ UnisenderError::Remote { .. }) => {
                log::warn!("createList for '{}' refused ({}), looking it up", title, e);
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(list_id) = created {
            log::info!("Created mailing list '{}' with id {}", title, list_id);
            return Ok(list_id);
        }

        match self.find_list_id(&title).await? {
            Some(list_id) => {
                log::info!("Reusing mailing list '{}' with id {}", title, list_id);
                Ok(list_id)
            }
            None => Err(UnisenderError::ListResolution(title)),
        }
    }

    async fn ensure_fields(&self, field_names: &BTreeSet<String>) -> Result<Vec<String>> {
        let mut existing: BTreeSet<String> = EMAIL_SYSTEM_FIELDS.iter()
            .map(|name| name.to_string())
            .collect();
        existing.extend(self.client.get_fields().await?.into_iter().map(|field| field.name));

        let missing: Vec<String> = field_names.difference(&existing).cloned().collect();
        for name in &missing {
            self.client.create_field(name).await?;
            log::info!("Created contact field '{}'", name);
        }

        Ok(missing)
    }

    async fn import_contacts(&self, recipients: &[Recipient], list_ids: &[u64]) -> Result<()> {
        validate_recipients(recipients)?;

        let field_names = contact_field_names(recipients);
        let rows = contact_rows(&field_names, recipients, list_ids);

        let mut args = BTreeMap::new();
        args.insert("field_names".to_string(), NestedValue::from(field_names.into_iter().collect::<Vec<_>>()));
        args.insert("data".to_string(), NestedValue::from(rows));
        args.insert("overwrite_lists".to_string(), NestedValue::from(1i64));

        let response = self.client.call(ApiMethod::ImportContacts, &NestedValue::Map(args)).await?;
        if let Some(result) = response.result() {
            log::debug!("importContacts result: {}", result);
        }

        log::info!("Imported {} contacts into lists {:?}", recipients.len(), list_ids);
        Ok(())
    }

    async fn create_message(&self, message: &EmailMessage, list_id: u64) -> Result<u64> {
        message.validate()?;

        let response = self.client
            .call(ApiMethod::CreateEmailMessage, &message.to_request_args(list_id))
            .await?;

        let message_id = response.result()
            .and_then(|result| id_value(&result["message_id"]))
            .ok_or_else(|| UnisenderError::UnexpectedResponse(
                format!("createEmailMessage returned no message_id: {}", response.body)
            ))?;

        log::info!("Created {} email message {} for list {}", message.email_type, message_id, list_id);
        Ok(message_id)
    }

    async fn create_campaign(&self, message_id: u64, settings: &CampaignSettings) -> Result<CampaignCreation> {
        let args = settings.to_request_args(message_id);

        match self.client.call(ApiMethod::CreateCampaign, &args).await {
            Ok(response) => {
                let success = response.is_ok();
                let campaign_id = response.result().and_then(|result| id_value(&result["campaign_id"]));
                if success {
                    log::info!("Created campaign {:?} for message {}", campaign_id, message_id);
                } else {
                    log::warn!("createCampaign for message {} failed (status {})", message_id, response.status);
                }
                Ok(CampaignCreation { campaign_id, success })
            }
            Err(e) if e.is_request_failure() => {
                log::warn!("createCampaign for message {} failed: {}", message_id, e);
                Ok(CampaignCreation { campaign_id: None, success: false })
            }
            Err(e) => Err(e),
        }
    }
}
