//! Inputs and outputs of the campaign workflow

use crate::constants::START_TIME_FORMAT;
use crate::error::{UnisenderError, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use unisender_types::{EmailType, NestedValue, Scalar};

/// Message data for `createEmailMessage` together with its kind
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub email_type: EmailType,
    pub data: BTreeMap<String, NestedValue>,
}

impl EmailMessage {
    pub fn new(email_type: EmailType, data: BTreeMap<String, NestedValue>) -> Self {
        Self { email_type, data }
    }

    /// Build a message whose kind is inferred from the data keys
    pub fn detect(data: BTreeMap<String, NestedValue>) -> Result<Self> {
        let email_type = EmailType::detect(data.keys().map(String::as_str))
            .ok_or(UnisenderError::InvalidEmailData)?;
        Ok(Self::new(email_type, data))
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<NestedValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Fill in `defaults` for keys the message does not set
    pub fn merge_defaults(&mut self, defaults: &BTreeMap<String, NestedValue>) {
        for (key, value) in defaults {
            self.data.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Required fields absent from the data, sorted
    pub fn missing_fields(&self) -> Vec<String> {
        self.email_type.required_fields().iter()
            .filter(|field| !self.data.contains_key(**field))
            .map(|field| field.to_string())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(UnisenderError::MissingRequiredFields(missing))
        }
    }

    /// Arguments for `createEmailMessage`: categories collapsed into one
    /// comma-joined string and the target list attached
    pub fn to_request_args(&self, list_id: u64) -> NestedValue {
        let mut args = self.data.clone();
        if let Some(NestedValue::Seq(categories)) = args.get("categories") {
            let joined = categories.iter()
                .filter_map(NestedValue::as_scalar)
                .map(Scalar::to_wire_string)
                .collect::<Vec<_>>()
                .join(",");
            args.insert("categories".to_string(), NestedValue::from(joined));
        }
        args.insert("list_id".to_string(), NestedValue::from(list_id));
        NestedValue::Map(args)
    }
}

/// Options for `createCampaign`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignSettings {
    /// Send time; the campaign starts immediately when unset
    pub start_time: Option<NaiveDateTime>,
    pub track_read: Option<bool>,
    /// Passed through unchanged (e.g. `timezone`, `track_links`)
    pub extra: BTreeMap<String, NestedValue>,
}

impl CampaignSettings {
    pub fn with_start_time(mut self, start_time: NaiveDateTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_track_read(mut self, track_read: bool) -> Self {
        self.track_read = Some(track_read);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<NestedValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Fill in values from `defaults` that are not set here
    pub fn merge_defaults(&mut self, defaults: &CampaignSettings) {
        if self.start_time.is_none() {
            self.start_time = defaults.start_time;
        }
        if self.track_read.is_none() {
            self.track_read = defaults.track_read;
        }
        for (key, value) in &defaults.extra {
            self.extra.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn to_request_args(&self, message_id: u64) -> NestedValue {
        let mut args = self.extra.clone();
        args.insert("message_id".to_string(), NestedValue::from(message_id));
        if let Some(start_time) = self.start_time {
            args.insert(
                "start_time".to_string(),
                NestedValue::from(start_time.format(START_TIME_FORMAT).to_string()),
            );
        }
        args.insert("track_read".to_string(), NestedValue::from(self.track_read.unwrap_or(false)));
        NestedValue::Map(args)
    }
}

/// One entry of a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRequest {
    pub message: EmailMessage,
    pub settings: CampaignSettings,
}

impl CampaignRequest {
    pub fn new(message: EmailMessage) -> Self {
        Self {
            message,
            settings: CampaignSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CampaignSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Result of the final `createCampaign` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignCreation {
    pub campaign_id: Option<u64>,
    pub success: bool,
}

/// Everything a finished workflow run produced remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignOutcome {
    pub list_id: u64,
    pub message_id: u64,
    pub campaign_id: Option<u64>,
    pub success: bool,
}
