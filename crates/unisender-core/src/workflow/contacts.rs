//! Contact import rows

use crate::constants::{EMAIL_LIST_IDS_FIELD, EMAIL_STATUS_ACTIVE, EMAIL_STATUS_FIELD};
use crate::error::{UnisenderError, Result};
use std::collections::BTreeSet;
use unisender_types::{Recipient, Scalar};

/// Recipients must be non-empty and every one must carry a non-empty email
pub fn validate_recipients(recipients: &[Recipient]) -> Result<()> {
    if recipients.is_empty() {
        return Err(UnisenderError::EmptyRecipients);
    }
    match recipients.iter().position(|r| r.email().map_or(true, str::is_empty)) {
        Some(index) => Err(UnisenderError::MissingRecipientEmail(index)),
        None => Ok(()),
    }
}

/// Import columns: the first recipient's fields plus the two status columns.
/// The first recipient is authoritative; extra fields on later ones are ignored.
pub fn contact_field_names(recipients: &[Recipient]) -> BTreeSet<String> {
    let mut names = recipients.first()
        .map(Recipient::field_names)
        .unwrap_or_default();
    names.insert(EMAIL_STATUS_FIELD.to_string());
    names.insert(EMAIL_LIST_IDS_FIELD.to_string());
    names
}

/// One row per recipient, values ordered like `field_names`.
/// A recipient lacking one of the columns gets an empty value for it.
pub fn contact_rows(field_names: &BTreeSet<String>, recipients: &[Recipient], list_ids: &[u64]) -> Vec<Vec<String>> {
    let joined_ids = list_ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    recipients.iter()
        .map(|recipient| {
            field_names.iter()
                .map(|name| match name.as_str() {
                    EMAIL_STATUS_FIELD => EMAIL_STATUS_ACTIVE.to_string(),
                    EMAIL_LIST_IDS_FIELD => joined_ids.clone(),
                    other => recipient.get(other).map(Scalar::to_wire_string).unwrap_or_default(),
                })
                .collect()
        })
        .collect()
}
