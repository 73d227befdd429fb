/// Workflow and wire-format constants

/// Contact fields that exist on every account and are never created
pub const EMAIL_SYSTEM_FIELDS: &[&str] = &[
    "delete",
    "tags",
    "email",
    "email_status",
    "email_availability",
    "email_list_ids",
    "email_subscribe_times",
    "email_unsubscribed_list_ids",
    "email_excluded_list_ids",
];

/// Synthetic import columns added to every contact row
pub const EMAIL_STATUS_FIELD: &str = "email_status";
pub const EMAIL_LIST_IDS_FIELD: &str = "email_list_ids";
pub const EMAIL_STATUS_ACTIVE: &str = "active";

/// Type used when creating missing contact fields
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// Deduplicated mailing lists are titled `{prefix}{fingerprint}`
pub const LIST_TITLE_PREFIX: &str = "mailing_list_";

/// `createCampaign` expects local time without seconds
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fingerprints are reduced into `[0, FINGERPRINT_MODULUS)`
pub const FINGERPRINT_MODULUS: u64 = 10_000_000_000;
