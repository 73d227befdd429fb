//! Allow-list of remote API methods

use crate::error::UnisenderError;
use std::fmt;
use std::str::FromStr;

macro_rules! api_methods {
    ($($variant:ident => $name:literal,)+) => {
        /// Every remote method the client is allowed to call
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ApiMethod {
            $($variant,)+
        }

        impl ApiMethod {
            pub const ALL: &'static [ApiMethod] = &[$(ApiMethod::$variant,)+];

            /// snake_case method name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ApiMethod::$variant => $name,)+
                }
            }
        }

        impl FromStr for ApiMethod {
            type Err = UnisenderError;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                match name {
                    $($name => Ok(ApiMethod::$variant),)+
                    other => Err(UnisenderError::UnknownOperation(other.to_string())),
                }
            }
        }
    };
}

api_methods! {
    // Lists and contacts
    GetLists => "get_lists",
    CreateList => "create_list",
    UpdateList => "update_list",
    DeleteList => "delete_list",
    Subscribe => "subscribe",
    Exclude => "exclude",
    Unsubscribe => "unsubscribe",
    ImportContacts => "import_contacts",
    ExportContacts => "export_contacts",
    GetTotalContactsCount => "get_total_contacts_count",
    GetContactCount => "get_contact_count",
    GetContact => "get_contact",
    GetFields => "get_fields",
    CreateField => "create_field",
    UpdateField => "update_field",
    DeleteField => "delete_field",
    GetTags => "get_tags",
    DeleteTag => "delete_tag",
    // Messages and campaigns
    CreateEmailMessage => "create_email_message",
    UpdateEmailMessage => "update_email_message",
    DeleteMessage => "delete_message",
    SendEmail => "send_email",
    SendTestEmail => "send_test_email",
    CheckEmail => "check_email",
    UpdateOptInEmail => "update_opt_in_email",
    GetMessages => "get_messages",
    GetMessage => "get_message",
    ListMessages => "list_messages",
    GetCheckedEmail => "get_checked_email",
    CreateCampaign => "create_campaign",
    CancelCampaign => "cancel_campaign",
    CreateSmsMessage => "create_sms_message",
    SendSms => "send_sms",
    CheckSms => "check_sms",
    GetActualMessageVersion => "get_actual_message_version",
    GetWebVersion => "get_web_version",
    CreateEmailTemplate => "create_email_template",
    UpdateEmailTemplate => "update_email_template",
    DeleteTemplate => "delete_template",
    GetTemplate => "get_template",
    GetTemplates => "get_templates",
    ListTemplates => "list_templates",
    GetCampaignDeliveryStats => "get_campaign_delivery_stats",
    GetCampaignCommonStats => "get_campaign_common_stats",
    GetVisitedLinks => "get_visited_links",
    GetCampaigns => "get_campaigns",
    GetCampaignStatus => "get_campaign_status",
    // Account
    ValidateSender => "validate_sender",
    Register => "register",
    CheckUserExists => "check_user_exists",
    GetUserInfo => "get_user_info",
    GetUsers => "get_users",
    TransferMoney => "transfer_money",
    GetAvailableTariffs => "get_available_tariffs",
    ChangeTariff => "change_tariff",
    SetSenderDomain => "set_sender_domain",
}

impl ApiMethod {
    /// camelCase segment used in the request path
    pub fn path_segment(&self) -> String {
        to_camel_case(self.as_str())
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `create_email_message` -> `createEmailMessage`.
/// Parts after the first are capitalized with the rest lowercased; an empty
/// part (doubled underscore) is kept as `_`.
pub fn to_camel_case(snake: &str) -> String {
    let mut parts = snake.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) => {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
            None => out.push('_'),
        }
    }
    out
}
