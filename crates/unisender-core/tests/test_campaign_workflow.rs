//! Campaign workflow against a scripted in-memory transport
//!
//! Each test scripts the responses per API method and then checks which
//! requests the workflow actually sent.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use unisender_core::{
    list_title, ApiCampaignSteps, ApiResponse, CampaignRequest, CampaignSettings, CampaignWorkflow,
    EmailMessage, EmailType, NestedValue, Recipient, RequestParameters, Result, Scalar,
    StrictResponseHook, Transport, UnisenderClient, UnisenderConfig, UnisenderError,
};

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<(u16, Value)>>>,
    requests: Mutex<Vec<(String, RequestParameters)>>,
}

impl ScriptedTransport {
    fn respond(self, method: &str, status: u16, body: Value) -> Self {
        self.responses.lock().unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back((status, body));
        self
    }

    fn methods_called(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    fn requests_for(&self, method: &str) -> Vec<RequestParameters> {
        self.requests.lock().unwrap().iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_form(&self, url: &str, params: &RequestParameters) -> Result<ApiResponse> {
        let method = url.rsplit('/').next().unwrap_or_default().to_string();
        self.requests.lock().unwrap().push((method.clone(), params.clone()));

        let (status, body) = self.responses.lock().unwrap()
            .get_mut(&method)
            .and_then(VecDeque::pop_front)
            .unwrap_or((404, json!({"error": format!("unscripted call to {}", method)})));

        Ok(ApiResponse::new(status, url, body.to_string()))
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn workflow_over(transport: Arc<ScriptedTransport>) -> CampaignWorkflow<ApiCampaignSteps> {
    init_logging();
    let client = UnisenderClient::with_transport(UnisenderConfig::new("secret", "tests"), transport)
        .with_hook(Arc::new(StrictResponseHook));
    CampaignWorkflow::new(ApiCampaignSteps::new(client))
}

fn recipients() -> Vec<Recipient> {
    vec![
        Recipient::new("a@x.com").with_field("name", "A"),
        Recipient::new("b@x.com").with_field("name", "B"),
    ]
}

fn html_message() -> EmailMessage {
    EmailMessage::new(EmailType::Html, BTreeMap::new())
        .with_field("subject", "Mail subject")
        .with_field("sender_name", "John Lennon")
        .with_field("sender_email", "john@x.com")
        .with_field("body", "<html>hi</html>")
        .with_field("categories", vec!["First", "Second"])
}

fn happy_path() -> ScriptedTransport {
    ScriptedTransport::default()
        .respond("createList", 200, json!({"result": {"id": 1001}}))
        .respond("getFields", 200, json!({"result": [{"id": 1, "name": "city", "type": "string"}]}))
        .respond("createField", 200, json!({"result": {"id": 5}}))
        .respond("importContacts", 200, json!({"result": {"total": 2, "inserted": 2}}))
        .respond("createEmailMessage", 200, json!({"result": {"message_id": 2002}}))
        .respond("createCampaign", 200, json!({"result": {"campaign_id": 3003, "status": "scheduled"}}))
}

fn param<'a>(params: &'a RequestParameters, key: &str) -> Option<&'a Scalar> {
    params.get(key)
}

#[tokio::test]
async fn test_end_to_end_new_list() {
    let transport = Arc::new(happy_path());
    let workflow = workflow_over(transport.clone());

    let outcome = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .expect("workflow should succeed");

    assert!(outcome.success);
    assert_eq!(outcome.list_id, 1001);
    assert_eq!(outcome.message_id, 2002);
    assert_eq!(outcome.campaign_id, Some(3003));

    assert_eq!(transport.methods_called(), vec![
        "createList", "getFields", "createField", "importContacts", "createEmailMessage", "createCampaign",
    ]);

    let create_list = &transport.requests_for("createList")[0];
    assert_eq!(param(create_list, "title"), Some(&Scalar::from(list_title(&recipients()))));
    assert_eq!(param(create_list, "api_key"), Some(&Scalar::from("secret")));

    // only `name` is missing; email and the status columns are system fields
    let create_field = &transport.requests_for("createField")[0];
    assert_eq!(param(create_field, "name"), Some(&Scalar::from("name")));
    assert_eq!(param(create_field, "type"), Some(&Scalar::from("string")));

    let import = &transport.requests_for("importContacts")[0];
    assert_eq!(param(import, "field_names[0]"), Some(&Scalar::from("email")));
    assert_eq!(param(import, "field_names[1]"), Some(&Scalar::from("email_list_ids")));
    assert_eq!(param(import, "field_names[2]"), Some(&Scalar::from("email_status")));
    assert_eq!(param(import, "field_names[3]"), Some(&Scalar::from("name")));
    for row in 0..2 {
        assert_eq!(param(import, &format!("data[{}][1]", row)), Some(&Scalar::from("1001")));
        assert_eq!(param(import, &format!("data[{}][2]", row)), Some(&Scalar::from("active")));
    }
    assert_eq!(param(import, "data[1][0]"), Some(&Scalar::from("b@x.com")));
    assert_eq!(param(import, "data[1][3]"), Some(&Scalar::from("B")));
    assert_eq!(param(import, "overwrite_lists").map(Scalar::to_wire_string), Some("1".to_string()));

    let message = &transport.requests_for("createEmailMessage")[0];
    assert_eq!(param(message, "categories"), Some(&Scalar::from("First,Second")));
    assert_eq!(param(message, "list_id").map(Scalar::to_wire_string), Some("1001".to_string()));
    assert_eq!(param(message, "subject"), Some(&Scalar::from("Mail subject")));

    let campaign = &transport.requests_for("createCampaign")[0];
    assert_eq!(param(campaign, "message_id").map(Scalar::to_wire_string), Some("2002".to_string()));
    assert_eq!(param(campaign, "track_read").map(Scalar::to_wire_string), Some("0".to_string()));
    assert!(param(campaign, "start_time").is_none());
}

#[tokio::test]
async fn test_existing_list_is_reused() {
    let title = list_title(&recipients());
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"error": "List with this title already exists", "code": "unspecified"}))
            .respond("getLists", 200, json!({"result": [
                {"id": 7, "title": "mailing_list_other"},
                {"id": 1001, "title": title}
            ]}))
            .respond("getFields", 200, json!({"result": [{"id": 1, "name": "name", "type": "string"}]}))
            .respond("importContacts", 200, json!({"result": {"total": 2}}))
            .respond("createEmailMessage", 200, json!({"result": {"message_id": 2002}}))
            .respond("createCampaign", 200, json!({"result": {"campaign_id": 3003}})),
    );
    let workflow = workflow_over(transport.clone());

    let outcome = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .unwrap();

    assert_eq!(outcome.list_id, 1001);
    assert_eq!(transport.methods_called(), vec![
        "createList", "getLists", "getFields", "importContacts", "createEmailMessage", "createCampaign",
    ]);
}

#[tokio::test]
async fn test_unresolvable_list_aborts() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"result": {}}))
            .respond("getLists", 200, json!({"result": [{"id": 7, "title": "mailing_list_other"}]})),
    );
    let workflow = workflow_over(transport.clone());

    let err = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::ListResolution(ref title) if title.starts_with("mailing_list_")));
    assert_eq!(transport.methods_called(), vec!["createList", "getLists"]);
}

#[tokio::test]
async fn test_http_failure_during_list_creation_aborts() {
    let transport = Arc::new(ScriptedTransport::default().respond("createList", 503, json!({})));
    let workflow = workflow_over(transport.clone());

    let err = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::Transport { status: 503, .. }));
    assert_eq!(transport.methods_called(), vec!["createList"]);
}

#[tokio::test]
async fn test_remote_error_during_import_aborts_without_rollback() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"result": {"id": 1001}}))
            .respond("getFields", 200, json!({"result": []}))
            .respond("createField", 200, json!({"result": {"id": 5}}))
            .respond("importContacts", 200, json!({"error": "invalid email"})),
    );
    let workflow = workflow_over(transport.clone());

    let err = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    match err {
        UnisenderError::Remote { status, url, message } => {
            assert_eq!(status, 200);
            assert!(url.ends_with("/en/api/importContacts"));
            assert_eq!(message, "invalid email");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
    let calls = transport.methods_called();
    assert_eq!(calls.last().map(String::as_str), Some("importContacts"));
    assert!(!calls.iter().any(|c| c.starts_with("delete")));
}

#[tokio::test]
async fn test_failed_campaign_creation_returns_false() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"result": {"id": 1001}}))
            .respond("getFields", 200, json!({"result": []}))
            .respond("createField", 200, json!({"result": {"id": 5}}))
            .respond("importContacts", 200, json!({"result": {}}))
            .respond("createEmailMessage", 200, json!({"result": {"message_id": "2002"}}))
            .respond("createCampaign", 200, json!({"error": "Not enough money"})),
    );
    let workflow = workflow_over(transport.clone());

    let outcome = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .expect("final step reports instead of raising");

    assert!(!outcome.success);
    assert_eq!(outcome.message_id, 2002);
    assert_eq!(outcome.campaign_id, None);
}

#[tokio::test]
async fn test_start_time_and_passthrough_parameters() {
    let transport = Arc::new(happy_path());
    let workflow = workflow_over(transport.clone());
    let start = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(9, 30, 45).unwrap();
    let settings = CampaignSettings::default()
        .with_start_time(start)
        .with_track_read(true)
        .with_param("timezone", "UTC");

    workflow.create_email_campaign(&recipients(), &html_message(), &settings).await.unwrap();

    let campaign = &transport.requests_for("createCampaign")[0];
    assert_eq!(param(campaign, "start_time"), Some(&Scalar::from("2026-10-18 09:30")));
    assert_eq!(param(campaign, "track_read").map(Scalar::to_wire_string), Some("1".to_string()));
    assert_eq!(param(campaign, "timezone"), Some(&Scalar::from("UTC")));
}

#[tokio::test]
async fn test_empty_recipients_make_no_calls() {
    let transport = Arc::new(happy_path());
    let workflow = workflow_over(transport.clone());

    let err = workflow
        .create_email_campaign(&[], &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::EmptyRecipients));
    assert!(transport.methods_called().is_empty());
}

#[tokio::test]
async fn test_batch_failure_keeps_earlier_side_effects() {
    let transport = Arc::new(happy_path());
    let workflow = workflow_over(transport.clone());

    let message = |data: Value| {
        match NestedValue::from(data) {
            NestedValue::Map(map) => EmailMessage::new(EmailType::Html, map),
            _ => unreachable!(),
        }
    };
    let campaigns = vec![
        CampaignRequest::new(message(json!({"subject": "One", "body": "<p>1</p>"}))),
        CampaignRequest::new(message(json!({"body": "<p>2</p>"}))),
        CampaignRequest::new(message(json!({"subject": "Three", "body": "<p>3</p>"}))),
    ];
    let defaults: BTreeMap<String, NestedValue> = match NestedValue::from(json!({
        "sender_name": "John Lennon",
        "sender_email": "john@x.com"
    })) {
        NestedValue::Map(map) => map,
        _ => unreachable!(),
    };

    let err = workflow
        .create_many_email_campaigns(campaigns, &recipients(), Some(&defaults), None)
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::Batch { index: 1, .. }));
    assert!(err.to_string().contains("subject"));
    assert!(err.to_string().ends_with("Campaign number: 1"));

    // campaign 0 ran to completion, campaign 2 never started
    assert_eq!(transport.requests_for("createCampaign").len(), 1);
    assert_eq!(transport.requests_for("createList").len(), 1);
    let sent_subject = param(&transport.requests_for("createEmailMessage")[0], "subject").cloned();
    assert_eq!(sent_subject, Some(Scalar::from("One")));
}

#[tokio::test]
async fn test_unknown_operation_is_rejected_before_sending() {
    init_logging();
    let transport = Arc::new(ScriptedTransport::default());
    let client = UnisenderClient::with_transport(UnisenderConfig::new("secret", "tests"), transport.clone());

    let err = client.invoke("send_fax", &NestedValue::empty_map()).await.unwrap_err();

    assert!(matches!(err, UnisenderError::UnknownOperation(ref name) if name == "send_fax"));
    assert!(transport.methods_called().is_empty());
}

#[tokio::test]
async fn test_every_missing_field_created_once() {
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"result": {"id": 1001}}))
            .respond("getFields", 200, json!({"result": [
                {"id": 1, "name": "city", "type": "string"},
                {"id": 2, "name": "Name", "type": "string"}
            ]}))
            .respond("createField", 200, json!({"result": {"id": 5}}))
            .respond("createField", 200, json!({"result": {"id": 6}}))
            .respond("createField", 200, json!({"result": {"id": 7}}))
            .respond("importContacts", 200, json!({"result": {"total": 2}}))
            .respond("createEmailMessage", 200, json!({"result": {"message_id": 2002}}))
            .respond("createCampaign", 200, json!({"result": {"campaign_id": 3003}})),
    );
    let workflow = workflow_over(transport.clone());
    let recipients = vec![
        Recipient::new("a@x.com").with_field("name", "A").with_field("city", "Kazan")
            .with_field("phone", "+700").with_field("vip", true),
        Recipient::new("b@x.com").with_field("name", "B").with_field("city", "Omsk")
            .with_field("phone", "+701").with_field("vip", false),
    ];

    workflow
        .create_email_campaign(&recipients, &html_message(), &CampaignSettings::default())
        .await
        .unwrap();

    let created: Vec<String> = transport.requests_for("createField").iter()
        .filter_map(|params| params.get("name").map(Scalar::to_wire_string))
        .collect();
    // field names are compared exactly, so "Name" does not cover "name"
    assert_eq!(created, vec!["name", "phone", "vip"]);
    assert_eq!(transport.requests_for("getFields").len(), 1);
}

#[tokio::test]
async fn test_steps_abort_on_error_response_even_over_lenient_client() {
    init_logging();
    let transport = Arc::new(
        ScriptedTransport::default()
            .respond("createList", 200, json!({"result": {"id": 1001}}))
            .respond("getFields", 200, json!({"result": [{"id": 1, "name": "name", "type": "string"}]}))
            .respond("importContacts", 200, json!({"error": "invalid email"}))
            .respond("createEmailMessage", 200, json!({"result": {"message_id": 2002}}))
            .respond("createCampaign", 200, json!({"result": {"campaign_id": 3003}})),
    );
    let client = UnisenderClient::with_transport(UnisenderConfig::new("secret", "tests"), transport.clone());
    let workflow = CampaignWorkflow::new(ApiCampaignSteps::new(client));

    let err = workflow
        .create_email_campaign(&recipients(), &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::Remote { ref message, .. } if message == "invalid email"));
    assert_eq!(transport.methods_called(), vec!["createList", "getFields", "importContacts"]);
}

#[tokio::test]
async fn test_recipient_without_email_makes_no_calls() {
    let transport = Arc::new(happy_path());
    let workflow = workflow_over(transport.clone());
    let no_email: Recipient = serde_json::from_value(json!({"name": "C"})).unwrap();
    let mut recipients = recipients();
    recipients.push(no_email);

    let err = workflow
        .create_email_campaign(&recipients, &html_message(), &CampaignSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, UnisenderError::MissingRecipientEmail(2)));
    assert!(transport.methods_called().is_empty());
}
