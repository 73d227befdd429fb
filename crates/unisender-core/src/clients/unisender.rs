//! UniSender API client
//!
//! Every remote method goes through [`UnisenderClient::call`]: the arguments
//! are flattened into key-path form, merged over the default request data
//! and sent as one form POST to `{base_url}/{lang}/api/{camelCaseMethod}`.

use super::hooks::{NoopHook, ResponseHook, StrictResponseHook};
use super::methods::ApiMethod;
use super::transport::{ApiResponse, HttpTransport, Transport};
use crate::config::UnisenderConfig;
use crate::constants::DEFAULT_FIELD_TYPE;
use crate::encoding::{encode, RequestParameters};
use crate::error::{UnisenderError, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use unisender_types::{ContactField, MailingList, NestedValue};

#[derive(Clone)]
pub struct UnisenderClient {
    config: Arc<UnisenderConfig>,
    transport: Arc<dyn Transport>,
    hook: Arc<dyn ResponseHook>,
}

impl UnisenderClient {
    /// Client over HTTP that hands every response back unchecked
    pub fn new(config: UnisenderConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client over HTTP that fails on HTTP errors and embedded API errors
    pub fn strict(config: UnisenderConfig) -> Result<Self> {
        Ok(Self::new(config)?.with_hook(Arc::new(StrictResponseHook)))
    }

    pub fn with_transport(config: UnisenderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            hook: Arc::new(NoopHook),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn config(&self) -> &UnisenderConfig {
        &self.config
    }

    /// Parameters sent with every request
    pub fn default_request_data(&self) -> RequestParameters {
        let mut params = RequestParameters::new();
        params.insert("api_key", self.config.api_key.as_str());
        params.insert("platform", self.config.platform.as_str());
        params.insert("format", self.config.format.as_str());
        params
    }

    pub fn request_url(&self, method: ApiMethod) -> String {
        format!(
            "{}/{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.lang,
            method.path_segment()
        )
    }

    /// Default request data followed by the encoded arguments
    pub fn build_request_data(&self, args: &NestedValue) -> RequestParameters {
        let mut params = self.default_request_data();
        params.extend(encode(args, None));
        params
    }

    /// Call an allow-listed method with nested arguments
    pub async fn call(&self, method: ApiMethod, args: &NestedValue) -> Result<ApiResponse> {
        let url = self.request_url(method);
        let params = self.build_request_data(args);
        log::debug!("Calling {} with {} parameters", method, params.len());

        let response = self.transport.post_form(&url, &params).await?;
        self.hook.after_request(&response)?;
        Ok(response)
    }

    /// Call a method by its snake_case name.
    /// Names outside the allow-list fail before anything is sent.
    pub async fn invoke(&self, name: &str, args: &NestedValue) -> Result<ApiResponse> {
        let method: ApiMethod = name.parse()?;
        self.call(method, args).await
    }

    pub async fn get_lists(&self) -> Result<Vec<MailingList>> {
        let response = self.call(ApiMethod::GetLists, &NestedValue::empty_map()).await?;
        parse_result_array(&response, "getLists")
    }

    /// Returns the new list id, or `None` when the response carries no id
    pub async fn create_list(&self, title: &str) -> Result<Option<u64>> {
        let args = NestedValue::from(json!({ "title": title }));
        let response = self.call(ApiMethod::CreateList, &args).await?;
        Ok(response.result().and_then(|result| id_value(&result["id"])))
    }

    pub async fn get_fields(&self) -> Result<Vec<ContactField>> {
        let response = self.call(ApiMethod::GetFields, &NestedValue::empty_map()).await?;
        parse_result_array(&response, "getFields")
    }

    pub async fn create_field(&self, name: &str) -> Result<ApiResponse> {
        let args = NestedValue::from(json!({ "name": name, "type": DEFAULT_FIELD_TYPE }));
        self.call(ApiMethod::CreateField, &args).await
    }
}

fn parse_result_array<T: serde::de::DeserializeOwned>(response: &ApiResponse, method: &str) -> Result<Vec<T>> {
    match response.result() {
        Some(result) => Ok(serde_json::from_value(result)?),
        None => Err(UnisenderError::UnexpectedResponse(format!(
            "{} returned no result (status {})",
            method, response.status
        ))),
    }
}

/// Ids arrive as numbers or numeric strings depending on the method
pub(crate) fn id_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
