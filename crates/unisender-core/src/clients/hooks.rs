//! Post-response policies

use super::transport::ApiResponse;
use crate::error::{UnisenderError, Result};

/// Runs after every API call. Returning an error turns the response into a
/// failed call.
pub trait ResponseHook: Send + Sync {
    fn after_request(&self, response: &ApiResponse) -> Result<()>;
}

/// Accepts every response; callers inspect it themselves
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl ResponseHook for NoopHook {
    fn after_request(&self, _response: &ApiResponse) -> Result<()> {
        Ok(())
    }
}

/// Fails on non-2xx statuses and on responses carrying an `error` field
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictResponseHook;

impl ResponseHook for StrictResponseHook {
    fn after_request(&self, response: &ApiResponse) -> Result<()> {
        if !response.is_success() {
            log::error!("UniSender API HTTP error (status {}): {}", response.status, response.url);
            return Err(UnisenderError::Transport {
                status: response.status,
                url: response.url.clone(),
                detail: "HTTP error".to_string(),
            });
        }

        if let Some(message) = response.error() {
            log::error!("UniSender API error (status {}): {}", response.status, message);
            return Err(UnisenderError::Remote {
                status: response.status,
                url: response.url.clone(),
                message,
            });
        }

        Ok(())
    }
}
