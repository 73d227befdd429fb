//! Client modules for the UniSender API

pub mod hooks;
pub mod methods;
pub mod transport;
pub mod unisender;

// Re-export all client types
pub use hooks::{NoopHook, ResponseHook, StrictResponseHook};
pub use methods::{to_camel_case, ApiMethod};
pub use transport::{ApiResponse, HttpTransport, Transport};
pub use unisender::UnisenderClient;
