//! Text-generation provider boundary.
//!
//! # Responsibility
//! - Define the provider SPI implemented by HTTP (or test) backends.
//! - Bound every provider call with a hard deadline via the gateway.
//!
//! # Invariants
//! - Providers are invoked strictly before any transcript mutation; no
//!   lock or transaction is ever held across a provider call.
//! - A provider result arriving after the deadline is discarded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod gateway;
mod http;

pub use gateway::{GenerationGateway, GatewayError, DEFAULT_GENERATION_DEADLINE};
pub use http::{HttpGenerationProvider, HttpProviderConfig};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider-reported failure with the upstream message preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// Stable machine-readable failure code.
    pub code: &'static str,
    /// Human-readable detail, verbatim from the provider where available.
    pub message: String,
}

impl ProviderError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "provider failure [{}]: {}", self.code, self.message)
    }
}

impl Error for ProviderError {}

/// SPI for external text-generation backends.
///
/// Implementations take one assembled prompt and return exactly one reply
/// string. They are driven from a gateway worker thread, hence `Send + Sync`.
pub trait GenerationProvider: Send + Sync {
    fn generate(&self, prompt: &str) -> ProviderResult<String>;
}
