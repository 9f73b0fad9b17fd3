//! Builder slots
//!
//! Each required builder field is a type parameter that is either [`Missing`]
//! or holds the value itself, so `build()` only exists once both the endpoint
//! and the router are present and never has to unwrap them.

use crate::traits::{PushSocketError, Result};

/// A required field that has not been provided yet
#[derive(Debug, Clone, Copy, Default)]
pub struct Missing;

/// Base push URL, checked to be a WebSocket URL when built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub(crate) fn validate(self) -> Result<String> {
        if self.0.starts_with("ws://") || self.0.starts_with("wss://") {
            Ok(self.0)
        } else {
            Err(PushSocketError::Configuration(format!(
                "endpoint must use ws:// or wss://, got {}",
                self.0
            )))
        }
    }
}
