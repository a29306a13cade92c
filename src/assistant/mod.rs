//! Assistant endpoint integration.
//!
//! The session controller talks to the endpoint through the
//! [`AssistantEndpoint`] trait; [`HttpAssistant`] is the reqwest-backed
//! implementation used by the binary.

pub mod client;
pub mod protocol;

pub use client::HttpAssistant;
pub use protocol::{AssistantReply, AssistantRequest, ResponseMetadata};

use async_trait::async_trait;

use crate::error::AssistantError;

/// An external service that answers natural-language questions about cases.
#[async_trait]
pub trait AssistantEndpoint: Send + Sync {
    /// Issue one query. Any non-success outcome is an `AssistantError`.
    async fn query(&self, request: &AssistantRequest<'_>) -> Result<AssistantReply, AssistantError>;
}
