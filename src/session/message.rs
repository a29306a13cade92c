//! Chat transcript entries.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assistant::{AssistantReply, ResponseMetadata};
use crate::error::AssistantError;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// What produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Synthetic greeting shown the first time the session opens.
    Welcome,
    /// Text the analyst sent.
    Query,
    /// Answer from the endpoint.
    Reply,
    /// Synthetic message standing in for a failed request.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub kind: MessageKind,
    /// Markdown text.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    pub created_at: DateTime<Utc>,
}

const WELCOME: &str = "\
Hello! I'm your **case analysis copilot**. I can help you with:

### What I Can Do
- **Summaries**: concise overviews of a case or of the whole case list
- **Questions & answers**: parties, transactions, alerts and risk assessments
- **Analysis**: transaction patterns, risk factors and anomalies
- **Investigation support**: alert scenarios and screening hits

### Try These
- \"Give me a detailed summary of case FCRM-2025-001234\"
- \"What are all the high-risk cases and why are they flagged?\"
- \"Compare the risk scores across all cases\"
- \"What sanctions screening hits do we have?\"

Select a case first to get case-specific suggestions. How can I help?";

impl ChatMessage {
    fn new(role: Role, kind: MessageKind, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            kind,
            content,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn welcome() -> Self {
        Self::new(Role::Assistant, MessageKind::Welcome, WELCOME.to_string())
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageKind::Query, text.into())
    }

    pub fn reply(reply: AssistantReply) -> Self {
        Self {
            metadata: reply.metadata,
            ..Self::new(Role::Assistant, MessageKind::Reply, reply.response)
        }
    }

    /// Assistant-role message describing a failed request.
    pub fn failure(error: &AssistantError) -> Self {
        let content = format!(
            "I apologize, but I encountered an error processing your request. \
             Please check that the assistant service is reachable and try again.\n\n\
             **Error details:** {}",
            error
        );
        Self::new(Role::Assistant, MessageKind::Error, content)
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }

    /// Case numbers the reply refers to (empty when none were reported).
    pub fn referenced_cases(&self) -> &[String] {
        self.metadata
            .as_ref()
            .map(|m| m.case_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Local wall-clock time, e.g. `14:05:09`.
    pub fn local_time(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
