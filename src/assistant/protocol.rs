//! JSON wire types exchanged with the assistant endpoint.

use serde::{Deserialize, Serialize};

use crate::cases::Case;

/// Body of a query POST.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AssistantRequest<'a> {
    pub query: &'a str,
    /// Every known case, sent as context.
    pub cases: &'a [Case],
    /// The case the analyst is looking at, or `null`.
    #[serde(rename = "selectedCase")]
    pub selected_case: Option<&'a Case>,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl AssistantReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            metadata: None,
        }
    }

    pub fn with_case_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let metadata = self.metadata.get_or_insert_with(ResponseMetadata::default);
        metadata.case_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Optional extras the endpoint attaches to a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Case numbers referenced in the reply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub case_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether a selected case was part of the context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_context: Option<bool>,
    /// Backend-side error tag (e.g. `api_key_missing`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::demo_cases;

    #[test]
    fn request_uses_selected_case_key() {
        let cases = demo_cases();
        let request = AssistantRequest {
            query: "hello",
            cases: &cases,
            selected_case: None,
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["query"], "hello");
        assert!(value["selectedCase"].is_null());
        assert_eq!(value["cases"].as_array().unwrap().len(), 3);

        let request = AssistantRequest {
            selected_case: Some(&cases[2]),
            ..request
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["selectedCase"]["case_number"], "FCRM-2025-001256");
    }

    #[test]
    fn reply_metadata_is_optional() {
        let reply: AssistantReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert_eq!(reply, AssistantReply::text("hi"));

        let reply: AssistantReply = serde_json::from_str(
            r#"{"response": "see case", "metadata": {"caseIds": ["FCRM-2025-001234"], "model": "m", "hasContext": true}}"#,
        )
        .unwrap();
        let metadata = reply.metadata.unwrap();
        assert_eq!(metadata.case_ids, ["FCRM-2025-001234"]);
        assert_eq!(metadata.has_context, Some(true));
        assert!(metadata.error.is_none());
    }

    #[test]
    fn reply_requires_response_text() {
        assert!(serde_json::from_str::<AssistantReply>(r#"{"metadata": {}}"#).is_err());
    }
}
