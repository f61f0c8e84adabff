use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{AdvertisementDraft, AdvertisementEdit, RecordId};

const NO_INDICATOR_REASON: &str = "response carried no success indicator";
const NOT_AN_OBJECT_REASON: &str = "response body is not a JSON object";
const UNSPECIFIED_FAILURE_REASON: &str = "server reported failure";

/// Body of the create request. Sent form-encoded or as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAdvertisementRequest {
    pub advertisement_number: String,
    pub website_url: String,
    pub title: String,
    pub description: String,
}

impl From<&AdvertisementDraft> for CreateAdvertisementRequest {
    fn from(draft: &AdvertisementDraft) -> Self {
        Self {
            advertisement_number: draft.advertisement_number.clone(),
            website_url: draft.website_url.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdvertisementRequest {
    pub ad_id: RecordId,
    pub adv_num: String,
    pub adv_url: String,
    pub adv_title: String,
    pub adv_desc: String,
}

impl From<&AdvertisementEdit> for UpdateAdvertisementRequest {
    fn from(edit: &AdvertisementEdit) -> Self {
        Self {
            ad_id: edit.id.clone(),
            adv_num: edit.advertisement_number.clone(),
            adv_url: edit.website_url.clone(),
            adv_title: edit.title.clone(),
            adv_desc: edit.description.clone(),
        }
    }
}

/// Application-level result of a submission, independent of which response
/// shape the endpoint used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success { message: Option<String> },
    Failure { reason: String },
}

impl SubmissionOutcome {
    /// Maps a parsed response body onto success or failure.
    ///
    /// Recognized shapes, checked in order:
    /// - a truthy `error` field is a failure carrying that text;
    /// - a boolean `success` field decides the branch, with `message` (or
    ///   `error`) as the accompanying text;
    /// - a `message` field alone is a success.
    ///
    /// Anything else is a failure.
    pub fn from_body(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::Failure {
                reason: NOT_AN_OBJECT_REASON.to_string(),
            };
        };

        if let Some(reason) = object.get("error").and_then(truthy_text) {
            return Self::Failure { reason };
        }

        let message = object.get("message").and_then(truthy_text);

        match object.get("success").and_then(Value::as_bool) {
            Some(true) => Self::Success { message },
            Some(false) => Self::Failure {
                reason: message.unwrap_or_else(|| UNSPECIFIED_FAILURE_REASON.to_string()),
            },
            None if message.is_some() => Self::Success { message },
            None => Self::Failure {
                reason: NO_INDICATOR_REASON.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
