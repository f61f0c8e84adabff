use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque token tying one dashboard row, its modal and its edit inputs to a
/// persisted advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Unsaved field values for a new advertisement. Values are forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementDraft {
    pub title: String,
    pub advertisement_number: String,
    pub website_url: String,
    pub description: String,
}

/// Field values for an existing advertisement. `id` comes from the row the user
/// acted on, never from the field contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementEdit {
    pub id: RecordId,
    pub title: String,
    pub advertisement_number: String,
    pub website_url: String,
    pub description: String,
}

impl AdvertisementEdit {
    pub fn new(id: RecordId, fields: AdvertisementDraft) -> Self {
        Self {
            id,
            title: fields.title,
            advertisement_number: fields.advertisement_number,
            website_url: fields.website_url,
            description: fields.description,
        }
    }
}
