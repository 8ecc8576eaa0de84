//! Document kinds and the hydrated document views embedded in feed entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// The closed set of document kinds a change can point at.
///
/// Each kind is stored and serialized as its one-letter tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "a")]
    Area,
    #[serde(rename = "b")]
    Book,
    #[serde(rename = "c")]
    Article,
    #[serde(rename = "i")]
    Image,
    #[serde(rename = "m")]
    Map,
    #[serde(rename = "o")]
    Outing,
    #[serde(rename = "r")]
    Route,
    #[serde(rename = "u")]
    Profile,
    #[serde(rename = "w")]
    Waypoint,
    #[serde(rename = "x")]
    Xreport,
}

impl DocumentType {
    pub const ALL: [DocumentType; 10] = [
        DocumentType::Area,
        DocumentType::Book,
        DocumentType::Article,
        DocumentType::Image,
        DocumentType::Map,
        DocumentType::Outing,
        DocumentType::Route,
        DocumentType::Profile,
        DocumentType::Waypoint,
        DocumentType::Xreport,
    ];

    /// The one-letter tag used in storage and on the wire.
    pub const fn tag(self) -> &'static str {
        match self {
            DocumentType::Area => "a",
            DocumentType::Book => "b",
            DocumentType::Article => "c",
            DocumentType::Image => "i",
            DocumentType::Map => "m",
            DocumentType::Outing => "o",
            DocumentType::Route => "r",
            DocumentType::Profile => "u",
            DocumentType::Waypoint => "w",
            DocumentType::Xreport => "x",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.tag() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown document type '{s}'")))
    }
}

/// One language version of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLocale {
    pub lang: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A hydrated document as it appears inside a feed entry.
///
/// `document_id` is the key used to merge views of every type into one map.
/// Type-specific fields (a profile's name, an image's filename, ...) live in
/// `attributes` and are flattened into the JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    pub document_id: DbId,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub locales: Vec<DocumentLocale>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl DocumentView {
    pub fn new(document_id: DbId, document_type: DocumentType) -> Self {
        Self {
            document_id,
            document_type,
            locales: Vec::new(),
            attributes: serde_json::Map::new(),
        }
    }
}
