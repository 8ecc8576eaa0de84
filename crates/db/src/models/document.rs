//! Document and document-locale row models.

use ridgeline_core::document::{DocumentLocale, DocumentType, DocumentView};
use ridgeline_core::types::DbId;
use sqlx::FromRow;

/// Keys of [`DocumentView`] that stored attributes may not override.
const RESERVED_KEYS: &[&str] = &["document_id", "type", "locales"];

/// A row from `documents`, joined with `users` for profile documents.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub document_id: DbId,
    pub document_type: String,
    pub quality: Option<String>,
    pub attributes: serde_json::Value,
    /// Only set for profile documents.
    pub user_name: Option<String>,
    /// Only set for profile documents.
    pub forum_username: Option<String>,
}

/// A row from the `document_locales` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentLocaleRow {
    pub document_id: DbId,
    pub lang: String,
    pub title: String,
    pub summary: Option<String>,
}

impl From<DocumentLocaleRow> for DocumentLocale {
    fn from(row: DocumentLocaleRow) -> Self {
        DocumentLocale {
            lang: row.lang,
            title: row.title,
            summary: row.summary,
        }
    }
}

impl TryFrom<DocumentRow> for DocumentView {
    type Error = sqlx::Error;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let document_type = row
            .document_type
            .parse::<DocumentType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let mut view = DocumentView::new(row.document_id, document_type);
        if let serde_json::Value::Object(mut attributes) = row.attributes {
            for key in RESERVED_KEYS {
                attributes.remove(*key);
            }
            view.attributes = attributes;
        }
        if let Some(quality) = row.quality {
            view.attributes
                .insert("quality".into(), serde_json::Value::String(quality));
        }
        if let Some(name) = row.user_name {
            view.attributes
                .insert("name".into(), serde_json::Value::String(name));
        }
        if let Some(forum_username) = row.forum_username {
            view.attributes.insert(
                "forum_username".into(),
                serde_json::Value::String(forum_username),
            );
        }
        Ok(view)
    }
}
