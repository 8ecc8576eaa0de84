//! Change-log row model.

use ridgeline_core::document::DocumentType;
use ridgeline_core::feed::{ChangeType, DocumentChange};
use ridgeline_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `feed_document_changes` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentChangeRow {
    pub change_id: DbId,
    pub time: Timestamp,
    pub user_id: DbId,
    pub user_ids: Vec<DbId>,
    pub document_id: DbId,
    pub document_type: String,
    pub change_type: String,
    pub area_ids: Vec<DbId>,
    pub activities: Vec<String>,
    pub image1_id: Option<DbId>,
    pub image2_id: Option<DbId>,
    pub image3_id: Option<DbId>,
    pub more_images: bool,
}

impl TryFrom<DocumentChangeRow> for DocumentChange {
    type Error = sqlx::Error;

    fn try_from(row: DocumentChangeRow) -> Result<Self, Self::Error> {
        let document_type = row
            .document_type
            .parse::<DocumentType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let change_type = row
            .change_type
            .parse::<ChangeType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(DocumentChange {
            change_id: row.change_id,
            time: row.time,
            user_id: row.user_id,
            user_ids: row.user_ids,
            document_id: row.document_id,
            document_type,
            change_type,
            area_ids: row.area_ids,
            activities: row.activities,
            image1_id: row.image1_id,
            image2_id: row.image2_id,
            image3_id: row.image3_id,
            more_images: row.more_images,
        })
    }
}
