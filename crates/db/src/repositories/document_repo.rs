//! Repository for the `documents` and `document_locales` tables.

use std::collections::HashMap;

use ridgeline_core::document::{DocumentLocale, DocumentType, DocumentView};
use ridgeline_core::locale::retain_best_locale;
use ridgeline_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{DocumentLocaleRow, DocumentRow};

/// Column list for `documents` queries joined with `users` as `u`.
const DOCUMENT_COLUMNS: &str = "\
    d.document_id, d.document_type, d.quality, d.attributes, \
    u.name AS user_name, u.forum_username";

/// Column list for `document_locales` queries.
const LOCALE_COLUMNS: &str = "document_id, lang, title, summary";

/// Provides batched document loading for feed hydration.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Load the views of the given ids of one document type.
    ///
    /// Missing ids, ids of another type and merged documents (those with
    /// `redirects_to` set) are skipped. With `lang` set each view keeps only
    /// its best locale.
    pub async fn list_views(
        pool: &PgPool,
        document_type: DocumentType,
        ids: &[DbId],
        lang: Option<&str>,
    ) -> Result<Vec<DocumentView>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents d \
             LEFT JOIN users u ON d.document_type = 'u' AND u.id = d.document_id \
             WHERE d.document_type = $1 \
               AND d.document_id = ANY($2) \
               AND d.redirects_to IS NULL \
             ORDER BY d.document_id"
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(document_type.tag())
            .bind(ids)
            .fetch_all(pool)
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<DbId> = rows.iter().map(|r| r.document_id).collect();
        let mut locales = Self::locales_by_document(pool, &found).await?;

        rows.into_iter()
            .map(|row| -> Result<DocumentView, sqlx::Error> {
                let mut view = DocumentView::try_from(row)?;
                view.locales = locales.remove(&view.document_id).unwrap_or_default();
                retain_best_locale(&mut view.locales, lang);
                Ok(view)
            })
            .collect()
    }

    /// All locales of the given documents, grouped by document id.
    async fn locales_by_document(
        pool: &PgPool,
        document_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<DocumentLocale>>, sqlx::Error> {
        let query = format!(
            "SELECT {LOCALE_COLUMNS} FROM document_locales \
             WHERE document_id = ANY($1) ORDER BY document_id, lang"
        );
        let rows = sqlx::query_as::<_, DocumentLocaleRow>(&query)
            .bind(document_ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<DocumentLocale>> = HashMap::new();
        for row in rows {
            grouped.entry(row.document_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}
