//! Repository for the `feed_document_changes` table.

use ridgeline_core::feed::ports::ChangeQuery;
use ridgeline_core::feed::{ChangeFilter, DocumentChange};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::change::DocumentChangeRow;

/// Column list for `feed_document_changes` queries.
const CHANGE_COLUMNS: &str = "\
    change_id, time, user_id, user_ids, document_id, document_type, change_type, \
    area_ids, activities, image1_id, image2_id, image3_id, more_images";

/// Read access to the change log.
pub struct ChangeLogRepo;

impl ChangeLogRepo {
    /// List changes admitted by `query`, newest first with ascending
    /// `change_id` among equal times, at most `query.limit` rows.
    pub async fn list(
        pool: &PgPool,
        query: &ChangeQuery,
    ) -> Result<Vec<DocumentChange>, sqlx::Error> {
        let mut builder = build_select(query);
        let rows = builder
            .build_query_as::<DocumentChangeRow>()
            .fetch_all(pool)
            .await?;

        rows.into_iter().map(DocumentChange::try_from).collect()
    }
}

fn build_select(query: &ChangeQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {CHANGE_COLUMNS} FROM feed_document_changes WHERE TRUE"
    ));

    if let Some(cursor) = &query.cursor {
        builder
            .push(" AND (time < ")
            .push_bind(cursor.time)
            .push(" OR (time = ")
            .push_bind(cursor.time)
            .push(" AND change_id > ")
            .push_bind(cursor.change_id)
            .push("))");
    }

    if let Some(filter) = &query.filter {
        builder.push(" AND ");
        push_filter(&mut builder, filter);
    }

    builder
        .push(" ORDER BY time DESC, change_id ASC LIMIT ")
        .push_bind(query.limit);
    builder
}

/// Render a [`ChangeFilter`] as array-overlap (`&&`) conditions.
fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &ChangeFilter) {
    match filter {
        ChangeFilter::AreasAny(ids) => {
            builder.push("area_ids && ").push_bind(ids.clone());
        }
        ChangeFilter::ActivitiesAny(activities) => {
            builder.push("activities && ").push_bind(activities.clone());
        }
        ChangeFilter::UsersAny(ids) => {
            builder.push("user_ids && ").push_bind(ids.clone());
        }
        ChangeFilter::And(a, b) => {
            builder.push("(");
            push_filter(builder, a);
            builder.push(" AND ");
            push_filter(builder, b);
            builder.push(")");
        }
        ChangeFilter::Or(a, b) => {
            builder.push("(");
            push_filter(builder, a);
            builder.push(" OR ");
            push_filter(builder, b);
            builder.push(")");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ridgeline_core::feed::FeedCursor;

    use super::*;

    fn sql(query: &ChangeQuery) -> String {
        build_select(query).sql().to_string()
    }

    #[test]
    fn plain_query_only_orders_and_limits() {
        let query = ChangeQuery {
            filter: None,
            cursor: None,
            limit: 10,
        };
        assert!(sql(&query).ends_with(
            "FROM feed_document_changes WHERE TRUE ORDER BY time DESC, change_id ASC LIMIT $1"
        ));
    }

    #[test]
    fn cursor_renders_tie_break() {
        let query = ChangeQuery {
            filter: None,
            cursor: Some(FeedCursor {
                change_id: 10,
                time: chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            }),
            limit: 10,
        };
        assert!(sql(&query)
            .contains("AND (time < $1 OR (time = $2 AND change_id > $3)) ORDER BY"));
    }

    #[test]
    fn composed_filter_renders_nested_overlaps() {
        let filter = ChangeFilter::AreasAny(vec![1])
            .and(ChangeFilter::ActivitiesAny(vec!["hiking".into()]))
            .or(ChangeFilter::UsersAny(vec![2]));
        let query = ChangeQuery {
            filter: Some(filter),
            cursor: None,
            limit: 5,
        };
        assert!(sql(&query).contains(
            "WHERE TRUE AND ((area_ids && $1 AND activities && $2) OR user_ids && $3) ORDER BY"
        ));
    }
}
