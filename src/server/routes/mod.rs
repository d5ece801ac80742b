mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::db::queries::categories::get_all_categories;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

/// Categories as the frontend consumes them: id -> type.
async fn categories_by_id(pool: &SqlitePool) -> sqlx::Result<BTreeMap<i64, String>> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect())
}
