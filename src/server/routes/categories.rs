use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        extract::{AppPath, AppQuery},
        pagination::Page,
    },
};

use super::categories_by_id;

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesBody>> {
    Ok(Json(CategoriesBody {
        success: true,
        categories: categories_by_id(&pool).await?,
    }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    AppQuery(page): AppQuery<Page>,
) -> ApiResponse<Json<CategoryQuestionsBody>> {
    let category = get_category(&pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("category {id}")))?;
    let offset = page
        .offset()
        .ok_or_else(|| ApiError::NotFound(format!("page {}", page.page)))?;

    let total_questions = questions::count_questions_for_category(&pool, id).await?;
    let questions =
        questions::get_questions_for_category(&pool, id, page.limit(), offset).await?;
    if questions.is_empty() && total_questions > 0 {
        return Err(ApiError::NotFound(format!(
            "page {} of category {id}",
            page.page
        )));
    }

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions,
        total_questions,
        current_category: category.kind,
    }))
}

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
}
