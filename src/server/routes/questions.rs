use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        extract::{AppJson, AppPath, AppQuery},
        pagination::Page,
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::categories_by_id;

const DIFFICULTIES: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Deserialize)]
struct CreateQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(page): AppQuery<Page>,
) -> ApiResponse<Json<QuestionsPage>> {
    let offset = page
        .offset()
        .ok_or_else(|| ApiError::NotFound(format!("page {}", page.page)))?;
    let total_questions = questions::count_questions(&pool).await?;
    let questions = questions::get_questions(&pool, page.limit(), offset).await?;
    if questions.is_empty() && total_questions > 0 {
        return Err(ApiError::NotFound(format!("page {}", page.page)));
    }

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: categories_by_id(&pool).await?,
        current_category: None,
    }))
}

impl CreateQuestion {
    /// Checks what the schema alone cannot express; category existence is checked against the store.
    fn validate(self) -> Result<NewQuestion, ApiError> {
        let question = self.question.trim();
        let answer = self.answer.trim();
        if question.is_empty() || answer.is_empty() {
            return Err(ApiError::Unprocessable(
                "question and answer must not be blank".to_owned(),
            ));
        }
        if !DIFFICULTIES.contains(&self.difficulty) {
            return Err(ApiError::Unprocessable(format!(
                "difficulty {} outside {DIFFICULTIES:?}",
                self.difficulty
            )));
        }
        Ok(NewQuestion {
            question: question.to_owned(),
            answer: answer.to_owned(),
            category: self.category,
            difficulty: self.difficulty,
        })
    }
}

async fn create_question(
    State(pool): State<SqlitePool>,
    AppJson(body): AppJson<CreateQuestion>,
) -> ApiResponse<Json<Created>> {
    let new_question = body.validate()?;
    if get_category(&pool, new_question.category).await?.is_none() {
        return Err(ApiError::Unprocessable(format!(
            "category {} does not exist",
            new_question.category
        )));
    }

    let id = questions::create_question(&pool, &new_question).await?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = new_question.category, "Question created");

    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

// a missing id is reported as 422, not 404, which the frontend relies on
async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<Json<Deleted>> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::Unprocessable(format!("question {id} does not exist")));
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    AppQuery(page): AppQuery<Page>,
    AppJson(body): AppJson<SearchRequest>,
) -> ApiResponse<Json<SearchResults>> {
    let term = body.search_term.as_str();
    let matches = questions::search_questions(&pool, term).await?;
    let total_questions = matches.len() as i64;
    let questions = match page.offset().and_then(|offset| usize::try_from(offset).ok()) {
        Some(offset) => matches
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .collect(),
        None => vec![],
    };
    tracing::debug!(term, total_questions, "Search");

    Ok(Json(SearchResults {
        success: true,
        questions,
        total_questions,
        current_category: None,
    }))
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search_questions))
}
