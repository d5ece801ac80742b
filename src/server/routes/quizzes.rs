use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category, questions::get_quiz_candidates},
        Question,
    },
    server::{
        app::AppState,
        deserializers::LooseId,
        error::{ApiError, ApiResponse},
        extract::AppJson,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

/// Category id the frontend sends for "every category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    id: LooseId,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<LooseId>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    // null once every question of the category was asked
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<Json<QuizQuestion>> {
    let LooseId(category_id) = request.quiz_category.id;
    let category = if category_id == ALL_CATEGORIES {
        None
    } else {
        get_category(&pool, category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("category {category_id}")))?;
        Some(category_id)
    };
    let asked: Vec<i64> = request.previous_questions.iter().map(|id| id.0).collect();

    let candidates = get_quiz_candidates(&pool, category, &asked).await?;
    let question = candidates.choose(&mut rand::thread_rng()).cloned();
    tracing::debug!(
        category = ?request.quiz_category.kind,
        asked = asked.len(),
        remaining = candidates.len(),
        "Quiz question picked"
    );

    if question.is_some() {
        let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
        QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_question))
}
