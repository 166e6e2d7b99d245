use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        pagination::{paginate, PageQuery},
    },
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: Vec<String>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

/// Display labels of every category, in storage order.
pub(crate) async fn category_labels(pool: &SqlitePool) -> sqlx::Result<Vec<String>> {
    Ok(get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| c.kind)
        .collect())
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesList>> {
    let categories = category_labels(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesList {
        success: true,
        categories,
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    category_id: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let Path(category_id) = category_id.map_err(|_| ApiError::NotFound)?;
    let questions = get_questions_for_category(&pool, category_id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = questions.len();
    Ok(Json(CategoryQuestions {
        success: true,
        questions: paginate(questions, page),
        total_questions,
        current_category: None,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route(
            "/categories/{category_id}/questions",
            get(questions_for_category),
        )
        .with_state(state)
}
