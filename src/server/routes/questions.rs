use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{self, get_all_questions, get_question_by_id, search_questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{lenient_i64, present_field},
        error::ApiError,
        pagination::{paginate, PageQuery},
    },
};

use super::{categories::category_labels, ApiResponse};

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: Vec<String>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

async fn questions_page(pool: &SqlitePool, page: i64) -> ApiResponse<QuestionsPage> {
    let questions = get_all_questions(pool).await?;
    let categories = category_labels(pool).await?;
    let total_questions = questions.len();
    let current = paginate(questions, page);
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(QuestionsPage {
        success: true,
        questions: current,
        total_questions,
        categories,
        current_category: None,
    })
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    Ok(Json(questions_page(&pool, page).await?))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    question_id: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let Path(question_id) = question_id.map_err(|_| ApiError::NotFound)?;
    if get_question_by_id(&pool, question_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    questions::delete_question(&pool, question_id).await?;
    tracing::info!("Deleted question {question_id}");

    Ok(Json(questions_page(&pool, page).await?))
}

fn parse_new_question(body: &Value) -> ApiResponse<NewQuestion> {
    if !body.is_object() {
        return Err(ApiError::Unprocessable);
    }
    let (Some(question), Some(answer), Some(difficulty), Some(category)) = (
        present_field(body, "question"),
        present_field(body, "answer"),
        present_field(body, "difficulty"),
        present_field(body, "category"),
    ) else {
        return Err(ApiError::BadRequest);
    };

    let text = |value: &Value| value.as_str().map(str::to_owned);
    Ok(NewQuestion {
        question: text(question).ok_or(ApiError::Unprocessable)?,
        answer: text(answer).ok_or(ApiError::Unprocessable)?,
        difficulty: lenient_i64(difficulty).ok_or(ApiError::Unprocessable)?,
        category: lenient_i64(category).ok_or(ApiError::Unprocessable)?,
    })
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(body) = body?;
    let new_question = parse_new_question(&body)?;
    let id = questions::create_question(&pool, &new_question).await?;
    tracing::info!("Created question {id} in category {}", new_question.category);

    Ok(Json(Created { success: true }))
}

async fn search(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = body?;
    let term = body
        .get("searchTerm")
        .and_then(Value::as_str)
        .ok_or(ApiError::Unprocessable)?;

    let found = search_questions(&pool, term).await?;
    if found.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = found.len();
    Ok(Json(SearchResults {
        success: true,
        questions: paginate(found, page),
        total_questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_question_requires_every_field() {
        let complete = json!({
            "question": "How are you?",
            "answer": "fine",
            "difficulty": 1,
            "category": "2"
        });
        assert_eq!(
            parse_new_question(&complete).unwrap(),
            NewQuestion {
                question: "How are you?".to_owned(),
                answer: "fine".to_owned(),
                difficulty: 1,
                category: 2,
            }
        );

        for field in ["question", "answer", "difficulty", "category"] {
            let mut missing = complete.clone();
            missing.as_object_mut().unwrap().remove(field);
            assert!(matches!(
                parse_new_question(&missing),
                Err(ApiError::BadRequest)
            ));

            let mut empty = complete.clone();
            empty[field] = json!("");
            assert!(matches!(
                parse_new_question(&empty),
                Err(ApiError::BadRequest)
            ));
        }
    }

    #[test]
    fn zero_difficulty_is_accepted() {
        let body = json!({"question": "q", "answer": "a", "difficulty": 0, "category": 1});
        assert_eq!(parse_new_question(&body).unwrap().difficulty, 0);
    }

    #[test]
    fn mistyped_fields_are_unprocessable() {
        let body = json!({"question": "q", "answer": "a", "difficulty": "hard", "category": 1});
        assert!(matches!(
            parse_new_question(&body),
            Err(ApiError::Unprocessable)
        ));

        let body = json!({"question": ["q"], "answer": "a", "difficulty": 1, "category": 1});
        assert!(matches!(
            parse_new_question(&body),
            Err(ApiError::Unprocessable)
        ));
    }

    #[test]
    fn non_object_body_is_unprocessable() {
        assert!(matches!(
            parse_new_question(&json!([1, 2])),
            Err(ApiError::Unprocessable)
        ));
    }
}
