use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{app::AppState, deserializers::lenient_i64, error::ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

/// Category id the frontend sends for "all categories".
const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, PartialEq, Eq)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    category: Option<i64>,
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    question: Question,
}

// an absent quiz_category is a 422, one lacking `type` or `id` is a 400
fn parse_quiz_request(body: &Value) -> ApiResponse<QuizRequest> {
    let quiz_category = body
        .get("quiz_category")
        .and_then(Value::as_object)
        .ok_or(ApiError::Unprocessable)?;
    let (Some(_), Some(id)) = (quiz_category.get("type"), quiz_category.get("id")) else {
        return Err(ApiError::BadRequest);
    };
    let previous = match body.get("previous_questions") {
        None | Some(Value::Null) => return Err(ApiError::BadRequest),
        Some(previous) => previous.as_array().ok_or(ApiError::Unprocessable)?,
    };

    let previous_questions = previous
        .iter()
        .map(|id| lenient_i64(id).ok_or(ApiError::Unprocessable))
        .collect::<Result<Vec<_>, _>>()?;
    let category = match lenient_i64(id).ok_or(ApiError::Unprocessable)? {
        ALL_CATEGORIES => None,
        id => Some(id),
    };

    Ok(QuizRequest {
        previous_questions,
        category,
    })
}

fn pick_random(candidates: &[Question]) -> Option<&Question> {
    candidates.choose(&mut rand::thread_rng())
}

async fn next_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse<Json<NextQuestion>> {
    let Json(body) = body?;
    let request = parse_quiz_request(&body)?;

    let candidates =
        get_quiz_candidates(&pool, &request.previous_questions, request.category).await?;
    let question = pick_random(&candidates)
        .cloned()
        .ok_or(ApiError::NotFound)?;

    let label = request
        .category
        .map_or_else(|| "all".to_owned(), |id| id.to_string());
    QUIZ_QUESTIONS_SERVED.with_label_values(&[label.as_str()]).inc();

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_category_means_all() {
        let body = json!({"previous_questions": [1, "2"], "quiz_category": {"type": "click", "id": 0}});
        assert_eq!(
            parse_quiz_request(&body).unwrap(),
            QuizRequest {
                previous_questions: vec![1, 2],
                category: None,
            }
        );

        let body = json!({"previous_questions": [], "quiz_category": {"type": "Art", "id": "2"}});
        assert_eq!(parse_quiz_request(&body).unwrap().category, Some(2));
    }

    #[test]
    fn malformed_category_is_a_bad_request() {
        for quiz_category in [json!({}), json!({"type": "Art"}), json!({"id": 2})] {
            let body = json!({"previous_questions": [], "quiz_category": quiz_category});
            assert!(matches!(
                parse_quiz_request(&body),
                Err(ApiError::BadRequest)
            ));
        }
    }

    #[test]
    fn absent_category_is_unprocessable() {
        for body in [
            json!({"previous_questions": []}),
            json!({"previous_questions": [], "quiz_category": null}),
            json!({"previous_questions": [], "quiz_category": "Art"}),
        ] {
            assert!(matches!(
                parse_quiz_request(&body),
                Err(ApiError::Unprocessable)
            ));
        }
    }

    #[test]
    fn null_category_id_is_unprocessable() {
        let body = json!({"previous_questions": [], "quiz_category": {"type": "Art", "id": null}});
        assert!(matches!(
            parse_quiz_request(&body),
            Err(ApiError::Unprocessable)
        ));
    }

    #[test]
    fn previous_questions_are_required() {
        let body = json!({"quiz_category": {"type": "Art", "id": 2}});
        assert!(matches!(
            parse_quiz_request(&body),
            Err(ApiError::BadRequest)
        ));

        let body = json!({"previous_questions": ["x"], "quiz_category": {"type": "Art", "id": 2}});
        assert!(matches!(
            parse_quiz_request(&body),
            Err(ApiError::Unprocessable)
        ));
    }

    #[test]
    fn random_pick_comes_from_candidates() {
        let candidates: Vec<Question> = (1..=5)
            .map(|id| Question {
                id,
                question: format!("Question {id}"),
                answer: "answer".to_owned(),
                category: 1,
                difficulty: 1,
            })
            .collect();
        for _ in 0..20 {
            let picked = pick_random(&candidates).unwrap();
            assert!(candidates.contains(picked));
        }
        assert!(pick_random(&[]).is_none());
    }
}
