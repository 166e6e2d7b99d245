use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the question text. `%` and `_` in
/// `term` match literally. Case is folded here rather than in SQLite, whose
/// `lower()` leaves non-ASCII letters untouched.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let mut questions = get_all_questions(pool).await?;
    questions.retain(|q| q.question.to_lowercase().contains(&term));
    Ok(questions)
}

/// Questions a quiz may ask next: everything not in `previous`, limited to
/// `category` when one is given. `previous` may be arbitrarily long.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    previous: &[i64],
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    let mut questions = match category {
        Some(category) => get_questions_for_category(pool, category).await?,
        None => get_all_questions(pool).await?,
    };
    let previous: HashSet<i64> = previous.iter().copied().collect();
    questions.retain(|q| !previous.contains(&q.id));
    Ok(questions)
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn upsert_question(pool: &SqlitePool, question: &Question) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
        "#,
    )
    .bind(question.id)
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_questions(pool)
        .await?
        .iter()
        .map(|q| q.id)
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();
    for id in existing_ids.difference(&new_ids) {
        delete_question(pool, *id).await?;
    }
    for question in &questions {
        upsert_question(pool, question).await?;
    }
    Ok(())
}
