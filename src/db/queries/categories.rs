use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

async fn upsert_category(pool: &SqlitePool, category: &Category) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
ON CONFLICT (id) DO UPDATE SET type = excluded.type
        "#,
    )
    .bind(category.id)
    .bind(&category.kind)
    .execute(pool)
    .await?;
    Ok(())
}

async fn delete_category(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query(
        r#"
DELETE FROM categories WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Makes the categories table mirror `categories`: rows missing from the input
/// are removed, everything else is inserted or overwritten by id.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = get_all_categories(pool)
        .await?
        .iter()
        .map(|c| c.id)
        .collect();
    let new_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();
    for id in existing_ids.difference(&new_ids) {
        delete_category(pool, *id).await?;
    }
    for category in &categories {
        upsert_category(pool, category).await?;
    }
    Ok(())
}
