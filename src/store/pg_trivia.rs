use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{like_pattern, StoreError, StoreResult, TriviaStore};
use crate::models::{Category, NewQuestion, Question};

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// PostgreSQL-backed question bank
#[derive(Clone)]
pub struct PgTriviaStore {
    pool: PgPool,
}

impl PgTriviaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriviaStore for PgTriviaStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, type AS kind FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn category(&self, id: i32) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, type AS kind FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn questions(&self) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn question(&self, id: i32) -> StoreResult<Option<Question>> {
        let row = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        debug!(term, "searching questions");
        let rows = sqlx::query_as::<_, Question>(&format!(
            r"SELECT {QUESTION_COLUMNS} FROM questions
              WHERE question ILIKE $1 ESCAPE '\'
              ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_question(&self, question: &NewQuestion) -> StoreResult<Question> {
        let row = sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (question, answer, category, difficulty)
             VALUES ($1, $2, $3, $4)
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
