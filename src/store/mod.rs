//! Persistence for both applications.
//!
//! Handlers only see the [`BookingStore`] and [`TriviaStore`] traits. The
//! PostgreSQL implementations back the running services, the in-memory ones
//! back local demos and the router tests.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{
    Artist, ArtistDraft, ArtistSummary, Category, NewQuestion, NewShow, Question, ShowListing,
    Venue, VenueDraft, VenueSummary,
};

pub mod memory;
pub mod pg_booking;
pub mod pg_trivia;

pub use memory::{MemoryBookingStore, MemoryTriviaStore};
pub use pg_booking::PgBookingStore;
pub use pg_trivia::PgTriviaStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    /// A unique or foreign key constraint rejected the write.
    #[error("constraint violation: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                StoreError::Conflict(db.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Venues, artists and the shows joining them.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// All venues ordered by state, city and id, with upcoming show counts.
    async fn venue_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>>;
    /// Case-insensitive substring match on name, city or state.
    async fn search_venues(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>>;
    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>>;
    async fn insert_venue(&self, draft: &VenueDraft) -> StoreResult<Venue>;
    async fn update_venue(&self, id: i32, draft: &VenueDraft) -> StoreResult<Venue>;
    /// Removes the venue together with its shows.
    async fn delete_venue(&self, id: i32) -> StoreResult<()>;

    async fn artist_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>>;
    async fn search_artists(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>>;
    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>>;
    async fn insert_artist(&self, draft: &ArtistDraft) -> StoreResult<Artist>;
    async fn update_artist(&self, id: i32, draft: &ArtistDraft) -> StoreResult<Artist>;

    /// Every show, ordered by start time.
    async fn shows(&self) -> StoreResult<Vec<ShowListing>>;
    async fn shows_for_venue(&self, venue_id: i32) -> StoreResult<Vec<ShowListing>>;
    async fn shows_for_artist(&self, artist_id: i32) -> StoreResult<Vec<ShowListing>>;
    async fn insert_show(&self, show: &NewShow) -> StoreResult<ShowListing>;
}

/// Questions and their categories.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    async fn categories(&self) -> StoreResult<Vec<Category>>;
    async fn category(&self, id: i32) -> StoreResult<Option<Category>>;
    /// All questions ordered by id.
    async fn questions(&self) -> StoreResult<Vec<Question>>;
    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>>;
    async fn question(&self, id: i32) -> StoreResult<Option<Question>>;
    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>>;
    async fn insert_question(&self, question: &NewQuestion) -> StoreResult<Question>;
    async fn delete_question(&self, id: i32) -> StoreResult<()>;
}

/// Builds an `ILIKE` pattern that matches `term` literally anywhere in the
/// column.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// In-memory counterpart of `ILIKE '%term%'`.
pub(crate) fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("title"), "%title%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn containment_ignores_case() {
        assert!(contains_ignore_case("The Musical Hop", "hop"));
        assert!(contains_ignore_case("The Musical Hop", "MUSIC"));
        assert!(!contains_ignore_case("The Musical Hop", "jazz"));
        assert!(contains_ignore_case("anything", ""));
    }
}
