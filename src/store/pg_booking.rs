use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{debug, info};

use super::{like_pattern, BookingStore, StoreError, StoreResult};
use crate::models::{
    Artist, ArtistDraft, ArtistSummary, NewShow, ShowListing, Venue, VenueDraft, VenueSummary,
};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
     genres, website, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, \
     genres, website, seeking_venue, seeking_description";

const SHOW_LISTING: &str = r#"
    SELECT
        s.id,
        s.venue_id,
        v.name AS venue_name,
        v.image_link AS venue_image_link,
        s.artist_id,
        a.name AS artist_name,
        a.image_link AS artist_image_link,
        s.start_time
    FROM shows s
    JOIN venues v ON v.id = s.venue_id
    JOIN artists a ON a.id = s.artist_id
"#;

/// PostgreSQL-backed venues, artists and shows
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn venue_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>> {
        let rows = sqlx::query_as::<_, VenueSummary>(
            r#"
            SELECT
                v.id,
                v.name,
                v.city,
                v.state,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            GROUP BY v.id
            ORDER BY v.state, v.city, v.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_venues(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>> {
        debug!(term, "searching venues");
        let rows = sqlx::query_as::<_, VenueSummary>(
            r#"
            SELECT
                v.id,
                v.name,
                v.city,
                v.state,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM venues v
            LEFT JOIN shows s ON s.venue_id = v.id
            WHERE v.name ILIKE $2 ESCAPE '\'
               OR v.city ILIKE $2 ESCAPE '\'
               OR v.state ILIKE $2 ESCAPE '\'
            GROUP BY v.id
            ORDER BY v.id
            "#,
        )
        .bind(now)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        let row = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_venue(&self, draft: &VenueDraft) -> StoreResult<Venue> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "INSERT INTO venues (name, city, state, address, phone, image_link, facebook_link,
                                 genres, website, seeking_talent, seeking_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {VENUE_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.address)
        .bind(&draft.phone)
        .bind(&draft.image_link)
        .bind(&draft.facebook_link)
        .bind(&draft.genres)
        .bind(&draft.website)
        .bind(draft.seeking_talent)
        .bind(&draft.seeking_description)
        .fetch_one(&self.pool)
        .await?;

        info!(venue_id = venue.id, "venue created");
        Ok(venue)
    }

    async fn update_venue(&self, id: i32, draft: &VenueDraft) -> StoreResult<Venue> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "UPDATE venues
             SET name = $2, city = $3, state = $4, address = $5, phone = $6, image_link = $7,
                 facebook_link = $8, genres = $9, website = $10, seeking_talent = $11,
                 seeking_description = $12
             WHERE id = $1
             RETURNING {VENUE_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.address)
        .bind(&draft.phone)
        .bind(&draft.image_link)
        .bind(&draft.facebook_link)
        .bind(&draft.genres)
        .bind(&draft.website)
        .bind(draft.seeking_talent)
        .bind(&draft.seeking_description)
        .fetch_optional(&self.pool)
        .await?;

        venue.ok_or(StoreError::NotFound)
    }

    async fn delete_venue(&self, id: i32) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // 1) Shows reference the venue, so they go first
        let shows = sqlx::query("DELETE FROM shows WHERE venue_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // 2) The venue itself
        let deleted = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;
        info!(venue_id = id, shows_removed = shows, "venue deleted");
        Ok(())
    }

    async fn artist_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>> {
        let rows = sqlx::query_as::<_, ArtistSummary>(
            r#"
            SELECT
                a.id,
                a.name,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM artists a
            LEFT JOIN shows s ON s.artist_id = a.id
            GROUP BY a.id
            ORDER BY a.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search_artists(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>> {
        debug!(term, "searching artists");
        let rows = sqlx::query_as::<_, ArtistSummary>(
            r#"
            SELECT
                a.id,
                a.name,
                COUNT(s.id) FILTER (WHERE s.start_time > $1) AS num_upcoming_shows
            FROM artists a
            LEFT JOIN shows s ON s.artist_id = a.id
            WHERE a.name ILIKE $2 ESCAPE '\'
               OR a.city ILIKE $2 ESCAPE '\'
               OR a.state ILIKE $2 ESCAPE '\'
            GROUP BY a.id
            ORDER BY a.id
            "#,
        )
        .bind(now)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>> {
        let row = sqlx::query_as::<_, Artist>(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_artist(&self, draft: &ArtistDraft) -> StoreResult<Artist> {
        let artist = sqlx::query_as::<_, Artist>(&format!(
            "INSERT INTO artists (name, city, state, phone, image_link, facebook_link,
                                  genres, website, seeking_venue, seeking_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.phone)
        .bind(&draft.image_link)
        .bind(&draft.facebook_link)
        .bind(&draft.genres)
        .bind(&draft.website)
        .bind(draft.seeking_venue)
        .bind(&draft.seeking_description)
        .fetch_one(&self.pool)
        .await?;

        info!(artist_id = artist.id, "artist created");
        Ok(artist)
    }

    async fn update_artist(&self, id: i32, draft: &ArtistDraft) -> StoreResult<Artist> {
        let artist = sqlx::query_as::<_, Artist>(&format!(
            "UPDATE artists
             SET name = $2, city = $3, state = $4, phone = $5, image_link = $6,
                 facebook_link = $7, genres = $8, website = $9, seeking_venue = $10,
                 seeking_description = $11
             WHERE id = $1
             RETURNING {ARTIST_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.phone)
        .bind(&draft.image_link)
        .bind(&draft.facebook_link)
        .bind(&draft.genres)
        .bind(&draft.website)
        .bind(draft.seeking_venue)
        .bind(&draft.seeking_description)
        .fetch_optional(&self.pool)
        .await?;

        artist.ok_or(StoreError::NotFound)
    }

    async fn shows(&self) -> StoreResult<Vec<ShowListing>> {
        let rows = sqlx::query_as::<_, ShowListing>(&format!(
            "{SHOW_LISTING} ORDER BY s.start_time, s.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn shows_for_venue(&self, venue_id: i32) -> StoreResult<Vec<ShowListing>> {
        let rows = sqlx::query_as::<_, ShowListing>(&format!(
            "{SHOW_LISTING} WHERE s.venue_id = $1 ORDER BY s.start_time, s.id"
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn shows_for_artist(&self, artist_id: i32) -> StoreResult<Vec<ShowListing>> {
        let rows = sqlx::query_as::<_, ShowListing>(&format!(
            "{SHOW_LISTING} WHERE s.artist_id = $1 ORDER BY s.start_time, s.id"
        ))
        .bind(artist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_show(&self, show: &NewShow) -> StoreResult<ShowListing> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO shows (venue_id, artist_id, start_time)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(show.venue_id)
        .bind(show.artist_id)
        .bind(show.start_time)
        .fetch_one(&mut *tx)
        .await?;

        let listing = sqlx::query_as::<_, ShowListing>(&format!("{SHOW_LISTING} WHERE s.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(show_id = id, venue_id = show.venue_id, artist_id = show.artist_id, "show created");
        Ok(listing)
    }
}
