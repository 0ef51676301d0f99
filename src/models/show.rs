use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq)]
pub struct NewShow {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: NaiveDateTime,
}

/// A show joined with the display fields of its venue and artist.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ShowListing {
    pub id: i32,
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Shows of one venue or artist split around a reference time.
///
/// A show starting exactly at `now` counts as past.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowPartition {
    pub past: Vec<ShowListing>,
    pub upcoming: Vec<ShowListing>,
}

impl ShowPartition {
    pub fn split(shows: Vec<ShowListing>, now: NaiveDateTime) -> Self {
        let (upcoming, past) = shows.into_iter().partition(|s| s.start_time > now);
        Self { past, upcoming }
    }

    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
}

pub fn format_start_time(value: &NaiveDateTime, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Medium => "%a %m, %d, %Y %-I:%M%p",
        DateStyle::Full => "%A %B, %-d, %Y at %-I:%M%p",
    };
    value.format(pattern).to_string()
}
