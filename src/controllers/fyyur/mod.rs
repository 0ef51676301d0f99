//! Server-rendered pages of the Fyyur booking site.

pub mod artists;
pub mod shows;
pub mod venues;

use axum::{response::Response, routing::get, Router};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::Flash;
use crate::templates::{page, HomeTemplate, PageError};
use crate::FyyurState;

pub fn router(state: Arc<FyyurState>) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(venues::routes())
        .merge(artists::routes())
        .merge(shows::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn index(flash: Flash) -> Result<Response, PageError> {
    page(
        &HomeTemplate {
            flashes: flash.messages().to_vec(),
        },
        &flash,
    )
}

async fn not_found() -> PageError {
    PageError(AppError::NotFound)
}

/// Reference time for splitting shows into past and upcoming. Start times
/// are stored as local wall-clock time.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
