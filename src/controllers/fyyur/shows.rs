use axum::{extract::State, response::Response, routing::get, Router};
use std::sync::Arc;

use crate::forms::{describe_errors, FormFields, ShowForm};
use crate::middleware::{redirect_with_flash, Flash};
use crate::models::show::DateStyle;
use crate::store::StoreError;
use crate::templates::{page, PageError, ShowFormTemplate, ShowView, ShowsTemplate};
use crate::FyyurState;

pub fn routes() -> Router<Arc<FyyurState>> {
    Router::new()
        .route("/shows", get(list_shows))
        .route(
            "/shows/create",
            get(create_show_form).post(create_show_submission),
        )
}

pub async fn list_shows(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
) -> Result<Response, PageError> {
    let shows = state.store.shows().await?;
    page(
        &ShowsTemplate {
            flashes: flash.messages().to_vec(),
            shows: ShowView::list(&shows, DateStyle::Medium),
        },
        &flash,
    )
}

pub async fn create_show_form(flash: Flash) -> Result<Response, PageError> {
    page(
        &ShowFormTemplate {
            flashes: flash.messages().to_vec(),
            form: ShowForm::default(),
        },
        &flash,
    )
}

pub async fn create_show_submission(
    State(state): State<Arc<FyyurState>>,
    fields: FormFields,
) -> Response {
    let new_show = match ShowForm::from_fields(&fields).to_new_show() {
        Ok(show) => show,
        Err(errors) => return redirect_with_flash("/shows/create", describe_errors(&errors)),
    };

    match state.store.insert_show(&new_show).await {
        Ok(_) => redirect_with_flash("/", "Show was successfully listed!"),
        Err(StoreError::Conflict(reason)) => {
            tracing::warn!("Show rejected: {}", reason);
            redirect_with_flash(
                "/shows/create",
                "An error occurred. Show could not be listed: unknown venue or artist.",
            )
        }
        Err(e) => {
            tracing::error!("Failed to create show: {:?}", e);
            redirect_with_flash("/", "An error occurred. Show could not be listed.")
        }
    }
}
