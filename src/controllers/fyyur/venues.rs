use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::now;
use crate::controllers::{ApiPath, PagePath};
use crate::error::AppError;
use crate::forms::{describe_errors, FormFields, VenueForm};
use crate::middleware::{redirect_with_flash, Flash};
use crate::models::venue::group_by_area;
use crate::models::ShowPartition;
use crate::store::StoreError;
use crate::templates::{
    page, PageError, ProfileView, SearchHit, SearchTemplate, ShowSplit, VenueFormTemplate,
    VenueTemplate, VenuesTemplate,
};
use crate::FyyurState;

pub fn routes() -> Router<Arc<FyyurState>> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route(
            "/venues/create",
            get(create_venue_form).post(create_venue_submission),
        )
        .route("/venues/{id}", get(show_venue).delete(delete_venue))
        .route(
            "/venues/{id}/edit",
            get(edit_venue_form).post(edit_venue_submission),
        )
}

pub async fn list_venues(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
) -> Result<Response, PageError> {
    let summaries = state.store.venue_summaries(now()).await?;
    page(
        &VenuesTemplate {
            flashes: flash.messages().to_vec(),
            areas: group_by_area(summaries),
        },
        &flash,
    )
}

pub async fn search_venues(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    fields: FormFields,
) -> Result<Response, PageError> {
    let search_term = fields.raw("search_term");
    let results: Vec<SearchHit> = state
        .store
        .search_venues(&search_term, now())
        .await?
        .into_iter()
        .map(|v| SearchHit {
            id: v.id,
            name: v.name,
            num_upcoming_shows: v.num_upcoming_shows,
        })
        .collect();

    page(
        &SearchTemplate {
            flashes: flash.messages().to_vec(),
            section: "venues",
            search_term,
            count: results.len(),
            results,
        },
        &flash,
    )
}

pub async fn show_venue(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    PagePath(id): PagePath<i32>,
) -> Result<Response, PageError> {
    let venue = state.store.venue(id).await?.ok_or(AppError::NotFound)?;
    let shows = state.store.shows_for_venue(id).await?;
    let partition = ShowPartition::split(shows, now());

    page(
        &VenueTemplate {
            flashes: flash.messages().to_vec(),
            venue: ProfileView::from(&venue),
            shows: ShowSplit::from(&partition),
        },
        &flash,
    )
}

pub async fn create_venue_form(flash: Flash) -> Result<Response, PageError> {
    page(
        &VenueFormTemplate::new(
            flash.messages().to_vec(),
            "List a new venue".to_string(),
            "/venues/create".to_string(),
            &VenueForm::default(),
        ),
        &flash,
    )
}

pub async fn create_venue_submission(
    State(state): State<Arc<FyyurState>>,
    fields: FormFields,
) -> Response {
    let form = VenueForm::from_fields(&fields);
    if let Err(errors) = form.validate() {
        return redirect_with_flash("/venues/create", describe_errors(&errors));
    }

    let name = form.name.clone();
    match state.store.insert_venue(&form.into_draft()).await {
        Ok(venue) => {
            redirect_with_flash("/", format!("Venue {} was successfully listed!", venue.name))
        }
        Err(e) => {
            tracing::error!("Failed to create venue {}: {:?}", name, e);
            redirect_with_flash(
                "/",
                format!("An error occurred. Venue {} could not be listed.", name),
            )
        }
    }
}

pub async fn delete_venue(
    State(state): State<Arc<FyyurState>>,
    ApiPath(id): ApiPath<i32>,
) -> Response {
    match state.store.delete_venue(id).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(StoreError::NotFound) => {
            (StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete venue {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false })),
            )
                .into_response()
        }
    }
}

pub async fn edit_venue_form(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    PagePath(id): PagePath<i32>,
) -> Result<Response, PageError> {
    let venue = state.store.venue(id).await?.ok_or(AppError::NotFound)?;
    page(
        &VenueFormTemplate::new(
            flash.messages().to_vec(),
            format!("Edit venue {}", venue.name),
            format!("/venues/{id}/edit"),
            &VenueForm::from(&venue),
        ),
        &flash,
    )
}

pub async fn edit_venue_submission(
    State(state): State<Arc<FyyurState>>,
    PagePath(id): PagePath<i32>,
    fields: FormFields,
) -> Result<Response, PageError> {
    let form = VenueForm::from_fields(&fields);
    if let Err(errors) = form.validate() {
        return Ok(redirect_with_flash(
            &format!("/venues/{id}/edit"),
            describe_errors(&errors),
        ));
    }

    let name = form.name.clone();
    let detail = format!("/venues/{id}");
    match state.store.update_venue(id, &form.into_draft()).await {
        Ok(venue) => Ok(redirect_with_flash(
            &detail,
            format!("Venue {} was successfully updated!", venue.name),
        )),
        Err(StoreError::NotFound) => Err(AppError::NotFound.into()),
        Err(e) => {
            tracing::error!("Failed to update venue {}: {:?}", id, e);
            Ok(redirect_with_flash(
                &detail,
                format!("An error occurred. Venue {} could not be updated.", name),
            ))
        }
    }
}
