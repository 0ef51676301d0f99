use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use validator::Validate;

use super::now;
use crate::controllers::PagePath;
use crate::error::AppError;
use crate::forms::{describe_errors, ArtistForm, FormFields};
use crate::middleware::{redirect_with_flash, Flash};
use crate::models::ShowPartition;
use crate::store::StoreError;
use crate::templates::{
    page, ArtistFormTemplate, ArtistTemplate, ArtistsTemplate, PageError, ProfileView, SearchHit,
    SearchTemplate, ShowSplit,
};
use crate::FyyurState;

pub fn routes() -> Router<Arc<FyyurState>> {
    Router::new()
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route(
            "/artists/create",
            get(create_artist_form).post(create_artist_submission),
        )
        .route("/artists/{id}", get(show_artist))
        .route(
            "/artists/{id}/edit",
            get(edit_artist_form).post(edit_artist_submission),
        )
}

fn duplicate_name(name: &str) -> String {
    format!("An error occurred. An artist named {} is already listed.", name)
}

pub async fn list_artists(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
) -> Result<Response, PageError> {
    let artists = state.store.artist_summaries(now()).await?;
    page(
        &ArtistsTemplate {
            flashes: flash.messages().to_vec(),
            artists,
        },
        &flash,
    )
}

pub async fn search_artists(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    fields: FormFields,
) -> Result<Response, PageError> {
    let search_term = fields.raw("search_term");
    let results: Vec<SearchHit> = state
        .store
        .search_artists(&search_term, now())
        .await?
        .into_iter()
        .map(|a| SearchHit {
            id: a.id,
            name: a.name,
            num_upcoming_shows: a.num_upcoming_shows,
        })
        .collect();

    page(
        &SearchTemplate {
            flashes: flash.messages().to_vec(),
            section: "artists",
            search_term,
            count: results.len(),
            results,
        },
        &flash,
    )
}

pub async fn show_artist(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    PagePath(id): PagePath<i32>,
) -> Result<Response, PageError> {
    let artist = state.store.artist(id).await?.ok_or(AppError::NotFound)?;
    let shows = state.store.shows_for_artist(id).await?;
    let partition = ShowPartition::split(shows, now());

    page(
        &ArtistTemplate {
            flashes: flash.messages().to_vec(),
            artist: ProfileView::from(&artist),
            shows: ShowSplit::from(&partition),
        },
        &flash,
    )
}

pub async fn create_artist_form(flash: Flash) -> Result<Response, PageError> {
    page(
        &ArtistFormTemplate::new(
            flash.messages().to_vec(),
            "List a new artist".to_string(),
            "/artists/create".to_string(),
            &ArtistForm::default(),
        ),
        &flash,
    )
}

pub async fn create_artist_submission(
    State(state): State<Arc<FyyurState>>,
    fields: FormFields,
) -> Response {
    let form = ArtistForm::from_fields(&fields);
    if let Err(errors) = form.validate() {
        return redirect_with_flash("/artists/create", describe_errors(&errors));
    }

    let name = form.name.clone();
    match state.store.insert_artist(&form.into_draft()).await {
        Ok(artist) => {
            redirect_with_flash("/", format!("Artist {} was successfully listed!", artist.name))
        }
        Err(StoreError::Conflict(_)) => redirect_with_flash("/artists/create", duplicate_name(&name)),
        Err(e) => {
            tracing::error!("Failed to create artist {}: {:?}", name, e);
            redirect_with_flash(
                "/",
                format!("An error occurred. Artist {} could not be listed.", name),
            )
        }
    }
}

pub async fn edit_artist_form(
    State(state): State<Arc<FyyurState>>,
    flash: Flash,
    PagePath(id): PagePath<i32>,
) -> Result<Response, PageError> {
    let artist = state.store.artist(id).await?.ok_or(AppError::NotFound)?;
    page(
        &ArtistFormTemplate::new(
            flash.messages().to_vec(),
            format!("Edit artist {}", artist.name),
            format!("/artists/{id}/edit"),
            &ArtistForm::from(&artist),
        ),
        &flash,
    )
}

pub async fn edit_artist_submission(
    State(state): State<Arc<FyyurState>>,
    PagePath(id): PagePath<i32>,
    fields: FormFields,
) -> Result<Response, PageError> {
    let form = ArtistForm::from_fields(&fields);
    let edit_page = format!("/artists/{id}/edit");
    if let Err(errors) = form.validate() {
        return Ok(redirect_with_flash(&edit_page, describe_errors(&errors)));
    }

    let name = form.name.clone();
    let detail = format!("/artists/{id}");
    match state.store.update_artist(id, &form.into_draft()).await {
        Ok(artist) => Ok(redirect_with_flash(
            &detail,
            format!("Artist {} was successfully updated!", artist.name),
        )),
        Err(StoreError::NotFound) => Err(AppError::NotFound.into()),
        Err(StoreError::Conflict(_)) => Ok(redirect_with_flash(&edit_page, duplicate_name(&name))),
        Err(e) => {
            tracing::error!("Failed to update artist {}: {:?}", id, e);
            Ok(redirect_with_flash(
                &detail,
                format!("An error occurred. Artist {} could not be updated.", name),
            ))
        }
    }
}
