use askama::Template;
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::AppError;
use crate::forms::{genre_choices, state_choices, ArtistForm, Choice, ShowForm, VenueForm};
use crate::middleware::{consume_flash, Flash};
use crate::models::show::{format_start_time, DateStyle};
use crate::models::{Artist, ArtistSummary, ShowListing, ShowPartition, Venue, VenueArea};
use crate::store::StoreError;

/// Show row as displayed, with the start time already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowView {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl ShowView {
    pub fn new(show: &ShowListing, style: DateStyle) -> Self {
        ShowView {
            venue_id: show.venue_id,
            venue_name: show.venue_name.clone(),
            venue_image_link: show.venue_image_link.clone().unwrap_or_default(),
            artist_id: show.artist_id,
            artist_name: show.artist_name.clone(),
            artist_image_link: show.artist_image_link.clone().unwrap_or_default(),
            start_time: format_start_time(&show.start_time, style),
        }
    }

    pub fn list(shows: &[ShowListing], style: DateStyle) -> Vec<Self> {
        shows.iter().map(|s| ShowView::new(s, style)).collect()
    }
}

/// Past and upcoming shows of a detail page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowSplit {
    pub past_shows: Vec<ShowView>,
    pub upcoming_shows: Vec<ShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl From<&ShowPartition> for ShowSplit {
    fn from(partition: &ShowPartition) -> Self {
        ShowSplit {
            past_shows: ShowView::list(&partition.past, DateStyle::Full),
            upcoming_shows: ShowView::list(&partition.upcoming, DateStyle::Full),
            past_shows_count: partition.past_count(),
            upcoming_shows_count: partition.upcoming_count(),
        }
    }
}

/// Venue or artist fields flattened to display strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileView {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking: bool,
    pub seeking_description: String,
    pub image_link: String,
}

impl From<&Venue> for ProfileView {
    fn from(venue: &Venue) -> Self {
        ProfileView {
            id: venue.id,
            name: venue.name.clone(),
            genres: venue.genres.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            seeking: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
        }
    }
}

impl From<&Artist> for ProfileView {
    fn from(artist: &Artist) -> Self {
        ProfileView {
            id: artist.id,
            name: artist.name.clone(),
            genres: artist.genres.clone(),
            address: String::new(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            seeking: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub flashes: Vec<String>,
    pub areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub flashes: Vec<String>,
    /// `venues` or `artists`; used for links and the form action.
    pub section: &'static str,
    pub search_term: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueTemplate {
    pub flashes: Vec<String>,
    pub venue: ProfileView,
    pub shows: ShowSplit,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub flashes: Vec<String>,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistTemplate {
    pub flashes: Vec<String>,
    pub artist: ProfileView,
    pub shows: ShowSplit,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub flashes: Vec<String>,
    pub shows: Vec<ShowView>,
}

/// Text inputs of the venue and artist forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking: bool,
    pub seeking_description: String,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub flashes: Vec<String>,
    pub heading: String,
    pub action: String,
    pub fields: ProfileFields,
    pub state_options: Vec<Choice>,
    pub genre_options: Vec<Choice>,
}

impl VenueFormTemplate {
    pub fn new(flashes: Vec<String>, heading: String, action: String, form: &VenueForm) -> Self {
        VenueFormTemplate {
            flashes,
            heading,
            action,
            fields: ProfileFields {
                name: form.name.clone(),
                city: form.city.clone(),
                address: form.address.clone(),
                phone: form.phone.clone().unwrap_or_default(),
                image_link: form.image_link.clone().unwrap_or_default(),
                facebook_link: form.facebook_link.clone().unwrap_or_default(),
                website_link: form.website_link.clone().unwrap_or_default(),
                seeking: form.seeking_talent,
                seeking_description: form.seeking_description.clone().unwrap_or_default(),
            },
            state_options: state_choices(&form.state),
            genre_options: genre_choices(&form.genres),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub flashes: Vec<String>,
    pub heading: String,
    pub action: String,
    pub fields: ProfileFields,
    pub state_options: Vec<Choice>,
    pub genre_options: Vec<Choice>,
}

impl ArtistFormTemplate {
    pub fn new(flashes: Vec<String>, heading: String, action: String, form: &ArtistForm) -> Self {
        ArtistFormTemplate {
            flashes,
            heading,
            action,
            fields: ProfileFields {
                name: form.name.clone(),
                city: form.city.clone(),
                address: String::new(),
                phone: form.phone.clone().unwrap_or_default(),
                image_link: form.image_link.clone().unwrap_or_default(),
                facebook_link: form.facebook_link.clone().unwrap_or_default(),
                website_link: form.website_link.clone().unwrap_or_default(),
                seeking: form.seeking_venue,
                seeking_description: form.seeking_description.clone().unwrap_or_default(),
            },
            state_options: state_choices(&form.state),
            genre_options: genre_choices(&form.genres),
        }
    }
}

#[derive(Template)]
#[template(path = "forms/show.html")]
pub struct ShowFormTemplate {
    pub flashes: Vec<String>,
    pub form: ShowForm,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "errors/400.html")]
pub struct BadRequestTemplate {
    pub flashes: Vec<String>,
    pub status: u16,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub flashes: Vec<String>,
}

/// Renders `template` and clears any flash messages it displayed.
pub fn page<T: Template>(template: &T, flash: &Flash) -> Result<Response, PageError> {
    let html = template.render().map_err(AppError::from)?;
    Ok(consume_flash(Html(html).into_response(), flash))
}

/// [`AppError`] for the HTML site: answers with the error pages instead of
/// JSON.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError(AppError::from(err))
    }
}

impl From<PathRejection> for PageError {
    fn from(_: PathRejection) -> Self {
        PageError(AppError::NotFound)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let rendered = match &self.0 {
            AppError::NotFound => NotFoundTemplate { flashes: vec![] }.render(),
            AppError::MethodNotAllowed => {
                return (status, self.0.to_string()).into_response();
            }
            AppError::BadRequest(detail) | AppError::Unprocessable(detail) => {
                tracing::warn!(status = status.as_u16(), "page rejected: {}", detail);
                BadRequestTemplate {
                    flashes: vec![],
                    status: status.as_u16(),
                }
                .render()
            }
            AppError::Internal(detail) => {
                tracing::error!("page failed: {}", detail);
                ServerErrorTemplate { flashes: vec![] }.render()
            }
            other => {
                tracing::warn!(status = status.as_u16(), "page failed: {:?}", other);
                ServerErrorTemplate { flashes: vec![] }.render()
            }
        };

        match rendered {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("error page failed to render: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
