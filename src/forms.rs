//! Form bodies for the Fyyur site.
//!
//! Browsers send `application/x-www-form-urlencoded` bodies where `genres`
//! repeats once per selected option, so bodies are read as raw pairs first
//! and then mapped onto the typed forms below.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use chrono::NaiveDateTime;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::models::{Artist, ArtistDraft, NewShow, Venue, VenueDraft};
use crate::templates::PageError;

pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Swing",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Raw `name=value` pairs of a form body, in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn parse(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(body).map(FormFields)
    }

    /// First value for `key`, trimmed; empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// First value for `key` exactly as submitted; empty when absent.
    pub fn raw(&self, key: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    /// Like [`text`](Self::text) but `None` for blank input.
    pub fn optional(&self, key: &str) -> Option<String> {
        Some(self.text(key)).filter(|v| !v.is_empty())
    }

    /// Every non-blank value submitted under `key`.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    /// Checkbox semantics: checked when the key was sent at all, unless the
    /// value spells out false.
    pub fn flag(&self, key: &str) -> bool {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .is_some_and(|(_, v)| !matches!(v.trim(), "n" | "false" | "off" | "0"))
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        FormFields::parse(&body).map_err(|e| PageError(AppError::BadRequest(e.to_string())))
    }
}

fn validate_state(state: &str) -> Result<(), ValidationError> {
    if STATES.contains(&state) {
        Ok(())
    } else {
        Err(ValidationError::new("state"))
    }
}

fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    if genres.is_empty() || genres.iter().any(|g| !GENRES.contains(&g.as_str())) {
        return Err(ValidationError::new("genres"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | ' ' | '(' | ')' | '+' | '.'));
    if allowed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

fn validate_id(raw: &str) -> Result<(), ValidationError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(()),
        _ => Err(ValidationError::new("id")),
    }
}

fn validate_start_time(raw: &str) -> Result<(), ValidationError> {
    parse_start_time(raw)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("start_time"))
}

pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

/// `Errors in the following fields: a b c` for a failed validation.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|name| name.to_string())
        .collect();
    fields.sort();
    format!("Errors in the following fields: {}", fields.join(" "))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct VenueForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[validate(length(min = 1, max = 120))]
    pub address: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
    #[validate(url)]
    pub image_link: Option<String>,
    #[validate(url)]
    pub facebook_link: Option<String>,
    #[validate(url)]
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    #[validate(length(max = 500))]
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        VenueForm {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            address: fields.text("address"),
            phone: fields.optional("phone"),
            genres: fields.list("genres"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            website_link: fields.optional("website_link"),
            seeking_talent: fields.flag("seeking_talent"),
            seeking_description: fields.optional("seeking_description"),
        }
    }

    pub fn into_draft(self) -> VenueDraft {
        VenueDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            genres: self.genres,
            website: self.website_link,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        }
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        VenueForm {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            website_link: venue.website.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ArtistForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
    #[validate(custom(function = "validate_state"))]
    pub state: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
    #[validate(url)]
    pub image_link: Option<String>,
    #[validate(url)]
    pub facebook_link: Option<String>,
    #[validate(url)]
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    #[validate(length(max = 500))]
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        ArtistForm {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            phone: fields.optional("phone"),
            genres: fields.list("genres"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            website_link: fields.optional("website_link"),
            seeking_venue: fields.flag("seeking_venue"),
            seeking_description: fields.optional("seeking_description"),
        }
    }

    pub fn into_draft(self) -> ArtistDraft {
        ArtistDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            genres: self.genres,
            website: self.website_link,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        }
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        ArtistForm {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.clone(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            website_link: artist.website.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ShowForm {
    #[validate(custom(function = "validate_id"))]
    pub artist_id: String,
    #[validate(custom(function = "validate_id"))]
    pub venue_id: String,
    #[validate(custom(function = "validate_start_time"))]
    pub start_time: String,
}

impl ShowForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        ShowForm {
            artist_id: fields.text("artist_id"),
            venue_id: fields.text("venue_id"),
            start_time: fields.text("start_time"),
        }
    }

    /// Validates and converts in one go.
    pub fn to_new_show(&self) -> Result<NewShow, ValidationErrors> {
        self.validate()?;
        match (
            self.venue_id.parse(),
            self.artist_id.parse(),
            parse_start_time(&self.start_time),
        ) {
            (Ok(venue_id), Ok(artist_id), Some(start_time)) => Ok(NewShow {
                venue_id,
                artist_id,
                start_time,
            }),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("start_time", ValidationError::new("start_time"));
                Err(errors)
            }
        }
    }
}

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub selected: bool,
}

pub fn genre_choices(selected: &[String]) -> Vec<Choice> {
    GENRES
        .iter()
        .map(|&value| Choice {
            value,
            selected: selected.iter().any(|g| g == value),
        })
        .collect()
}

pub fn state_choices(selected: &str) -> Vec<Choice> {
    STATES
        .iter()
        .map(|&value| Choice {
            value,
            selected: value == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_body() -> &'static [u8] {
        b"name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+Street\
          &phone=123-123-1234&genres=Jazz&genres=Folk&facebook_link=&image_link=\
          &website_link=https%3A%2F%2Fwww.themusicalhop.com&seeking_talent=y\
          &seeking_description=Looking+for+locals"
    }

    #[test]
    fn repeated_genres_are_collected() {
        let fields = FormFields::parse(venue_body()).unwrap();
        assert_eq!(fields.list("genres"), vec!["Jazz", "Folk"]);
        assert_eq!(fields.text("name"), "The Musical Hop");
        assert_eq!(fields.optional("facebook_link"), None);
        assert!(fields.flag("seeking_talent"));
        assert!(!fields.flag("seeking_venue"));
    }

    #[test]
    fn valid_venue_form_becomes_a_draft() {
        let fields = FormFields::parse(venue_body()).unwrap();
        let form = VenueForm::from_fields(&fields);
        assert!(form.validate().is_ok());

        let draft = form.into_draft();
        assert_eq!(draft.website.as_deref(), Some("https://www.themusicalhop.com"));
        assert!(draft.seeking_talent);
        assert_eq!(draft.image_link, None);
    }

    #[test]
    fn seeking_talent_defaults_to_false() {
        let fields = FormFields::parse(b"name=Bar&city=Austin&state=TX&address=1+Main&genres=Blues").unwrap();
        let form = VenueForm::from_fields(&fields);
        assert!(form.validate().is_ok());
        assert!(!form.seeking_talent);
    }

    #[test]
    fn invalid_fields_are_listed() {
        let fields = FormFields::parse(b"name=&city=Austin&state=ZZ&genres=Polka").unwrap();
        let form = ArtistForm::from_fields(&fields);
        let errors = form.validate().unwrap_err();
        assert_eq!(
            describe_errors(&errors),
            "Errors in the following fields: genres name state"
        );
    }

    #[test]
    fn bad_links_and_phones_fail() {
        let fields = FormFields::parse(
            b"name=Band&city=Austin&state=TX&genres=Funk&phone=call+me&facebook_link=not-a-url",
        )
        .unwrap();
        let errors = ArtistForm::from_fields(&fields).validate().unwrap_err();
        let fields_with_errors = errors.field_errors();
        assert!(fields_with_errors.contains_key("phone"));
        assert!(fields_with_errors.contains_key("facebook_link"));
    }

    #[test]
    fn show_form_parses_common_time_layouts() {
        for raw in ["2035-04-01 20:00:00", "2035-04-01 20:00", "2035-04-01T20:00"] {
            let fields = FormFields::parse(
                format!("artist_id=3&venue_id=3&start_time={}", raw.replace(' ', "+")).as_bytes(),
            )
            .unwrap();
            let show = ShowForm::from_fields(&fields).to_new_show().unwrap();
            assert_eq!(show.venue_id, 3);
            assert_eq!(show.start_time.to_string(), "2035-04-01 20:00:00");
        }
    }

    #[test]
    fn show_form_rejects_bad_ids_and_times() {
        let fields = FormFields::parse(b"artist_id=abc&venue_id=0&start_time=tomorrow").unwrap();
        let errors = ShowForm::from_fields(&fields).to_new_show().unwrap_err();
        assert_eq!(
            describe_errors(&errors),
            "Errors in the following fields: artist_id start_time venue_id"
        );
    }

    #[test]
    fn prefilled_form_round_trips_a_venue() {
        let venue = Venue {
            id: 1,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            genres: vec!["Jazz".to_string()],
            website: Some("https://www.themusicalhop.com".to_string()),
            seeking_talent: true,
            seeking_description: None,
        };
        let form = VenueForm::from(&venue);
        assert_eq!(form.website_link, venue.website);
        assert_eq!(form.into_draft().into_venue(1), venue);
    }

    #[test]
    fn choices_mark_selected_values() {
        let genres = genre_choices(&["Jazz".to_string()]);
        assert_eq!(genres.iter().filter(|c| c.selected).count(), 1);
        assert!(state_choices("NY").iter().any(|c| c.value == "NY" && c.selected));
    }
}
