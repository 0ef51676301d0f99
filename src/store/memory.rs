use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::{contains_ignore_case, BookingStore, StoreError, StoreResult, TriviaStore};
use crate::models::{
    Artist, ArtistDraft, ArtistSummary, Category, NewQuestion, NewShow, Question, ShowListing,
    Venue, VenueDraft, VenueSummary,
};

#[derive(Debug, Clone, PartialEq)]
struct ShowRow {
    id: i32,
    venue_id: i32,
    artist_id: i32,
    start_time: NaiveDateTime,
}

#[derive(Default)]
struct BookingTables {
    venues: BTreeMap<i32, Venue>,
    artists: BTreeMap<i32, Artist>,
    shows: BTreeMap<i32, ShowRow>,
    next_venue_id: i32,
    next_artist_id: i32,
    next_show_id: i32,
}

impl BookingTables {
    fn upcoming_for(&self, now: NaiveDateTime, matches: impl Fn(&ShowRow) -> bool) -> i64 {
        self.shows
            .values()
            .filter(|&s| matches(s) && s.start_time > now)
            .count() as i64
    }

    fn venue_summary(&self, venue: &Venue, now: NaiveDateTime) -> VenueSummary {
        VenueSummary {
            id: venue.id,
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            num_upcoming_shows: self.upcoming_for(now, |s| s.venue_id == venue.id),
        }
    }

    fn artist_summary(&self, artist: &Artist, now: NaiveDateTime) -> ArtistSummary {
        ArtistSummary {
            id: artist.id,
            name: artist.name.clone(),
            num_upcoming_shows: self.upcoming_for(now, |s| s.artist_id == artist.id),
        }
    }

    fn listing(&self, show: &ShowRow) -> Option<ShowListing> {
        let venue = self.venues.get(&show.venue_id)?;
        let artist = self.artists.get(&show.artist_id)?;
        Some(ShowListing {
            id: show.id,
            venue_id: venue.id,
            venue_name: venue.name.clone(),
            venue_image_link: venue.image_link.clone(),
            artist_id: artist.id,
            artist_name: artist.name.clone(),
            artist_image_link: artist.image_link.clone(),
            start_time: show.start_time,
        })
    }

    fn listings(&self, keep: impl Fn(&ShowRow) -> bool) -> Vec<ShowListing> {
        let mut rows: Vec<ShowListing> = self
            .shows
            .values()
            .filter(|&s| keep(s))
            .filter_map(|s| self.listing(s))
            .collect();
        rows.sort_by_key(|s| (s.start_time, s.id));
        rows
    }

    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.artists
            .values()
            .any(|a| a.name == name && Some(a.id) != except)
    }

    fn add_venue(&mut self, draft: VenueDraft) -> Venue {
        self.next_venue_id += 1;
        let venue = draft.into_venue(self.next_venue_id);
        self.venues.insert(venue.id, venue.clone());
        venue
    }

    fn add_artist(&mut self, draft: ArtistDraft) -> StoreResult<Artist> {
        if self.name_taken(&draft.name, None) {
            return Err(StoreError::Conflict(format!(
                "artist name {:?} already exists",
                draft.name
            )));
        }
        self.next_artist_id += 1;
        let artist = draft.into_artist(self.next_artist_id);
        self.artists.insert(artist.id, artist.clone());
        Ok(artist)
    }

    fn add_show(&mut self, show: &NewShow) -> StoreResult<ShowListing> {
        if !self.venues.contains_key(&show.venue_id) {
            return Err(StoreError::Conflict(format!("venue {} does not exist", show.venue_id)));
        }
        if !self.artists.contains_key(&show.artist_id) {
            return Err(StoreError::Conflict(format!("artist {} does not exist", show.artist_id)));
        }
        self.next_show_id += 1;
        let row = ShowRow {
            id: self.next_show_id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: show.start_time,
        };
        self.shows.insert(row.id, row.clone());
        self.listing(&row).ok_or(StoreError::NotFound)
    }
}

/// In-memory venues, artists and shows for development/testing
#[derive(Default)]
pub struct MemoryBookingStore {
    tables: Mutex<BookingTables>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the demo venues, artists and shows.
    pub fn seeded() -> Self {
        let mut tables = BookingTables::default();
        for venue in demo_venues() {
            tables.add_venue(venue);
        }
        for artist in demo_artists() {
            // demo names are distinct
            let _ = tables.add_artist(artist);
        }
        for show in demo_shows() {
            let _ = tables.add_show(&show);
        }
        Self {
            tables: Mutex::new(tables),
        }
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn venue_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>> {
        let tables = self.tables.lock().await;
        let mut venues: Vec<&Venue> = tables.venues.values().collect();
        venues.sort_by(|a, b| (&a.state, &a.city, a.id).cmp(&(&b.state, &b.city, b.id)));
        Ok(venues
            .into_iter()
            .map(|v| tables.venue_summary(v, now))
            .collect())
    }

    async fn search_venues(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<VenueSummary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .venues
            .values()
            .filter(|v| {
                contains_ignore_case(&v.name, term)
                    || contains_ignore_case(&v.city, term)
                    || contains_ignore_case(&v.state, term)
            })
            .map(|v| tables.venue_summary(v, now))
            .collect())
    }

    async fn venue(&self, id: i32) -> StoreResult<Option<Venue>> {
        Ok(self.tables.lock().await.venues.get(&id).cloned())
    }

    async fn insert_venue(&self, draft: &VenueDraft) -> StoreResult<Venue> {
        let venue = self.tables.lock().await.add_venue(draft.clone());
        debug!("Created venue: {} with id {}", venue.name, venue.id);
        Ok(venue)
    }

    async fn update_venue(&self, id: i32, draft: &VenueDraft) -> StoreResult<Venue> {
        let mut tables = self.tables.lock().await;
        let slot = tables.venues.get_mut(&id).ok_or(StoreError::NotFound)?;
        *slot = draft.clone().into_venue(id);
        Ok(slot.clone())
    }

    async fn delete_venue(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.venues.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        tables.shows.retain(|_, s| s.venue_id != id);
        Ok(())
    }

    async fn artist_summaries(&self, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .artists
            .values()
            .map(|a| tables.artist_summary(a, now))
            .collect())
    }

    async fn search_artists(&self, term: &str, now: NaiveDateTime) -> StoreResult<Vec<ArtistSummary>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .artists
            .values()
            .filter(|a| {
                contains_ignore_case(&a.name, term)
                    || contains_ignore_case(&a.city, term)
                    || contains_ignore_case(&a.state, term)
            })
            .map(|a| tables.artist_summary(a, now))
            .collect())
    }

    async fn artist(&self, id: i32) -> StoreResult<Option<Artist>> {
        Ok(self.tables.lock().await.artists.get(&id).cloned())
    }

    async fn insert_artist(&self, draft: &ArtistDraft) -> StoreResult<Artist> {
        let artist = self.tables.lock().await.add_artist(draft.clone())?;
        debug!("Created artist: {} with id {}", artist.name, artist.id);
        Ok(artist)
    }

    async fn update_artist(&self, id: i32, draft: &ArtistDraft) -> StoreResult<Artist> {
        let mut tables = self.tables.lock().await;
        if !tables.artists.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.name_taken(&draft.name, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "artist name {:?} already exists",
                draft.name
            )));
        }
        let artist = draft.clone().into_artist(id);
        tables.artists.insert(id, artist.clone());
        Ok(artist)
    }

    async fn shows(&self) -> StoreResult<Vec<ShowListing>> {
        Ok(self.tables.lock().await.listings(|_| true))
    }

    async fn shows_for_venue(&self, venue_id: i32) -> StoreResult<Vec<ShowListing>> {
        Ok(self.tables.lock().await.listings(|s| s.venue_id == venue_id))
    }

    async fn shows_for_artist(&self, artist_id: i32) -> StoreResult<Vec<ShowListing>> {
        Ok(self.tables.lock().await.listings(|s| s.artist_id == artist_id))
    }

    async fn insert_show(&self, show: &NewShow) -> StoreResult<ShowListing> {
        self.tables.lock().await.add_show(show)
    }
}

#[derive(Default)]
struct TriviaTables {
    categories: BTreeMap<i32, Category>,
    questions: BTreeMap<i32, Question>,
    next_question_id: i32,
}

impl TriviaTables {
    fn with_categories<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tables = Self::default();
        for (index, label) in labels.into_iter().enumerate() {
            let id = index as i32 + 1;
            tables.categories.insert(
                id,
                Category {
                    id,
                    kind: label.to_string(),
                },
            );
        }
        tables
    }

    fn add_question(&mut self, question: &NewQuestion) -> StoreResult<Question> {
        if !self.categories.contains_key(&question.category) {
            return Err(StoreError::Conflict(format!(
                "category {} does not exist",
                question.category
            )));
        }
        self.next_question_id += 1;
        let row = Question {
            id: self.next_question_id,
            question: question.question.clone(),
            answer: question.answer.clone(),
            category: question.category,
            difficulty: question.difficulty,
        };
        self.questions.insert(row.id, row.clone());
        Ok(row)
    }
}

/// In-memory question bank for development/testing
#[derive(Default)]
pub struct MemoryTriviaStore {
    tables: Mutex<TriviaTables>,
}

impl MemoryTriviaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with only the given categories and no questions.
    pub fn with_categories<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            tables: Mutex::new(TriviaTables::with_categories(labels)),
        }
    }

    /// Store preloaded with the six standard categories and the demo
    /// questions.
    pub fn seeded() -> Self {
        let mut tables = TriviaTables::with_categories(CATEGORIES);
        for (question, answer, category, difficulty) in DEMO_QUESTIONS {
            // every demo category exists
            let _ = tables.add_question(&NewQuestion {
                question: question.to_string(),
                answer: answer.to_string(),
                category: *category,
                difficulty: *difficulty,
            });
        }
        Self {
            tables: Mutex::new(tables),
        }
    }
}

#[async_trait]
impl TriviaStore for MemoryTriviaStore {
    async fn categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.lock().await.categories.values().cloned().collect())
    }

    async fn category(&self, id: i32) -> StoreResult<Option<Category>> {
        Ok(self.tables.lock().await.categories.get(&id).cloned())
    }

    async fn questions(&self) -> StoreResult<Vec<Question>> {
        Ok(self.tables.lock().await.questions.values().cloned().collect())
    }

    async fn questions_in_category(&self, category: i32) -> StoreResult<Vec<Question>> {
        Ok(self
            .tables
            .lock()
            .await
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn question(&self, id: i32) -> StoreResult<Option<Question>> {
        Ok(self.tables.lock().await.questions.get(&id).cloned())
    }

    async fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        Ok(self
            .tables
            .lock()
            .await
            .questions
            .values()
            .filter(|q| contains_ignore_case(&q.question, term))
            .cloned()
            .collect())
    }

    async fn insert_question(&self, question: &NewQuestion) -> StoreResult<Question> {
        self.tables.lock().await.add_question(question)
    }

    async fn delete_question(&self, id: i32) -> StoreResult<()> {
        match self.tables.lock().await.questions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

pub const CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

const DEMO_QUESTIONS: &[(&str, &str, i32, i32)] = &[
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    ("What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 5, 4),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
    ("Which country won the first ever soccer World Cup in 1930?", "Uruguay", 6, 4),
    ("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    ("The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
    ("Which Dutch graphic artist initials M C was a creator of optical illusions?", "Escher", 2, 1),
    ("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
    ("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    ("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
];

fn demo_venues() -> Vec<VenueDraft> {
    vec![
        VenueDraft {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            genres: ["Jazz", "Reggae", "Swing", "Classical", "Folk"]
                .map(String::from)
                .to_vec(),
            website: Some("https://www.themusicalhop.com".to_string()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            seeking_talent: true,
            seeking_description: Some(
                "We are on the lookout for a local artist to play every two weeks. Please call us."
                    .to_string(),
            ),
            image_link: None,
        },
        VenueDraft {
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: Some("914-003-1132".to_string()),
            genres: ["Classical", "R&B", "Hip-Hop"].map(String::from).to_vec(),
            website: Some("https://www.theduelingpianos.com".to_string()),
            facebook_link: Some("https://www.facebook.com/theduelingpianos".to_string()),
            ..VenueDraft::default()
        },
        VenueDraft {
            name: "Park Square Live Music & Coffee".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "34 Whiskey Moore Ave".to_string(),
            phone: Some("415-000-1234".to_string()),
            genres: ["Rock n Roll", "Jazz", "Classical", "Folk"]
                .map(String::from)
                .to_vec(),
            website: Some("https://www.parksquarelivemusicandcoffee.com".to_string()),
            facebook_link: Some(
                "https://www.facebook.com/ParkSquareLiveMusicAndCoffee".to_string(),
            ),
            ..VenueDraft::default()
        },
    ]
}

fn demo_artists() -> Vec<ArtistDraft> {
    vec![
        ArtistDraft {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("326-123-5000".to_string()),
            genres: vec!["Rock n Roll".to_string()],
            website: Some("https://www.gunsnpetalsband.com".to_string()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".to_string()),
            seeking_venue: true,
            seeking_description: Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".to_string(),
            ),
            image_link: None,
        },
        ArtistDraft {
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: Some("300-400-5000".to_string()),
            genres: vec!["Jazz".to_string()],
            facebook_link: Some("https://www.facebook.com/mattquevedo923251523".to_string()),
            ..ArtistDraft::default()
        },
        ArtistDraft {
            name: "The Wild Sax Band".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("432-325-5432".to_string()),
            genres: vec!["Jazz".to_string(), "Classical".to_string()],
            ..ArtistDraft::default()
        },
    ]
}

fn demo_shows() -> Vec<NewShow> {
    let at = |y, m, d, h, min| {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap_or(NaiveDateTime::MIN)
    };
    vec![
        NewShow { venue_id: 1, artist_id: 1, start_time: at(2019, 5, 21, 21, 30) },
        NewShow { venue_id: 3, artist_id: 2, start_time: at(2019, 6, 15, 23, 0) },
        NewShow { venue_id: 3, artist_id: 3, start_time: at(2035, 4, 1, 20, 0) },
        NewShow { venue_id: 3, artist_id: 3, start_time: at(2035, 4, 8, 20, 0) },
        NewShow { venue_id: 3, artist_id: 3, start_time: at(2035, 4, 15, 20, 0) },
    ]
}
