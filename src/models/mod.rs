pub mod artist;
pub mod category;
pub mod question;
pub mod show;
pub mod venue;

pub use artist::{Artist, ArtistDraft, ArtistSummary};
pub use category::Category;
pub use question::{NewQuestion, Question};
pub use show::{NewShow, ShowListing, ShowPartition};
pub use venue::{Venue, VenueArea, VenueDraft, VenueSummary};
