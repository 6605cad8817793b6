//! Browsing core for cinedex.
//!
//! The [`listing::ListingController`] drives paginated retrieval across
//! trending, search, and filtered modes. The [`session::BrowseSession`]
//! pairs it with the favorites store and maps user intents onto both.

/// Filter selector options.
pub mod catalog;
/// Paginated listing controller.
pub mod listing;
/// Intent dispatch over listing and favorites.
pub mod session;

pub use catalog::FilterField;
pub use listing::{ListingController, ListingMode, ListingState, ListingStatus};
pub use session::BrowseSession;
