//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! trending, search, discover, and detail data for movies and series.

mod api;
mod client;
mod pacer;
mod types;

pub use api::{LocalMediaSource, MediaSource};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{
    CastMember, Credits, DiscoverFilters, Genre, MediaDetail, MediaKind, MediaPage, MediaSummary,
    TMDB_IMAGE_BASE_URL, Video, Videos, poster_url,
};
