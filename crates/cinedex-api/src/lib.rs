//! Media data source for cinedex.
//!
//! Wraps the TMDB v3 API behind the [`tmdb::MediaSource`] trait so the
//! listing layer can treat it as a black box.

/// TMDB API client.
pub mod tmdb;
