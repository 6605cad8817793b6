//! `MediaSource` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DiscoverFilters, MediaDetail, MediaKind, MediaPage};

/// Paginated media data source.
///
/// Abstracts the remote catalogue for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
/// All operations are idempotent reads.
#[trait_variant::make(MediaSource: Send)]
pub trait LocalMediaSource {
    /// Fetches one page of this week's trending titles.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, kind: MediaKind, page: u32) -> Result<MediaPage>;

    /// Searches titles by free text. A blank query yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, kind: MediaKind, query: &str, page: u32) -> Result<MediaPage>;

    /// Lists titles matching the given selectors, most popular first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover(
        &self,
        kind: MediaKind,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<MediaPage>;

    /// Fetches a detail record with credits and videos appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetail>;
}
