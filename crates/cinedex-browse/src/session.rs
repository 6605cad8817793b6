//! Maps presentation intents onto the listing and favorites.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use cinedex_api::tmdb::{LocalMediaSource, MediaDetail, MediaKind, MediaSummary};
use cinedex_db::{FavoriteItem, FavoritesStore, RecordStore};
use tracing::{debug, instrument, warn};

use crate::catalog::FilterField;
use crate::listing::ListingController;

/// One browse screen: a listing for a single media kind plus the
/// favorites shared across screens.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BrowseSession<S, R: RecordStore> {
    listing: ListingController<S>,
    favorites: FavoritesStore<R>,
}

impl<S: LocalMediaSource, R: RecordStore> BrowseSession<S, R> {
    /// Creates a session over an injected listing and favorites store.
    #[must_use]
    pub const fn new(listing: ListingController<S>, favorites: FavoritesStore<R>) -> Self {
        Self { listing, favorites }
    }

    /// The listing controller.
    #[must_use]
    pub const fn listing(&self) -> &ListingController<S> {
        &self.listing
    }

    /// The favorites store.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore<R> {
        &self.favorites
    }

    /// Media kind browsed by this session.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.listing.kind()
    }

    /// Loads page 1 of the current mode.
    pub async fn start(&self) {
        self.listing.refresh().await;
    }

    /// Submits a search. Blank input is ignored.
    #[instrument(skip_all)]
    pub async fn on_search_submit(&self, query: &str) {
        if query.trim().is_empty() {
            debug!("blank search ignored");
            return;
        }
        if self.listing.set_query(query) {
            self.listing.refresh().await;
        }
    }

    /// Clears the search text.
    pub async fn on_clear_search(&self) {
        if self.listing.set_query("") {
            self.listing.refresh().await;
        }
    }

    /// Changes one filter; an empty value clears it.
    ///
    /// Invalid values are logged and leave the listing untouched.
    #[instrument(skip_all, fields(field = %field))]
    pub async fn on_filter_change(&self, field: FilterField, value: &str) {
        match self.listing.set_filter(field, value) {
            Ok(true) => self.listing.refresh().await,
            Ok(false) => debug!("filter unchanged"),
            Err(e) => warn!(error = %format!("{e:#}"), "filter rejected"),
        }
    }

    /// Clears every filter.
    pub async fn on_clear_filters(&self) {
        if self.listing.clear_filters() {
            self.listing.refresh().await;
        }
    }

    /// Requests the next page.
    pub async fn on_load_more(&self) {
        self.listing.load_more().await;
    }

    /// Toggles a favorite. Returns whether it is a favorite afterwards.
    pub fn on_toggle_favorite(&mut self, item: FavoriteItem) -> bool {
        self.favorites.toggle(item)
    }

    /// Toggles a listed entry, using this session's media kind.
    pub fn on_toggle_summary_favorite(&mut self, summary: &MediaSummary) -> bool {
        let item = FavoriteItem::from_summary(summary, self.listing.kind());
        self.favorites.toggle(item)
    }

    /// Toggles the listed entry at `index`. Returns `None` if there is no
    /// such entry.
    pub fn on_toggle_listed_favorite(&mut self, index: usize) -> Option<bool> {
        let summary = self
            .listing
            .with_state(|state| state.items.get(index).cloned())?;
        Some(self.on_toggle_summary_favorite(&summary))
    }

    /// Returns `true` if a listed entry is a favorite under this session's kind.
    #[must_use]
    pub fn is_favorite(&self, summary: &MediaSummary) -> bool {
        self.favorites.is_favorite(summary.id, self.listing.kind())
    }

    /// Fetches the detail record for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail fetch fails.
    pub async fn details(&self, id: u64) -> Result<MediaDetail> {
        let kind = self.listing.kind();
        self.listing
            .source()
            .details(kind, id)
            .await
            .with_context(|| format!("Unable to load details for {kind} {id}"))
    }
}
