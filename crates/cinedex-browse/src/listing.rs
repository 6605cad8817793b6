//! Paginated listing over trending, search, and filtered modes.
//!
//! The controller owns a single [`ListingState`] behind a mutex that is
//! never held across an `.await`. Every fetch captures a generation token
//! when it starts; a result whose token is no longer current is dropped
//! so that a slow response can never overwrite a newer session.
#![allow(clippy::future_not_send)]

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use cinedex_api::tmdb::{DiscoverFilters, LocalMediaSource, MediaKind, MediaPage, MediaSummary};
use tracing::{debug, info, instrument, warn};

use crate::catalog::FilterField;

/// Which endpoint the listing is drawn from.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Weekly trending titles.
    #[default]
    Trending,
    /// Free-text search.
    Search,
    /// Discover with country/genre/year selectors.
    Filtered,
}

impl ListingMode {
    /// Filters win over a query; a blank query falls back to trending.
    #[must_use]
    pub fn select(query: &str, filters: &DiscoverFilters) -> Self {
        if filters.is_active() {
            Self::Filtered
        } else if !query.trim().is_empty() {
            Self::Search
        } else {
            Self::Trending
        }
    }

    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Search => "search",
            Self::Filtered => "filtered",
        }
    }
}

impl fmt::Display for ListingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation-facing summary of the listing flags.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    /// No page has been requested since the last restart.
    Idle,
    /// Page 1 is in flight.
    Loading,
    /// Items are shown and more pages may follow.
    Loaded,
    /// The last refresh returned nothing.
    Empty,
    /// The last fetch failed.
    Errored,
    /// A follow-up page is in flight.
    LoadingMore,
    /// No further pages.
    Exhausted,
}

/// Accumulated listing state.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    /// Items in fetch-arrival order.
    pub items: Vec<MediaSummary>,
    /// Last successfully fetched page (1-based).
    pub page: u32,
    /// Active mode, derived from `query` and `filters`.
    pub mode: ListingMode,
    /// Current search text.
    pub query: String,
    /// Current discover selectors.
    pub filters: DiscoverFilters,
    /// Whether another page may exist.
    pub has_more: bool,
    /// Page 1 is in flight.
    pub loading: bool,
    /// A follow-up page is in flight.
    pub loading_more: bool,
    /// Message from the last failed fetch.
    pub error: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            mode: ListingMode::Trending,
            query: String::new(),
            filters: DiscoverFilters::default(),
            has_more: true,
            loading: false,
            loading_more: false,
            error: None,
        }
    }
}

impl ListingState {
    /// Clears accumulated results and re-derives the mode.
    fn restart(&mut self) {
        self.items.clear();
        self.page = 1;
        self.has_more = true;
        self.error = None;
        self.loading = false;
        self.loading_more = false;
        self.mode = ListingMode::select(&self.query, &self.filters);
    }

    fn request(&self) -> Request {
        match self.mode {
            ListingMode::Trending => Request::Trending,
            ListingMode::Search => Request::Search(self.query.clone()),
            ListingMode::Filtered => Request::Filtered(self.filters.clone()),
        }
    }
}

/// Inputs captured when a fetch starts.
#[derive(Debug, Clone)]
enum Request {
    Trending,
    Search(String),
    Filtered(DiscoverFilters),
}

impl Request {
    const fn mode(&self) -> ListingMode {
        match self {
            Self::Trending => ListingMode::Trending,
            Self::Search(_) => ListingMode::Search,
            Self::Filtered(_) => ListingMode::Filtered,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ListingState,
    generation: u64,
    /// A refresh has completed since the last restart.
    settled: bool,
}

impl Inner {
    const fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn restart(&mut self) {
        self.bump();
        self.settled = false;
        self.state.restart();
    }

    /// Applies a page-1 result unless a newer session has started.
    fn finish_refresh(&mut self, generation: u64, mode: ListingMode, result: Result<MediaPage>) {
        if self.generation != generation {
            debug!(generation, "discarding stale page 1");
            return;
        }
        let state = &mut self.state;
        match result {
            Ok(page) => {
                let fetched = page.results.len();
                state.has_more = match mode {
                    ListingMode::Trending => true,
                    ListingMode::Search | ListingMode::Filtered => fetched > 0,
                };
                state.items = page.results;
                state.page = 1;
                state.error = None;
                info!(%mode, fetched, "listing refreshed");
            }
            Err(e) => {
                warn!(%mode, error = %format!("{e:#}"), "listing refresh failed");
                state.error = Some(format!("{e:#}"));
                state.has_more = false;
            }
        }
        self.settled = true;
    }

    /// Applies a follow-up page unless a newer session has started.
    fn finish_load_more(&mut self, generation: u64, page_no: u32, result: Result<MediaPage>) {
        if self.generation != generation {
            debug!(generation, page = page_no, "discarding stale page");
            return;
        }
        let state = &mut self.state;
        match result {
            Ok(page) if page.results.is_empty() => {
                state.has_more = false;
                state.error = None;
                info!(page = page_no, "listing exhausted");
            }
            Ok(page) => {
                let fetched = page.results.len();
                state.items.extend(page.results);
                state.page = page_no;
                state.error = None;
                info!(page = page_no, fetched, total = state.items.len(), "page appended");
            }
            Err(e) => {
                warn!(page = page_no, error = %format!("{e:#}"), "load more failed");
                state.error = Some(format!("{e:#}"));
            }
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy)]
enum Flight {
    Refresh,
    LoadMore,
}

/// Clears an in-flight flag when the fetch future completes or is dropped.
///
/// Only touches state that still belongs to `generation`.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
    flight: Flight,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.generation != self.generation {
            return;
        }
        match self.flight {
            Flight::Refresh => inner.state.loading = false,
            Flight::LoadMore => inner.state.loading_more = false,
        }
    }
}

/// Incremental fetch controller for one media kind.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct ListingController<S> {
    source: S,
    kind: MediaKind,
    inner: Mutex<Inner>,
}

impl<S: LocalMediaSource> ListingController<S> {
    /// Creates an idle controller in trending mode.
    #[must_use]
    pub fn new(source: S, kind: MediaKind) -> Self {
        Self {
            source,
            kind,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Media kind this controller lists.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Underlying data source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ListingState {
        lock(&self.inner).state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ListingState) -> R) -> R {
        f(&lock(&self.inner).state)
    }

    /// Derives the presentation status from the current flags.
    #[must_use]
    pub fn status(&self) -> ListingStatus {
        let inner = lock(&self.inner);
        let state = &inner.state;
        if state.loading {
            ListingStatus::Loading
        } else if state.loading_more {
            ListingStatus::LoadingMore
        } else if !inner.settled {
            ListingStatus::Idle
        } else if state.error.is_some() {
            ListingStatus::Errored
        } else if state.items.is_empty() {
            ListingStatus::Empty
        } else if state.has_more {
            ListingStatus::Loaded
        } else {
            ListingStatus::Exhausted
        }
    }

    /// Replaces the search text. Restarts the listing if it changed.
    pub fn set_query(&self, query: &str) -> bool {
        let query = query.trim();
        let mut inner = lock(&self.inner);
        if inner.state.query == query {
            return false;
        }
        inner.state.query = String::from(query);
        inner.restart();
        debug!(mode = %inner.state.mode, "query changed");
        true
    }

    /// Replaces every filter at once. Restarts the listing if they changed.
    pub fn set_filters(&self, filters: DiscoverFilters) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state.filters == filters {
            return false;
        }
        inner.state.filters = filters;
        inner.restart();
        debug!(mode = %inner.state.mode, "filters changed");
        true
    }

    /// Sets one filter from its textual value; an empty value clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not valid for `field`. State is left
    /// untouched in that case.
    pub fn set_filter(&self, field: FilterField, value: &str) -> Result<bool> {
        let mut filters = self.with_state(|state| state.filters.clone());
        field.apply(&mut filters, value)?;
        Ok(self.set_filters(filters))
    }

    /// Removes every filter.
    pub fn clear_filters(&self) -> bool {
        self.set_filters(DiscoverFilters::default())
    }

    /// Fetches page 1 for the current mode and replaces the items.
    ///
    /// Failures are recorded in [`ListingState::error`]; any items already
    /// shown are kept.
    #[instrument(skip_all, fields(kind = %self.kind))]
    pub async fn refresh(&self) {
        let (generation, request) = {
            let mut inner = lock(&self.inner);
            let generation = inner.bump();
            inner.state.loading = true;
            inner.state.loading_more = false;
            (generation, inner.state.request())
        };
        let _flight = InFlight {
            inner: &self.inner,
            generation,
            flight: Flight::Refresh,
        };

        let result = self.fetch(&request, 1).await;
        lock(&self.inner).finish_refresh(generation, request.mode(), result);
    }

    /// Fetches the next page and appends it.
    ///
    /// Does nothing while another fetch is in flight, before the first
    /// refresh has settled, or once the listing is exhausted.
    #[instrument(skip_all, fields(kind = %self.kind))]
    pub async fn load_more(&self) {
        let (generation, request, next_page) = {
            let mut inner = lock(&self.inner);
            let state = &inner.state;
            if state.loading_more || state.loading || !state.has_more || !inner.settled {
                debug!(
                    loading = state.loading,
                    loading_more = state.loading_more,
                    has_more = state.has_more,
                    "load more skipped"
                );
                return;
            }
            let next_page = state.page.saturating_add(1);
            inner.state.loading_more = true;
            (inner.generation, inner.state.request(), next_page)
        };
        let _flight = InFlight {
            inner: &self.inner,
            generation,
            flight: Flight::LoadMore,
        };

        let result = self.fetch(&request, next_page).await;
        lock(&self.inner).finish_load_more(generation, next_page, result);
    }

    async fn fetch(&self, request: &Request, page: u32) -> Result<MediaPage> {
        match request {
            Request::Trending => self.source.trending(self.kind, page).await,
            Request::Search(query) => self.source.search(self.kind, query, page).await,
            Request::Filtered(filters) => self.source.discover(self.kind, filters, page).await,
        }
    }
}
