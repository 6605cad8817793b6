//! User favorites, persisted write-through to a [`RecordStore`].

use std::collections::HashSet;

use cinedex_api::tmdb::{MediaKind, MediaSummary};
use serde::{Deserialize, Serialize};

use crate::records::RecordStore;

/// Record key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Identity of a favorite. The same numeric ID under a different kind is a
/// different favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FavoriteKey {
    /// TMDB ID.
    pub id: u64,
    /// Media kind.
    pub media_type: MediaKind,
}

/// A favorited movie or series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    /// TMDB ID.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Media kind.
    pub media_type: MediaKind,
}

impl FavoriteItem {
    /// Builds a favorite from a listed entry of the given kind.
    #[must_use]
    pub fn from_summary(summary: &MediaSummary, kind: MediaKind) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            poster_path: summary.poster_path.clone(),
            media_type: kind,
        }
    }

    /// Returns the identity key.
    #[must_use]
    pub const fn key(&self) -> FavoriteKey {
        FavoriteKey {
            id: self.id,
            media_type: self.media_type,
        }
    }
}

/// Ordered set of favorites, unique by [`FavoriteKey`].
///
/// Every mutation is written through to storage immediately. Storage
/// failures are logged and never reach the caller; the in-memory set stays
/// authoritative for the rest of the session.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct FavoritesStore<S: RecordStore> {
    storage: S,
    items: Vec<FavoriteItem>,
}

impl<S: RecordStore> FavoritesStore<S> {
    /// Rebuilds the set from storage.
    ///
    /// Missing, unreadable, or malformed data yields an empty set.
    pub fn load(storage: S) -> Self {
        let items = match storage.read(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_favorites(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorites, starting empty");
                Vec::new()
            }
        };
        tracing::debug!(count = items.len(), "favorites loaded");
        Self { storage, items }
    }

    /// Adds the item, or removes it if its key is already present.
    ///
    /// Returns whether the item is a favorite afterwards.
    pub fn toggle(&mut self, item: FavoriteItem) -> bool {
        let key = item.key();
        let now_favorite =
            if let Some(pos) = self.items.iter().position(|f| f.key() == key) {
                self.items.remove(pos);
                false
            } else {
                self.items.push(item);
                true
            };

        tracing::info!(
            id = key.id,
            kind = %key.media_type,
            favorite = now_favorite,
            "favorite toggled"
        );
        self.persist();
        now_favorite
    }

    /// Returns `true` if `(id, media_type)` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: u64, media_type: MediaKind) -> bool {
        let key = FavoriteKey { id, media_type };
        self.items.iter().any(|f| f.key() == key)
    }

    /// Removes every favorite.
    pub fn clear(&mut self) {
        self.items.clear();
        tracing::info!("favorites cleared");
        self.persist();
    }

    /// Favorites in insertion order.
    #[must_use]
    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Writes the full set to storage. Failures are logged only.
    pub fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize favorites");
                return;
            }
        };
        if let Err(e) = self.storage.write(FAVORITES_KEY, &raw) {
            tracing::error!(error = %e, count = self.items.len(), "failed to persist favorites");
        }
    }
}

/// Parses a stored favorites list. Duplicate keys keep the first entry.
fn parse_favorites(raw: &str) -> Vec<FavoriteItem> {
    let parsed: Vec<FavoriteItem> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "malformed favorites record, starting empty");
            return Vec::new();
        }
    };

    let mut seen: HashSet<FavoriteKey> = HashSet::with_capacity(parsed.len());
    parsed
        .into_iter()
        .filter(|item| seen.insert(item.key()))
        .collect()
}
