//! Local persistence for cinedex.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a small key/value record store,
//! and keeps the user's favorites in one of those records.

/// Favorites store.
pub mod favorites;
mod connection;
mod migrations;
/// Whole-record key/value storage.
pub mod records;

pub use connection::open_db;
pub use favorites::{FAVORITES_KEY, FavoriteItem, FavoriteKey, FavoritesStore};
pub use records::{MemoryRecordStore, RecordStore, SqliteRecordStore};
