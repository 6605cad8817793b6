//! Text rendering for listings, details, and favorites.
//!
//! Output goes through `tracing::info!` like the rest of the binary.

use std::fmt::Write as _;

use cinedex_api::tmdb::{MediaDetail, MediaSummary};
use cinedex_browse::catalog::{self, COUNTRIES, GENRES};
use cinedex_browse::{ListingState, ListingStatus};
use cinedex_db::FavoriteItem;

/// Number of cast members shown on the detail view.
pub const TOP_CAST: usize = 10;

/// Formats one listing row. `index` is zero-based; rows are shown 1-based.
pub fn summary_line(index: usize, summary: &MediaSummary, favorite: bool) -> String {
    format!(
        "{:>3} {} {:<8} {:<4} {:>4.1}  {}",
        index.saturating_add(1),
        if favorite { "*" } else { " " },
        summary.id,
        summary.release_year().unwrap_or("-"),
        summary.vote_average,
        summary.title,
    )
}

/// Describes the listing header line.
pub fn listing_header(state: &ListingState, status: ListingStatus) -> String {
    let mut header = format!(
        "[{}] {:?}, page {}, {} items",
        state.mode,
        status,
        state.page,
        state.items.len()
    );
    if !state.query.is_empty() {
        let _ = write!(header, ", query {:?}", state.query);
    }
    if let Some(ref country) = state.filters.country {
        match catalog::country_name(country) {
            Some(name) => {
                let _ = write!(header, ", country {name} ({country})");
            }
            None => {
                let _ = write!(header, ", country {country}");
            }
        }
    }
    if let Some(genre) = state.filters.genre {
        match catalog::genre_name(genre) {
            Some(name) => {
                let _ = write!(header, ", genre {name}");
            }
            None => {
                let _ = write!(header, ", genre {genre}");
            }
        }
    }
    if let Some(year) = state.filters.year {
        let _ = write!(header, ", year {year}");
    }
    header
}

/// Logs a listing with favorite markers.
pub fn log_listing(
    state: &ListingState,
    status: ListingStatus,
    is_favorite: impl Fn(&MediaSummary) -> bool,
) {
    tracing::info!("{}", listing_header(state, status));
    for (index, summary) in state.items.iter().enumerate() {
        tracing::info!("{}", summary_line(index, summary, is_favorite(summary)));
    }
    if let Some(ref error) = state.error {
        tracing::info!("Failed to load: {error}");
    } else if status == ListingStatus::Empty {
        tracing::info!("No results.");
    } else if status == ListingStatus::Exhausted {
        tracing::info!("No more results.");
    }
}

/// Logs a detail record.
pub fn log_detail(detail: &MediaDetail) {
    tracing::info!("ID: {}", detail.id);
    tracing::info!("Title: {}", detail.title);
    tracing::info!("Year: {}", detail.release_year().unwrap_or("-"));
    tracing::info!(
        "Runtime: {}",
        detail
            .runtime_minutes()
            .map_or_else(|| String::from("-"), |m| format!("{m} min"))
    );
    tracing::info!("Rating: {:.1}", detail.vote_average);
    let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
    if genres.is_empty() {
        tracing::info!("Genres: -");
    } else {
        tracing::info!("Genres: {}", genres.join(", "));
    }
    if let Some(url) = detail.poster_path.as_deref().map(cinedex_api::tmdb::poster_url) {
        tracing::info!("Poster: {url}");
    }
    tracing::info!("Overview: {}", detail.overview.as_deref().unwrap_or("-"));
    tracing::info!("---");
    for member in detail.top_cast(TOP_CAST) {
        tracing::info!(
            "  {} as {}",
            member.name,
            member.character.as_deref().unwrap_or("-")
        );
    }
    match detail.trailer_url() {
        Some(url) => tracing::info!("Trailer: {url}"),
        None => tracing::info!("Trailer: -"),
    }
}

/// Logs the favorites list.
pub fn log_favorites(items: &[FavoriteItem]) {
    if items.is_empty() {
        tracing::info!("No favorites yet.");
        return;
    }
    tracing::info!("{} favorites", items.len());
    for item in items {
        tracing::info!(
            "{:<5} {:<8} {}",
            item.media_type,
            item.id,
            if item.title.is_empty() { "-" } else { item.title.as_str() }
        );
    }
}

/// Logs the filter selector options.
pub fn log_catalog(years: &[u32]) {
    tracing::info!("Countries:");
    for country in COUNTRIES {
        tracing::info!("  {}  {}", country.code, country.name);
    }
    tracing::info!("Genres:");
    for genre in GENRES {
        tracing::info!("  {:<3} {}", genre.id, genre.name);
    }
    let years: Vec<String> = years.iter().map(ToString::to_string).collect();
    tracing::info!("Years: {}", years.join(" "));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedex_api::tmdb::DiscoverFilters;
    use cinedex_browse::ListingMode;

    use super::*;

    fn summary() -> MediaSummary {
        MediaSummary {
            id: 550,
            title: String::from("Fight Club"),
            poster_path: None,
            release_date: Some(String::from("1999-10-15")),
            overview: None,
            vote_average: 8.4,
            media_type: None,
        }
    }

    #[test]
    fn test_summary_line_is_one_based_with_marker() {
        // Arrange & Act
        let line = summary_line(0, &summary(), true);

        // Assert
        assert!(line.starts_with("  1 *"));
        assert!(line.contains("550"));
        assert!(line.contains("1999"));
        assert!(line.contains("8.4"));
        assert!(line.ends_with("Fight Club"));
    }

    #[test]
    fn test_listing_header_names_filters() {
        // Arrange
        let state = ListingState {
            mode: ListingMode::Filtered,
            query: String::from("club"),
            filters: DiscoverFilters {
                country: Some(String::from("US")),
                genre: Some(18),
                year: Some(1999),
            },
            ..ListingState::default()
        };

        // Act
        let header = listing_header(&state, ListingStatus::Idle);

        // Assert
        assert!(header.starts_with("[filtered] Idle, page 1, 0 items"));
        assert!(header.contains("query \"club\""));
        assert!(header.contains("country United States (US)"));
        assert!(header.contains("genre Drama"));
        assert!(header.contains("year 1999"));
    }

    #[test]
    fn test_listing_header_keeps_unknown_codes() {
        // Arrange
        let state = ListingState {
            mode: ListingMode::Filtered,
            filters: DiscoverFilters {
                country: Some(String::from("DE")),
                genre: Some(99),
                year: None,
            },
            ..ListingState::default()
        };

        // Act
        let header = listing_header(&state, ListingStatus::Idle);

        // Assert
        assert!(header.ends_with(", country DE, genre 99"));
    }
}
