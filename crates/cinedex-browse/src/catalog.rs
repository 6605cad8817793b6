//! Selector options offered for the filtered listing.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local};
use cinedex_api::tmdb::DiscoverFilters;

/// Number of years offered by the year selector.
pub const YEAR_SPAN: u32 = 30;

/// A selectable production country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryOption {
    /// ISO 3166-1 alpha-2 code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// A selectable genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreOption {
    /// TMDB genre ID.
    pub id: u32,
    /// Display name.
    pub name: &'static str,
}

/// Countries offered by the country selector.
pub const COUNTRIES: &[CountryOption] = &[
    CountryOption { code: "US", name: "United States" },
    CountryOption { code: "GB", name: "United Kingdom" },
    CountryOption { code: "FR", name: "France" },
    CountryOption { code: "JP", name: "Japan" },
    CountryOption { code: "IN", name: "India" },
];

/// Genres offered by the genre selector.
pub const GENRES: &[GenreOption] = &[
    GenreOption { id: 28, name: "Action" },
    GenreOption { id: 12, name: "Adventure" },
    GenreOption { id: 16, name: "Animation" },
    GenreOption { id: 35, name: "Comedy" },
    GenreOption { id: 18, name: "Drama" },
];

/// Years offered by the year selector, newest first, ending at the
/// current local year.
#[must_use]
pub fn years() -> Vec<u32> {
    let current = u32::try_from(Local::now().year()).unwrap_or_default();
    years_until(current)
}

/// The [`YEAR_SPAN`] years counted back from `current`, newest first.
#[must_use]
pub fn years_until(current: u32) -> Vec<u32> {
    (0..YEAR_SPAN)
        .map_while(|offset| current.checked_sub(offset))
        .collect()
}

/// Looks up the display name of a genre ID.
#[must_use]
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|g| g.id == id).map(|g| g.name)
}

/// Looks up the display name of a country code (case-insensitive).
#[must_use]
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map(|c| c.name)
}

/// One discover selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Production / origin country.
    Country,
    /// Genre ID.
    Genre,
    /// Release or first-air year.
    Year,
}

impl FilterField {
    /// Returns the selector name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Genre => "genre",
            Self::Year => "year",
        }
    }

    /// Writes `value` into the matching selector of `filters`.
    ///
    /// A blank value clears the selector. Country codes are upper-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be parsed for this field.
    /// `filters` is not modified in that case.
    pub fn apply(self, filters: &mut DiscoverFilters, value: &str) -> Result<()> {
        let value = value.trim();
        match self {
            Self::Country if value.is_empty() => filters.country = None,
            Self::Country => {
                if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("invalid country code: {value} (expected ISO 3166-1 alpha-2)");
                }
                filters.country = Some(value.to_ascii_uppercase());
            }
            Self::Genre if value.is_empty() => filters.genre = None,
            Self::Genre => {
                let id = value
                    .parse::<u32>()
                    .with_context(|| format!("invalid genre id: {value}"))?;
                filters.genre = Some(id);
            }
            Self::Year if value.is_empty() => filters.year = None,
            Self::Year => {
                let year = value
                    .parse::<u32>()
                    .with_context(|| format!("invalid year: {value}"))?;
                filters.year = Some(year);
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" => Ok(Self::Country),
            "genre" => Ok(Self::Genre),
            "year" => Ok(Self::Year),
            other => bail!("unknown filter: {other} (expected country, genre or year)"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_years_until_counts_back() {
        // Arrange & Act
        let years = years_until(2025);

        // Assert
        assert_eq!(years.len(), 30);
        assert_eq!(years.first(), Some(&2025));
        assert_eq!(years.last(), Some(&1996));
    }

    #[test]
    fn test_years_starts_at_current_year() {
        // Arrange
        let current = u32::try_from(Local::now().year()).unwrap();

        // Act
        let years = years();

        // Assert
        assert_eq!(years[0], current);
        assert_eq!(years.len(), 30);
    }

    #[test]
    fn test_lookup_names() {
        // Arrange & Act & Assert
        assert_eq!(genre_name(16), Some("Animation"));
        assert_eq!(genre_name(99), None);
        assert_eq!(country_name("jp"), Some("Japan"));
        assert_eq!(country_name("DE"), None);
    }

    #[test]
    fn test_filter_field_from_str() {
        // Arrange & Act & Assert
        assert_eq!("Country".parse::<FilterField>().unwrap(), FilterField::Country);
        assert_eq!(" genre ".parse::<FilterField>().unwrap(), FilterField::Genre);
        assert_eq!("year".parse::<FilterField>().unwrap(), FilterField::Year);
        assert!("rating".parse::<FilterField>().is_err());
    }

    #[test]
    fn test_apply_sets_and_clears() {
        // Arrange
        let mut filters = DiscoverFilters::default();

        // Act
        FilterField::Country.apply(&mut filters, "fr").unwrap();
        FilterField::Genre.apply(&mut filters, "35").unwrap();
        FilterField::Year.apply(&mut filters, "1999").unwrap();
        let all_set = filters.clone();
        FilterField::Genre.apply(&mut filters, "").unwrap();

        // Assert
        assert_eq!(all_set.country.as_deref(), Some("FR"));
        assert_eq!(all_set.genre, Some(35));
        assert_eq!(all_set.year, Some(1999));
        assert_eq!(filters.genre, None);
        assert_eq!(filters.country.as_deref(), Some("FR"));
    }

    #[test]
    fn test_apply_rejects_invalid_values() {
        // Arrange
        let mut filters = DiscoverFilters::default();

        // Act & Assert
        assert!(FilterField::Country.apply(&mut filters, "FRA").is_err());
        assert!(FilterField::Country.apply(&mut filters, "1A").is_err());
        assert!(FilterField::Genre.apply(&mut filters, "action").is_err());
        assert!(FilterField::Year.apply(&mut filters, "-1").is_err());
        assert_eq!(filters, DiscoverFilters::default());
    }
}
