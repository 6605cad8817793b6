//! TMDB API response types and query filters.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Base URL for poster images (w500 rendition).
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Base URL for YouTube trailer links.
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Builds a full poster URL from a TMDB image path.
#[must_use]
pub fn poster_url(poster_path: &str) -> String {
    format!("{TMDB_IMAGE_BASE_URL}{poster_path}")
}

// --- Media kind ---

/// Media category. Part of every favorite's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
}

impl MediaKind {
    /// Returns the TMDB path segment (`movie` / `tv`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(Self::Movie),
            "tv" | "series" => Ok(Self::Tv),
            other => bail!("unknown media kind: {other} (expected movie or tv)"),
        }
    }
}

// --- Listings ---

/// One page of list results (`trending`, `search`, `discover`).
///
/// Every field defaults so that a body without `results` reads as an
/// empty page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaPage {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Results on this page.
    #[serde(default)]
    pub results: Vec<MediaSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

impl MediaPage {
    /// An empty first page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    /// Returns `true` if the page carries no results.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A single movie or TV list entry.
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// both land in the same fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaSummary {
    /// TMDB ID.
    pub id: u64,
    /// Localized title (`title` or `name`).
    #[serde(alias = "name", default)]
    pub title: String,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release or first air date (YYYY-MM-DD).
    #[serde(alias = "first_air_date", default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Media type (only present on trending responses).
    #[serde(default)]
    pub media_type: Option<MediaKind>,
}

impl MediaSummary {
    /// Returns the four-digit release year, if known.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        release_year(self.release_date.as_deref())
    }
}

// --- Details ---

/// Response from `{kind}/{id}?append_to_response=credits,videos`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDetail {
    /// TMDB ID.
    pub id: u64,
    /// Localized title (`title` or `name`).
    #[serde(alias = "name", default)]
    pub title: String,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release or first air date.
    #[serde(alias = "first_air_date", default)]
    pub release_date: Option<String>,
    /// Runtime in minutes (movies).
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Episode runtimes in minutes (series).
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Appended credits.
    #[serde(default)]
    pub credits: Credits,
    /// Appended videos.
    #[serde(default)]
    pub videos: Videos,
}

impl MediaDetail {
    /// Returns the first `n` billed cast members.
    #[must_use]
    pub fn top_cast(&self, n: usize) -> &[CastMember] {
        let end = n.min(self.credits.cast.len());
        self.credits.cast.get(..end).unwrap_or_default()
    }

    /// Returns the first YouTube trailer.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .results
            .iter()
            .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
    }

    /// Returns the watch URL of the first YouTube trailer.
    #[must_use]
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer()
            .map(|v| format!("{YOUTUBE_WATCH_URL}{}", v.key))
    }

    /// Returns the four-digit release year, if known.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        release_year(self.release_date.as_deref())
    }

    /// Returns the runtime in minutes, falling back to the first episode runtime.
    #[must_use]
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime
            .or_else(|| self.episode_run_time.first().copied())
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Appended `credits` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    /// Billed cast, in order.
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// A single cast member.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Appended `videos` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    /// Video entries.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// A video reference (trailer, teaser, clip).
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Site-specific key (YouTube video ID).
    pub key: String,
    /// Hosting site (e.g., "YouTube").
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Discover filters ---

/// Selector values for the `discover/{kind}` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverFilters {
    /// Country code (ISO 3166-1).
    pub country: Option<String>,
    /// TMDB genre ID.
    pub genre: Option<u32>,
    /// Release (or first air) year.
    pub year: Option<u32>,
}

impl DiscoverFilters {
    /// Returns `true` if any selector is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.country.is_some() || self.genre.is_some() || self.year.is_some()
    }

    /// Builds the query parameters for `discover/{kind}`.
    ///
    /// Year and country map to different parameters per kind.
    pub(crate) fn to_query(&self, kind: MediaKind) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> =
            vec![("sort_by", String::from("popularity.desc"))];
        if let Some(genre) = self.genre {
            query.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            let key = match kind {
                MediaKind::Movie => "primary_release_year",
                MediaKind::Tv => "first_air_date_year",
            };
            query.push((key, year.to_string()));
        }
        if let Some(ref country) = self.country {
            let key = match kind {
                MediaKind::Movie => "region",
                MediaKind::Tv => "with_origin_country",
            };
            query.push((key, country.clone()));
        }
        query
    }
}

fn release_year(date: Option<&str>) -> Option<&str> {
    date.and_then(|d| d.split('-').next())
        .filter(|y| !y.is_empty())
}
