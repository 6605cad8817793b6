//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalMediaSource;
use super::pacer::{DEFAULT_MIN_INTERVAL, RequestPacer};
use super::types::{DiscoverFilters, MediaDetail, MediaKind, MediaPage, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff step between retries (multiplied by the attempt number).
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    http_client: Client,
    base_url: Url,
    api_token: String,
    language: String,
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: `en-US`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or blank.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self
            .api_token
            .filter(|t| !t.trim().is_empty())
            .context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let pacer = RequestPacer::new(self.min_interval.unwrap_or(DEFAULT_MIN_INTERVAL));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::default()
    }

    /// Sends a paced GET with Bearer auth and the configured language.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.pacer.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(&[("language", self.language.as_str())])
                .query(query)
                .build()
                .with_context(|| format!("failed to build request: {path}"))?;

            tracing::debug!(url = %request.url(), "TMDB API request");

            let response = self
                .http_client
                .execute(request)
                .await
                .with_context(|| format!("request failed: {path}"))?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("TMDB API rate limit exceeded after {MAX_RETRIES} retries: {path}");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "TMDB API rate limited (429), backing off"
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.pacer.lock().await.wait().await;
                continue;
            }

            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body: {path}"))?;

            if !status.is_success() {
                if let Ok(error) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                    bail!(
                        "TMDB API error (HTTP {status}): code={}, message={}",
                        error.status_code,
                        error.status_message,
                    );
                }
                bail!("TMDB API error (HTTP {status}): {body}");
            }

            return serde_json::from_str(&body)
                .with_context(|| format!("failed to decode JSON response: {path}"));
        }
    }
}

impl LocalMediaSource for TmdbClient {
    #[instrument(skip_all, fields(kind = %kind, page = page))]
    async fn trending(&self, kind: MediaKind, page: u32) -> Result<MediaPage> {
        let path = format!("trending/{kind}/week");
        let query = [("page", page.to_string())];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(kind = %kind, page = page))]
    async fn search(&self, kind: MediaKind, query: &str, page: u32) -> Result<MediaPage> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("blank search query, skipping request");
            return Ok(MediaPage::empty());
        }

        let path = format!("search/{kind}");
        let params = [
            ("query", String::from(query)),
            ("page", page.to_string()),
            ("include_adult", String::from("false")),
        ];
        self.get_json(&path, &params).await
    }

    #[instrument(skip_all, fields(kind = %kind, page = page))]
    async fn discover(
        &self,
        kind: MediaKind,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<MediaPage> {
        let path = format!("discover/{kind}");
        let mut query = filters.to_query(kind);
        query.push(("page", page.to_string()));
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(kind = %kind, id = id))]
    async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetail> {
        let path = format!("{kind}/{id}");
        let query = [("append_to_response", String::from("credits,videos"))];
        self.get_json(&path, &query).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Builds a client pointed at the mock server with pacing disabled.
    fn mock_client(server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_token is required")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_token() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_token("   ")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.language, "en-US");
    }

    #[test]
    fn test_parse_trending_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/trending_movie_week.json");

        // Act
        let page: MediaPage = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(page.page, 1);
        assert_eq!(page.results.len(), 3);
        assert_eq!(page.results[0].id, 550);
        assert_eq!(page.results[0].title, "Fight Club");
        assert_eq!(page.results[0].media_type, Some(MediaKind::Movie));
    }

    #[test]
    fn test_parse_movie_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        // Act
        let details: MediaDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.id, 550);
        assert_eq!(details.runtime_minutes(), Some(139));
        assert_eq!(details.release_year(), Some("1999"));
        assert_eq!(details.genres.len(), 1);
        assert_eq!(details.top_cast(10).len(), 3);
        assert_eq!(
            details.trailer_url().as_deref(),
            Some("https://www.youtube.com/watch?v=qtRKdVHc-cE")
        );
    }

    #[test]
    fn test_parse_tv_details_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");

        // Act
        let details: MediaDetail = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(details.title, "Game of Thrones");
        assert_eq!(details.runtime_minutes(), Some(60));
        assert!(details.trailer().is_none());
        assert_eq!(details.top_cast(1).len(), 1);
    }

    #[test]
    fn test_parse_error_response() {
        // Arrange
        let json = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        // Act
        let error: TmdbErrorResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(error.status_code, 7);
        assert!(error.status_message.starts_with("Invalid API key"));
    }

    #[tokio::test]
    async fn test_trending_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/trending_movie_week.json");

        Mock::given(method("GET"))
            .and(path("/3/trending/movie/week"))
            .and(query_param("page", "1"))
            .and(query_param("language", "en-US"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let page = client.trending(MediaKind::Movie, 1).await.unwrap();

        // Assert
        assert_eq!(page.results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_tv_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_tv_thrones.json");

        Mock::given(method("GET"))
            .and(path("/3/search/tv"))
            .and(query_param("query", "thrones"))
            .and(query_param("page", "2"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let page = client.search(MediaKind::Tv, "  thrones ", 2).await.unwrap();

        // Assert
        assert_eq!(page.results[0].title, "Game of Thrones");
        assert_eq!(page.results[0].release_year(), Some("2011"));
    }

    #[tokio::test]
    async fn test_blank_search_skips_request() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let page = client.search(MediaKind::Movie, "   ", 1).await.unwrap();

        // Assert
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_discover_tv_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/discover_empty.json");

        Mock::given(method("GET"))
            .and(path("/3/discover/tv"))
            .and(query_param("sort_by", "popularity.desc"))
            .and(query_param("with_genres", "18"))
            .and(query_param("first_air_date_year", "2021"))
            .and(query_param("with_origin_country", "FR"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let filters = DiscoverFilters {
            country: Some(String::from("FR")),
            genre: Some(18),
            year: Some(2021),
        };

        // Act
        let page = client.discover(MediaKind::Tv, &filters, 3).await.unwrap();

        // Assert
        assert!(page.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn test_details_appends_credits_and_videos() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/movie_details_550.json");

        Mock::given(method("GET"))
            .and(path("/3/movie/550"))
            .and(query_param("append_to_response", "credits,videos"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let details = client.details(MediaKind::Movie, 550).await.unwrap();

        // Assert
        assert_eq!(details.title, "Fight Club");
        assert_eq!(details.credits.cast[0].name, "Edward Norton");
    }

    #[tokio::test]
    async fn test_http_error_carries_tmdb_message() {
        // Arrange
        let mock_server = MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.trending(MediaKind::Tv, 1).await;

        // Assert
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.details(MediaKind::Movie, 1).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_http_429_retries() {
        // Arrange
        let mock_server = MockServer::start().await;
        let error_body = r#"{"status_code":25,"status_message":"Your request count is over the allowed limit.","success":false}"#;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
            .expect(u64::from(MAX_RETRIES) + 1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        // Act
        let result = client.trending(MediaKind::Movie, 1).await;

        // Assert
        assert!(result.unwrap_err().to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_pacer_spaces_requests() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/discover_empty.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client.trending(MediaKind::Movie, 1).await.unwrap();
        client.trending(MediaKind::Movie, 2).await.unwrap();

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
