//! cinedex - browse movies and TV series from TMDB.

/// Application configuration (TOML).
mod config;
/// Interactive browse loop.
mod interactive;
/// Text rendering.
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use cinedex_api::tmdb::{LocalMediaSource, MediaKind, TmdbClient};
use cinedex_browse::{BrowseSession, FilterField, ListingController, catalog};
use cinedex_db::{FavoriteItem, FavoritesStore, SqliteRecordStore, open_db};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List trending, searched, or filtered titles.
    List(ListArgs),
    /// Show details, cast, and trailer for one title.
    Details(DetailsArgs),
    /// Manage favorites.
    Favorites(FavoritesCommand),
    /// Show the available filter values.
    Filters,
    /// Browse interactively (reads commands from stdin).
    Browse(BrowseArgs),
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Media kind: movie or tv (default: config `browse.default_kind`).
    #[arg(long)]
    kind: Option<MediaKind>,

    /// Search text.
    #[arg(long)]
    query: Option<String>,

    /// Genre ID (see `filters`).
    #[arg(long)]
    genre: Option<String>,

    /// Release or first-air year.
    #[arg(long)]
    year: Option<String>,

    /// Country code (ISO 3166-1 alpha-2).
    #[arg(long)]
    country: Option<String>,

    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=50))]
    pages: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Media kind: movie or tv (default: config `browse.default_kind`).
    #[arg(long)]
    kind: Option<MediaKind>,

    /// TMDB ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List favorites.
    List,
    /// Add a title, or remove it if already a favorite.
    Toggle(ToggleArgs),
    /// Remove every favorite.
    Clear,
}

/// Arguments for the `favorites toggle` subcommand.
#[derive(clap::Args)]
struct ToggleArgs {
    /// Media kind: movie or tv.
    #[arg(long)]
    kind: MediaKind,

    /// TMDB ID.
    #[arg(long)]
    id: u64,

    /// Display title.
    #[arg(long, default_value = "")]
    title: String,

    /// Poster path (e.g. `/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg`).
    #[arg(long)]
    poster: Option<String>,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Media kind: movie or tv (default: config `browse.default_kind`).
    #[arg(long)]
    kind: Option<MediaKind>,
}

/// Builds a `TmdbClient` from config, with `TMDB_API_TOKEN` taking precedence.
///
/// # Errors
///
/// Returns an error if no token is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let Some(api_token) = config.api_token(std::env::var("TMDB_API_TOKEN").ok()) else {
        bail!("TMDB API token is missing: set TMDB_API_TOKEN or tmdb.api_token in config.toml");
    };

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .language(config.tmdb.language.clone())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(ref base_url) = config.tmdb.base_url {
        let url =
            Url::parse(base_url).with_context(|| format!("invalid tmdb.base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&Path>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Opens the favorites store in the data directory.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
fn open_favorites(dir: Option<&Path>) -> Result<FavoritesStore<SqliteRecordStore>> {
    let conn = open_db(dir).context("failed to open database")?;
    Ok(FavoritesStore::load(SqliteRecordStore::new(conn)))
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built, a filter value is
/// invalid, or the first page fails to load.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let kind = args.kind.unwrap_or(config.browse.default_kind);
    let listing = ListingController::new(client, kind);

    if let Some(ref query) = args.query {
        listing.set_query(query);
    }
    let selectors = [
        (FilterField::Genre, args.genre.as_deref()),
        (FilterField::Year, args.year.as_deref()),
        (FilterField::Country, args.country.as_deref()),
    ];
    for (field, value) in selectors {
        if let Some(value) = value {
            listing
                .set_filter(field, value)
                .with_context(|| format!("invalid --{field}"))?;
        }
    }

    listing.refresh().await;
    for _ in 1..args.pages {
        if !listing.with_state(|state| state.has_more && state.error.is_none()) {
            break;
        }
        listing.load_more().await;
    }

    let favorites = open_favorites(dir)?;
    let state = listing.snapshot();
    render::log_listing(&state, listing.status(), |summary| {
        favorites.is_favorite(summary.id, kind)
    });

    match state.error {
        Some(error) if state.items.is_empty() => {
            bail!("failed to load {kind} listing: {error}")
        }
        _ => Ok(()),
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let kind = args.kind.unwrap_or(config.browse.default_kind);

    let detail = client
        .details(kind, args.id)
        .await
        .with_context(|| format!("Unable to load details for {kind} {}", args.id))?;

    render::log_detail(&detail);
    Ok(())
}

/// Runs the `favorites` subcommands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
#[instrument(skip_all)]
fn run_favorites(command: FavoritesSubcommands, dir: Option<&Path>) -> Result<()> {
    let mut favorites = open_favorites(dir)?;
    match command {
        FavoritesSubcommands::List => render::log_favorites(favorites.items()),
        FavoritesSubcommands::Toggle(args) => {
            let item = FavoriteItem {
                id: args.id,
                title: args.title,
                poster_path: args.poster,
                media_type: args.kind,
            };
            if favorites.toggle(item) {
                tracing::info!("Added {} {} to favorites", args.kind, args.id);
            } else {
                tracing::info!("Removed {} {} from favorites", args.kind, args.id);
            }
        }
        FavoritesSubcommands::Clear => {
            let count = favorites.len();
            favorites.clear();
            tracing::info!("Removed {count} favorites");
        }
    }
    Ok(())
}

/// Runs the `browse` subcommand over stdin.
///
/// # Errors
///
/// Returns an error if the client or database cannot be opened, or stdin
/// cannot be read.
#[allow(clippy::future_not_send)]
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&Path>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;
    let kind = args.kind.unwrap_or(config.browse.default_kind);
    let favorites = open_favorites(dir)?;

    let mut session = BrowseSession::new(ListingController::new(client, kind), favorites);
    tracing::info!("Browsing {kind}. Type `help` for commands.");
    interactive::run_browse_loop(&mut session, std::io::stdin().lock()).await
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::List(args) => run_list(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Favorites(cmd) => run_favorites(cmd.command, dir),
        Commands::Filters => {
            render::log_catalog(&catalog::years());
            Ok(())
        }
        Commands::Browse(args) => run_browse(&args, dir).await,
    }
}
