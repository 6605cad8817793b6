//! Line-oriented interactive browse loop over stdin.
#![allow(clippy::future_not_send)]

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use cinedex_api::tmdb::LocalMediaSource;
use cinedex_browse::{BrowseSession, FilterField};
use cinedex_db::RecordStore;

use crate::render;

/// Help text listing every command.
const HELP: &[&str] = &[
    "search <text>          search titles",
    "clear-search           back to trending",
    "filter <field> <value> set country|genre|year (empty value clears)",
    "clear-filters          remove all filters",
    "more                   load the next page",
    "fav <n>                toggle favorite for row n",
    "info <n>               show details for row n",
    "favs                   list favorites",
    "show                   redraw the listing",
    "quit                   leave",
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Submit a search.
    Search(String),
    /// Clear the search text.
    ClearSearch,
    /// Set or clear one filter.
    Filter(FilterField, String),
    /// Clear every filter.
    ClearFilters,
    /// Load the next page.
    More,
    /// Toggle the favorite for a zero-based row.
    Favorite(usize),
    /// Show details for a zero-based row.
    Info(usize),
    /// List favorites.
    Favorites,
    /// Redraw the listing.
    Show,
    /// Print the command list.
    Help,
    /// Leave the loop.
    Quit,
}

impl BrowseCommand {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Self::Search(String::from(rest)),
            "clear-search" => Self::ClearSearch,
            "filter" | "f" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    bail!("usage: filter <country|genre|year> [value]");
                }
                Self::Filter(field.parse()?, String::from(value.trim()))
            }
            "clear-filters" => Self::ClearFilters,
            "more" | "m" => Self::More,
            "fav" => Self::Favorite(parse_row(rest)?),
            "info" | "i" => Self::Info(parse_row(rest)?),
            "favs" => Self::Favorites,
            "show" | "ls" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command: {other} (type `help`)"),
        };
        Ok(Some(command))
    }
}

/// Parses a 1-based row number into a zero-based index.
fn parse_row(raw: &str) -> Result<usize> {
    let row: usize = raw
        .parse()
        .with_context(|| format!("invalid row number: {raw:?}"))?;
    row.checked_sub(1).context("row numbers start at 1")
}

fn show<S: LocalMediaSource, R: RecordStore>(session: &BrowseSession<S, R>) {
    let state = session.listing().snapshot();
    render::log_listing(&state, session.listing().status(), |summary| {
        session.is_favorite(summary)
    });
}

/// Runs the browse loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading `input` fails.
pub async fn run_browse_loop<S, R>(
    session: &mut BrowseSession<S, R>,
    input: impl BufRead,
) -> Result<()>
where
    S: LocalMediaSource,
    R: RecordStore,
{
    session.start().await;
    show(session);

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = match BrowseCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{e:#}");
                continue;
            }
        };

        match command {
            BrowseCommand::Search(query) => {
                session.on_search_submit(&query).await;
                show(session);
            }
            BrowseCommand::ClearSearch => {
                session.on_clear_search().await;
                show(session);
            }
            BrowseCommand::Filter(field, value) => {
                session.on_filter_change(field, &value).await;
                show(session);
            }
            BrowseCommand::ClearFilters => {
                session.on_clear_filters().await;
                show(session);
            }
            BrowseCommand::More => {
                session.on_load_more().await;
                show(session);
            }
            BrowseCommand::Favorite(index) => match session.on_toggle_listed_favorite(index) {
                Some(true) => {
                    tracing::info!("Added row {} to favorites", index.saturating_add(1));
                }
                Some(false) => {
                    tracing::info!("Removed row {} from favorites", index.saturating_add(1));
                }
                None => tracing::warn!("no row {}", index.saturating_add(1)),
            },
            BrowseCommand::Info(index) => {
                let id = session
                    .listing()
                    .with_state(|state| state.items.get(index).map(|s| s.id));
                let Some(id) = id else {
                    tracing::warn!("no row {}", index.saturating_add(1));
                    continue;
                };
                match session.details(id).await {
                    Ok(detail) => render::log_detail(&detail),
                    Err(e) => tracing::warn!("{e:#}"),
                }
            }
            BrowseCommand::Favorites => render::log_favorites(session.favorites().items()),
            BrowseCommand::Show => show(session),
            BrowseCommand::Help => {
                for line in HELP {
                    tracing::info!("{line}");
                }
            }
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}
