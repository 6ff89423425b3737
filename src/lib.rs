//! Anispace Reader - browse and read manga from the Anispace catalog
//!
//! This library provides the building blocks of a manga reading front-end:
//! a client for the catalog API, the chapter reader's page tracking and
//! chapter navigation, chapter list pagination, and client-side routes.
//! The loaders in this module assemble the data each view needs.

pub mod catalog;
pub mod config;
pub mod display;
pub mod pagination;
pub mod reader;
pub mod routes;
pub mod view;

use catalog::{CatalogProvider, Connection, SearchResults, Series};
use pagination::ChapterPager;
use reader::{ChapterNavigator, ChapterReader};
use thiserror::Error;
use tracing::debug;

// Re-export error types
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use routes::RouteError;

/// Progress event emitted while a view loads
///
/// These events allow library users to show what is being fetched; they can
/// be ignored for silent operation.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// Fetching series details
    FetchingSeries { series_id: String },

    /// Series details arrived
    SeriesFetched { title: String, chapter_count: usize },

    /// Resolving related catalog entries
    FetchingConnections { series_id: String },

    /// Related entries arrived (0 when they could not be loaded)
    ConnectionsFetched { count: usize },

    /// Fetching the page images of a chapter
    FetchingChapter { series_id: String, chapter: String },

    /// Chapter images arrived
    ChapterFetched { page_count: usize },

    /// Fetching the chapter list for navigation
    FetchingChapterList { series_id: String },

    /// Searching the catalog
    Searching { query: String, page: u32 },
}

/// Top-level error type for Anispace Reader operations
#[derive(Debug, Error)]
pub enum AnispaceError {
    /// Error while talking to the catalog API
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A navigation route could not be parsed
    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything the series page shows.
#[derive(Debug, Clone)]
pub struct SeriesPage {
    pub series: Series,
    /// Related entries; empty when they could not be loaded
    pub connections: Vec<Connection>,
    /// Paging state of the chapters tab
    pub chapters: ChapterPager,
}

/// Loads the series page: details, chapter pager and connections.
///
/// Connections come from a second catalog and are looked up through a
/// cross-reference id. Failing to load them is logged and leaves the list
/// empty; only a failure to load the details fails the page.
///
/// # Examples
///
/// ```no_run
/// use anispace_reader::{load_series_page, catalog::AnispaceProvider};
///
/// let provider = AnispaceProvider::new().unwrap();
/// let page = load_series_page(&provider, "manga-ab123", |_| {}).unwrap();
/// println!("{} ({} chapters)", page.series.title, page.chapters.len());
/// ```
pub fn load_series_page<P, F>(
    provider: &P,
    series_id: &str,
    mut progress_callback: F,
) -> Result<SeriesPage, AnispaceError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(LoadEvent),
{
    progress_callback(LoadEvent::FetchingSeries {
        series_id: series_id.to_string(),
    });
    let series = provider.fetch_series(series_id)?;

    progress_callback(LoadEvent::SeriesFetched {
        title: series.title.clone(),
        chapter_count: series.chapters.len(),
    });

    progress_callback(LoadEvent::FetchingConnections {
        series_id: series_id.to_string(),
    });
    let connections = view::or_default_logged(
        "connections",
        provider
            .resolve_cross_reference(series_id)
            .and_then(|cross_reference| {
                debug!(series_id, %cross_reference, "resolved cross reference");
                provider.fetch_relations(&cross_reference)
            }),
    );
    progress_callback(LoadEvent::ConnectionsFetched {
        count: connections.len(),
    });

    let chapters = ChapterPager::new(series.chapters.clone());

    Ok(SeriesPage {
        series,
        connections,
        chapters,
    })
}

/// Loads a chapter into a reader.
///
/// The chapter images are required. The series' chapter list only feeds
/// previous/next navigation; if it cannot be loaded the reader simply offers
/// no navigation.
pub fn load_reader<P, F>(
    provider: &P,
    series_id: &str,
    chapter: &str,
    mut progress_callback: F,
) -> Result<ChapterReader, AnispaceError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(LoadEvent),
{
    progress_callback(LoadEvent::FetchingChapter {
        series_id: series_id.to_string(),
        chapter: chapter.to_string(),
    });
    let images = provider.fetch_chapter_images(series_id, chapter)?;
    progress_callback(LoadEvent::ChapterFetched {
        page_count: images.images.len(),
    });

    progress_callback(LoadEvent::FetchingChapterList {
        series_id: series_id.to_string(),
    });
    let chapters = view::or_default_logged(
        "chapter list",
        provider.fetch_series(series_id).map(|s| s.chapters),
    );
    let navigator = ChapterNavigator::from_api_order(series_id, chapters, chapter);

    Ok(ChapterReader::new(images.images, navigator))
}

/// Loads a page of search results.
///
/// An empty query is not sent; it yields `None` so the view can ask for one.
pub fn load_search_page<P, F>(
    provider: &P,
    query: &str,
    page: u32,
    mut progress_callback: F,
) -> Result<Option<SearchResults>, AnispaceError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(LoadEvent),
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(None);
    }

    progress_callback(LoadEvent::Searching {
        query: query.to_string(),
        page,
    });
    Ok(Some(provider.search(query, page)?))
}
