/// Data structures and traits for manga catalog retrieval.
///
/// This module provides structures to represent series, chapters, search
/// results and related catalog entries as the reading front-end sees them,
/// as well as the trait implemented by catalog providers.
mod anispace;
mod anispace_types;

pub use anispace::AnispaceProvider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during catalog retrieval operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the catalog API failed before a response arrived
    #[error("Request failed: {0}")]
    RequestError(String),

    /// The API answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Failed to parse the API's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested resource was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A query the API would reject was not sent
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The API returned invalid or unexpected data
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// A single chapter entry of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number as delivered by the API, may be fractional ("12.5")
    pub number: String,
    /// Display name of the chapter
    pub name: String,
    /// Upload timestamps, one or more human readable strings
    pub uploaded: Vec<String>,
}

impl Chapter {
    /// Numeric value of the chapter number, if it parses.
    pub fn numeric(&self) -> Option<f64> {
        parse_chapter_number(&self.number)
    }
}

/// Parses a chapter number the way the reader compares them.
///
/// "12", "12.0" and " 12 " all denote the same chapter.
pub fn parse_chapter_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A manga series with metadata and its chapter list.
///
/// Chapters are kept in the order the API delivers them (newest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub title: String,
    /// Plain text description
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: Option<String>,
    pub genres: Vec<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub updated_on: Vec<String>,
    pub chapters: Vec<Chapter>,
}

/// The ordered page images of one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterImages {
    pub series_id: String,
    pub chapter: String,
    pub images: Vec<String>,
}

/// Media type of a connection target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Anime,
    Manga,
    Other(String),
}

impl MediaType {
    pub fn from_api(raw: &str) -> Self {
        match raw {
            "ANIME" => MediaType::Anime,
            "MANGA" => MediaType::Manga,
            other => MediaType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MediaType::Anime => "ANIME",
            MediaType::Manga => "MANGA",
            MediaType::Other(s) => s,
        }
    }
}

/// Title variants of a connection target. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleVariants {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

/// The catalog entry a connection points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionNode {
    pub id: String,
    pub media_type: MediaType,
    pub title: TitleVariants,
    pub cover_medium: Option<String>,
    pub cover_large: Option<String>,
}

/// A typed relation (adaptation, sequel, ...) to another catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub relation: String,
    pub node: ConnectionNode,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub image: String,
    pub link: String,
    pub latest_chapter: String,
}

/// One page of search results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub current_page: u32,
    pub has_next_page: bool,
    /// Number of result pages the API reports
    pub page_limit: u32,
    pub total_results: u64,
    pub results: Vec<SearchResult>,
}

/// A genre with its display id and URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub slug: String,
}

/// An entry of the popular list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub latest_chapter: String,
}

/// Trait for catalog providers the reading front-end fetches from.
///
/// All operations are read-only; providers do not cache.
pub trait CatalogProvider {
    /// Fetches series details including the chapter list.
    fn fetch_series(&self, series_id: &str) -> Result<Series, CatalogError>;

    /// Fetches the ordered page image URLs of a chapter.
    fn fetch_chapter_images(
        &self,
        series_id: &str,
        chapter: &str,
    ) -> Result<ChapterImages, CatalogError>;

    /// Searches the catalog. `page` is 1-based.
    fn search(&self, query: &str, page: u32) -> Result<SearchResults, CatalogError>;

    /// Fetches the list of genres.
    fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Fetches the popular list.
    fn fetch_popular(&self) -> Result<Vec<PopularEntry>, CatalogError>;

    /// Resolves the id the relations catalog uses for a reading catalog id.
    fn resolve_cross_reference(&self, series_id: &str) -> Result<String, CatalogError>;

    /// Fetches relations of a relations catalog entry.
    ///
    /// Entries without a target node are dropped.
    fn fetch_relations(&self, cross_reference_id: &str) -> Result<Vec<Connection>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapter_number() {
        assert_eq!(parse_chapter_number("12"), Some(12.0));
        assert_eq!(parse_chapter_number("12.5"), Some(12.5));
        assert_eq!(parse_chapter_number(" 7 "), Some(7.0));
        assert_eq!(parse_chapter_number("extra"), None);
        assert_eq!(parse_chapter_number("NaN"), None);
    }

    #[test]
    fn test_media_type_from_api() {
        assert_eq!(MediaType::from_api("ANIME"), MediaType::Anime);
        assert_eq!(MediaType::from_api("MANGA"), MediaType::Manga);
        assert_eq!(
            MediaType::from_api("NOVEL"),
            MediaType::Other("NOVEL".to_string())
        );
        assert_eq!(MediaType::from_api("NOVEL").label(), "NOVEL");
    }
}
