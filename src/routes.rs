//! Client-side navigation routes.
//!
//! Every view is addressed by a path such as `/manga/{id}/{chapter}`. Routes
//! format to those paths and parse back from them, percent-encoding ids and
//! queries the way browsers' `encodeURIComponent` does.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Characters escaped in a single path segment or query value.
///
/// Matches `encodeURIComponent`: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a single path segment or query value.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Errors that can occur while parsing a route
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// The path does not match any known route
    #[error("Unknown route: {0}")]
    Unknown(String),

    /// A segment is not valid UTF-8 after percent-decoding
    #[error("Invalid encoding in route segment: {0}")]
    InvalidEncoding(String),

    /// The search page parameter is not a positive number
    #[error("Invalid page number: {0}")]
    InvalidPage(String),
}

/// A navigable view.
///
/// The literal segments `search` and `genre` take precedence when parsing, so
/// a series with id `search` or a reader route for series `genre` does not
/// survive a format/parse round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Series detail page
    Series { id: String },
    /// Chapter reader
    Reader { id: String, chapter: String },
    /// Manga search results; an empty query shows the search prompt
    Search { query: String, page: u32 },
    /// Series listed under a genre
    Genre { slug: String },
    /// Anime detail page (link target of anime connections)
    Anime { id: String },
    /// Anime search results
    AnimeSearch { query: String },
}

impl Route {
    pub fn series(id: impl Into<String>) -> Self {
        Route::Series { id: id.into() }
    }

    pub fn reader(id: impl Into<String>, chapter: impl Into<String>) -> Self {
        Route::Reader {
            id: id.into(),
            chapter: chapter.into(),
        }
    }

    pub fn search(query: impl Into<String>, page: u32) -> Self {
        Route::Search {
            query: query.into(),
            page: page.max(1),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Series { id } => write!(f, "/manga/{}", encode_component(id)),
            Route::Reader { id, chapter } => write!(
                f,
                "/manga/{}/{}",
                encode_component(id),
                encode_component(chapter)
            ),
            Route::Search { query, page } => write!(
                f,
                "/manga/search?query={}&page={}",
                encode_component(query),
                page
            ),
            Route::Genre { slug } => write!(f, "/manga/genre/{}", encode_component(slug)),
            Route::Anime { id } => write!(f, "/anime/{}", encode_component(id)),
            Route::AnimeSearch { query } => {
                write!(f, "/anime/search?query={}", encode_component(query))
            }
        }
    }
}

fn decode_segment(segment: &str) -> Result<String, RouteError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| RouteError::InvalidEncoding(segment.to_string()))
}

impl FromStr for Route {
    type Err = RouteError;

    /// Parses a path with optional query string, e.g. `/manga/search?query=x`.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || RouteError::Unknown(path.to_string());

        // Only used to split path and query; the host is irrelevant
        let base = Url::parse("http://localhost/").map_err(|_| unknown())?;
        let url = base.join(path).map_err(|_| unknown())?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let query_param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        match segments.as_slice() {
            ["manga", "search"] => {
                let page = match query_param("page") {
                    None => 1,
                    Some(raw) if raw.is_empty() => 1,
                    Some(raw) => match raw.parse::<u32>() {
                        Ok(p) if p >= 1 => p,
                        _ => return Err(RouteError::InvalidPage(raw)),
                    },
                };
                Ok(Route::Search {
                    query: query_param("query").unwrap_or_default(),
                    page,
                })
            }
            ["manga", "genre", slug] => Ok(Route::Genre {
                slug: decode_segment(slug)?,
            }),
            ["manga", id] => Ok(Route::Series {
                id: decode_segment(id)?,
            }),
            ["manga", id, chapter] => Ok(Route::Reader {
                id: decode_segment(id)?,
                chapter: decode_segment(chapter)?,
            }),
            ["anime", "search"] => Ok(Route::AnimeSearch {
                query: query_param("query").unwrap_or_default(),
            }),
            ["anime", id] => Ok(Route::Anime {
                id: decode_segment(id)?,
            }),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_matches_browser() {
        assert_eq!(encode_component("manga-ab123"), "manga-ab123");
        assert_eq!(encode_component("one piece"), "one%20piece");
        assert_eq!(encode_component("a/b?c&d"), "a%2Fb%3Fc%26d");
        assert_eq!(encode_component("it's (ok)!"), "it's%20(ok)!");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn test_format_routes() {
        assert_eq!(Route::series("manga-ab123").to_string(), "/manga/manga-ab123");
        assert_eq!(Route::reader("manga-ab123", "12.5").to_string(), "/manga/manga-ab123/12.5");
        assert_eq!(
            Route::search("one piece", 2).to_string(),
            "/manga/search?query=one%20piece&page=2"
        );
        assert_eq!(Route::search("x", 0).to_string(), "/manga/search?query=x&page=1");
        assert_eq!(
            Route::Genre { slug: "slice-of-life".to_string() }.to_string(),
            "/manga/genre/slice-of-life"
        );
        assert_eq!(Route::Anime { id: "21".to_string() }.to_string(), "/anime/21");
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!("/manga/abc".parse(), Ok(Route::series("abc")));
        assert_eq!("/manga/abc/3".parse(), Ok(Route::reader("abc", "3")));
        assert_eq!("/manga/abc/3/".parse(), Ok(Route::reader("abc", "3")));
        assert_eq!("/manga/search?query=one%20piece&page=4".parse(), Ok(Route::search("one piece", 4)));
        assert_eq!("/manga/search?query=naruto".parse(), Ok(Route::search("naruto", 1)));
        assert_eq!("/manga/search".parse(), Ok(Route::search("", 1)));
        assert_eq!(
            "/manga/genre/action".parse(),
            Ok(Route::Genre { slug: "action".to_string() })
        );
        assert_eq!(
            "/anime/search?query=bleach".parse(),
            Ok(Route::AnimeSearch { query: "bleach".to_string() })
        );
        assert_eq!("/anime/21".parse(), Ok(Route::Anime { id: "21".to_string() }));
    }

    #[test]
    fn test_parse_rejects_unknown_and_bad_pages() {
        assert!(matches!("/".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!("/novel/abc".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!(
            "/manga/search?query=x&page=0".parse::<Route>(),
            Err(RouteError::InvalidPage(_))
        ));
        assert!(matches!(
            "/manga/search?query=x&page=two".parse::<Route>(),
            Err(RouteError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_reserved_characters_survive_round_trip() {
        let route = Route::reader("a/b c", "1");
        assert_eq!(route.to_string(), "/manga/a%2Fb%20c/1");
        assert_eq!(route.to_string().parse(), Ok(route));
    }

    #[test]
    fn test_literal_segments_shadow_ids() {
        assert_eq!(
            Route::series("search").to_string().parse(),
            Ok(Route::search("", 1))
        );
        assert_eq!(
            Route::reader("genre", "action").to_string().parse(),
            Ok(Route::Genre {
                slug: "action".to_string()
            })
        );
        assert_eq!(
            Route::reader("search", "1").to_string().parse(),
            Ok(Route::reader("search", "1"))
        );
    }
}
