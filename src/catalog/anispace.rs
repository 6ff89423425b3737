/// Anispace catalog provider implementation.
use super::anispace_types::{
    AnispaceChapter, AnispaceChapterImages, AnispaceCrossReference, AnispaceGenre, AnispaceManga,
    AnispaceMangaResult, AnispacePopularResponse, AnispaceRelation, AnispaceSearchResponse,
};
use super::{
    CatalogError, CatalogProvider, Chapter, ChapterImages, Connection, ConnectionNode, Genre,
    MediaType, PopularEntry, SearchResult, SearchResults, Series, TitleVariants,
};
use crate::config::ClientConfig;
use crate::display::{PLACEHOLDER_IMAGE, UNKNOWN_TITLE};
use crate::routes::encode_component;
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Catalog provider for the Anispace API.
///
/// Every request is a plain GET that asks intermediaries not to cache
/// (`Cache-Control: no-store`). Responses are converted into the crate's
/// catalog records with fallbacks for missing fields.
pub struct AnispaceProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl AnispaceProvider {
    /// Creates a provider for the public API with default settings.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a provider from an explicit configuration.
    pub fn with_config(config: &ClientConfig) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Performs a GET against `path` (relative to the base URL) and decodes JSON.
    ///
    /// `what` names the requested resource for not-found errors.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        if response.status() == 404 {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        response
            .json()
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Converts a chapter entry; entries without a number yield None.
    fn convert_chapter(chapter: AnispaceChapter) -> Option<Chapter> {
        let number = chapter
            .chapter_number
            .map(|n| n.into_string().trim().to_string())
            .filter(|n| !n.is_empty())?;
        Some(Chapter {
            name: chapter
                .chapter_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("Chapter {}", number)),
            number,
            uploaded: chapter
                .time_of_upload
                .map(|t| t.into_vec())
                .unwrap_or_default(),
        })
    }

    /// Converts a manga response to a Series, filling in fallbacks.
    fn convert_series(requested_id: &str, manga: AnispaceManga) -> Series {
        Series {
            id: manga.id.unwrap_or_else(|| requested_id.to_string()),
            title: manga
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: manga
                .description
                .map(|d| nanohtml2text::html2text(&d).trim().to_string())
                .filter(|d| !d.is_empty()),
            cover_url: manga.image.filter(|i| !i.is_empty()),
            status: manga.status,
            genres: manga.genres.unwrap_or_default(),
            authors: manga.authors.unwrap_or_default(),
            year: manga.year,
            updated_on: manga.updated_on.unwrap_or_default(),
            chapters: manga
                .chapters
                .unwrap_or_default()
                .into_iter()
                .filter_map(Self::convert_chapter)
                .collect(),
        }
    }

    fn result_id(result: &AnispaceMangaResult) -> Option<String> {
        result
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Converts a search hit; hits without an id yield None.
    fn convert_search_result(result: AnispaceMangaResult) -> Option<SearchResult> {
        let id = Self::result_id(&result)?;
        Some(SearchResult {
            title: result.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            image: result
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            link: result.link.unwrap_or_default(),
            latest_chapter: result
                .latest_chapter
                .map(|c| c.into_string())
                .unwrap_or_default(),
            id,
        })
    }

    fn convert_popular_entry(result: AnispaceMangaResult) -> Option<PopularEntry> {
        let id = Self::result_id(&result)?;
        Some(PopularEntry {
            title: result.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: result.description.unwrap_or_default(),
            image: result
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            latest_chapter: result
                .latest_chapter
                .map(|c| c.into_string())
                .unwrap_or_default(),
            id,
        })
    }

    /// Converts a relation entry; entries without a usable node yield None.
    fn convert_relation(relation: AnispaceRelation) -> Option<Connection> {
        let node = relation.node?;
        let title = node
            .title
            .map(|t| TitleVariants {
                romaji: t.romaji.filter(|s| !s.is_empty()),
                english: t.english.filter(|s| !s.is_empty()),
                native: t.native.filter(|s| !s.is_empty()),
            })
            .unwrap_or_default();
        let (cover_medium, cover_large) = match node.cover_image {
            Some(cover) => (cover.medium, cover.large),
            None => (None, None),
        };

        Some(Connection {
            relation: relation.relation_type.unwrap_or_default(),
            node: ConnectionNode {
                id: node.id.map(|id| id.into_string()).unwrap_or_default(),
                media_type: MediaType::from_api(node.media_type.as_deref().unwrap_or("MANGA")),
                title,
                cover_medium,
                cover_large,
            },
        })
    }
}

impl CatalogProvider for AnispaceProvider {
    fn fetch_series(&self, series_id: &str) -> Result<Series, CatalogError> {
        let path = format!("/manga/{}", encode_component(series_id));
        let manga: AnispaceManga =
            self.get_json(&path, &[], &format!("series '{}'", series_id))?;
        Ok(Self::convert_series(series_id, manga))
    }

    fn fetch_chapter_images(
        &self,
        series_id: &str,
        chapter: &str,
    ) -> Result<ChapterImages, CatalogError> {
        let path = format!(
            "/manga/{}/chapter/{}",
            encode_component(series_id),
            encode_component(chapter)
        );
        let response: AnispaceChapterImages = self.get_json(
            &path,
            &[],
            &format!("chapter {} of '{}'", chapter, series_id),
        )?;

        let images = response.images.ok_or_else(|| {
            CatalogError::InvalidData("No images in chapter response".to_string())
        })?;

        Ok(ChapterImages {
            series_id: series_id.to_string(),
            chapter: chapter.to_string(),
            images,
        })
    }

    fn search(&self, query: &str, page: u32) -> Result<SearchResults, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::InvalidQuery(
                "search query must not be empty".to_string(),
            ));
        }
        let page = page.max(1);
        let page_param = page.to_string();

        let response: AnispaceSearchResponse = self.get_json(
            "/manga/search",
            &[("query", query), ("page", &page_param)],
            &format!("search '{}'", query),
        )?;

        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .filter_map(Self::convert_search_result)
            .collect();

        Ok(SearchResults {
            query: response.query.unwrap_or_else(|| query.to_string()),
            current_page: response.current_page.unwrap_or(page),
            has_next_page: response.has_next_page,
            page_limit: response.page_limit.unwrap_or(page),
            total_results: response.total_results.unwrap_or(results.len() as u64),
            results,
        })
    }

    fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let genres: Vec<AnispaceGenre> = self.get_json("/manga/genres", &[], "genre list")?;
        Ok(genres
            .into_iter()
            .map(|g| Genre {
                id: g.id,
                slug: g.slug,
            })
            .collect())
    }

    fn fetch_popular(&self) -> Result<Vec<PopularEntry>, CatalogError> {
        let response: AnispacePopularResponse =
            self.get_json("/manga/popular", &[], "popular list")?;
        Ok(response
            .results
            .into_iter()
            .filter_map(Self::convert_popular_entry)
            .collect())
    }

    fn resolve_cross_reference(&self, series_id: &str) -> Result<String, CatalogError> {
        let response: AnispaceCrossReference = self.get_json(
            "/connections/manga",
            &[("kakalot", series_id)],
            &format!("cross reference for '{}'", series_id),
        )?;

        response
            .id
            .map(|id| id.into_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::NotFound(format!("cross reference for '{}'", series_id)))
    }

    fn fetch_relations(&self, cross_reference_id: &str) -> Result<Vec<Connection>, CatalogError> {
        let path = format!("/manga/{}/relations", encode_component(cross_reference_id));
        let relations: Vec<Option<AnispaceRelation>> = self.get_json(
            &path,
            &[],
            &format!("relations of '{}'", cross_reference_id),
        )?;

        Ok(relations
            .into_iter()
            .flatten()
            .filter_map(Self::convert_relation)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves one canned HTTP response on a local port.
    ///
    /// Returns the provider's base URL and a handle yielding the raw request head.
    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (format!("http://{}/api", addr), handle)
    }

    fn provider_for(base_url: &str) -> AnispaceProvider {
        let config = ClientConfig::with_base_url(base_url).unwrap();
        AnispaceProvider::with_config(&config).unwrap()
    }

    #[test]
    fn test_request_encodes_id_and_disables_caching() {
        let (base_url, server) = serve_once("200 OK", r#"{"title": "Spaced"}"#);
        let series = provider_for(&base_url).fetch_series("a b").unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("get /api/manga/a%20b http/1.1\r\n"));
        assert!(request.contains("\r\ncache-control: no-store\r\n"));
        assert_eq!(series.id, "a b");
        assert_eq!(series.title, "Spaced");
    }

    #[test]
    fn test_search_sends_query_and_page() {
        let (base_url, server) = serve_once("200 OK", r#"{"results": [{"id": "x"}]}"#);
        let results = provider_for(&base_url).search(" one piece ", 0).unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("get /api/manga/search?query=one+piece&page=1 http/1.1"));
        assert_eq!(results.current_page, 1);
        assert_eq!(results.results.len(), 1);
    }

    #[test]
    fn test_not_found_status() {
        let (base_url, server) = serve_once("404 Not Found", "");
        let result = provider_for(&base_url).fetch_series("a b");
        server.join().unwrap();

        match result {
            Err(CatalogError::NotFound(what)) => assert_eq!(what, "series 'a b'"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_other_error_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", "{}");
        let result = provider_for(&base_url).fetch_genres();
        server.join().unwrap();

        match result {
            Err(CatalogError::HttpStatus { status, url }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/manga/genres"));
            }
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_chapters_without_number_are_dropped() {
        let json = r#"{
            "chapters": [
                {"chapterNumber": "1"},
                {"chapterName": "broken"},
                {"chapterName": "also broken", "chapterNumber": null},
                {"chapterNumber": "  "},
                {"chapterNumber": 3}
            ]
        }"#;
        let manga: AnispaceManga = serde_json::from_str(json).unwrap();
        let series = AnispaceProvider::convert_series("s", manga);

        let numbers: Vec<&str> = series.chapters.iter().map(|c| c.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "3"]);
    }

    #[test]
    fn test_results_without_id_are_dropped() {
        let json = r#"{
            "results": [
                {"title": "No id"},
                {"id": null, "title": "Null id"},
                {"id": "kept", "title": "Kept"}
            ]
        }"#;
        let response: AnispacePopularResponse = serde_json::from_str(json).unwrap();
        let entries: Vec<PopularEntry> = response
            .results
            .into_iter()
            .filter_map(AnispaceProvider::convert_popular_entry)
            .collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "kept");

        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"results": [{"title": "No id"}, {"id": "b", "title": "B"}], "totalResults": 2}"#,
        );
        let results = provider_for(&base_url).search("b", 1).unwrap();
        server.join().unwrap();
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].id, "b");
        assert_eq!(results.total_results, 2);
    }

    #[test]
    fn test_convert_series_with_fallbacks() {
        let json = r#"{
            "title": "",
            "description": "<p>A tale of two</p>",
            "chapters": [
                {"chapterName": "The Start", "chapterNumber": "1", "timeOfUpload": "Jan 01,2024"},
                {"chapterName": "", "chapterNumber": 2, "timeOfUpload": ["Feb 02,2024", "10:00"]},
                {"chapterNumber": "2.5"}
            ]
        }"#;
        let manga: AnispaceManga = serde_json::from_str(json).unwrap();
        let series = AnispaceProvider::convert_series("some-id", manga);

        assert_eq!(series.id, "some-id");
        assert_eq!(series.title, UNKNOWN_TITLE);
        assert_eq!(series.description.as_deref(), Some("A tale of two"));
        assert_eq!(series.cover_url, None);
        assert!(series.genres.is_empty());
        assert_eq!(series.chapters.len(), 3);
        assert_eq!(series.chapters[0].name, "The Start");
        assert_eq!(series.chapters[0].uploaded, vec!["Jan 01,2024"]);
        assert_eq!(series.chapters[1].number, "2");
        assert_eq!(series.chapters[1].name, "Chapter 2");
        assert_eq!(series.chapters[1].uploaded, vec!["Feb 02,2024", "10:00"]);
        assert!(series.chapters[2].uploaded.is_empty());
    }

    #[test]
    fn test_convert_full_series() {
        let json = r#"{
            "id": "manga-ab123",
            "title": "Some Title",
            "image": "https://img.example/cover.jpg",
            "authors": ["A", "B"],
            "status": "Ongoing",
            "genres": ["Action", "Drama"],
            "year": 2019,
            "updatedOn": ["Mar 03,2024", "08:00 AM"],
            "chapters": []
        }"#;
        let manga: AnispaceManga = serde_json::from_str(json).unwrap();
        let series = AnispaceProvider::convert_series("other", manga);

        assert_eq!(series.id, "manga-ab123");
        assert_eq!(series.title, "Some Title");
        assert_eq!(series.authors, vec!["A", "B"]);
        assert_eq!(series.year, Some(2019));
        assert_eq!(series.status.as_deref(), Some("Ongoing"));
        assert_eq!(series.updated_on.len(), 2);
        assert_eq!(series.description, None);
    }

    #[test]
    fn test_convert_search_results() {
        let json = r#"{
            "query": "one",
            "currentPage": 2,
            "hasNextPage": true,
            "pageLimit": 20,
            "totalResults": 400,
            "results": [
                {"id": "a", "title": "A", "image": "", "link": "https://x/manga/a", "latestChapter": 1100},
                {"id": "b", "latestChapter": "12.5"}
            ]
        }"#;
        let response: AnispaceSearchResponse = serde_json::from_str(json).unwrap();
        let results: Vec<SearchResult> = response
            .results
            .into_iter()
            .filter_map(AnispaceProvider::convert_search_result)
            .collect();

        assert_eq!(results[0].latest_chapter, "1100");
        assert_eq!(results[0].image, PLACEHOLDER_IMAGE);
        assert_eq!(results[1].title, UNKNOWN_TITLE);
        assert_eq!(results[1].latest_chapter, "12.5");
        assert_eq!(results[1].link, "");
    }

    #[test]
    fn test_convert_relations_drops_missing_nodes() {
        let json = r#"[
            null,
            {"relationType": "SEQUEL", "node": null},
            {"relationType": "ADAPTATION", "node": {
                "id": 21,
                "type": "ANIME",
                "title": {"romaji": "Wan Pisu", "english": "One Piece", "native": null},
                "coverImage": {"medium": "m.jpg", "large": "l.jpg"}
            }},
            {"relationType": "SIDE_STORY", "node": {"id": "99"}}
        ]"#;
        let relations: Vec<Option<AnispaceRelation>> = serde_json::from_str(json).unwrap();
        let connections: Vec<Connection> = relations
            .into_iter()
            .flatten()
            .filter_map(AnispaceProvider::convert_relation)
            .collect();

        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].relation, "ADAPTATION");
        assert_eq!(connections[0].node.id, "21");
        assert_eq!(connections[0].node.media_type, MediaType::Anime);
        assert_eq!(connections[0].node.title.english.as_deref(), Some("One Piece"));
        assert_eq!(connections[0].node.title.native, None);
        assert_eq!(connections[0].node.cover_large.as_deref(), Some("l.jpg"));
        assert_eq!(connections[1].node.media_type, MediaType::Manga);
        assert_eq!(connections[1].node.title, TitleVariants::default());
    }

    #[test]
    fn test_cross_reference_accepts_number() {
        let parsed: AnispaceCrossReference = serde_json::from_str(r#"{"id": 30013}"#).unwrap();
        assert_eq!(parsed.id.map(|id| id.into_string()).as_deref(), Some("30013"));
    }

    #[test]
    fn test_search_rejects_empty_query() {
        let provider = AnispaceProvider::new().unwrap();
        assert!(matches!(
            provider.search("   ", 1),
            Err(CatalogError::InvalidQuery(_))
        ));
    }
}
