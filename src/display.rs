//! Presentation helpers shared by every view.
//!
//! Fallback literals for missing catalog fields, title truncation, slugs and
//! the links cards point at.

use crate::catalog::{Chapter, Connection, MediaType, SearchResult, Series};
use unicode_normalization::UnicodeNormalization;

/// Shown where the API provides no usable title
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Shown where the API provides no image
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Card title length before truncation
pub const CARD_TITLE_LEN: usize = 35;

/// Card subtitle (chapter, relation) length before truncation
pub const CARD_LABEL_LEN: usize = 24;

/// Truncates to `max_len` characters, appending "..." when shortened.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let head: String = text.chars().take(max_len).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Like [`truncate`] but trims whitespace before the ellipsis.
pub fn truncate_trimmed(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let head: String = text.chars().take(max_len).collect();
        format!("{}...", head.trim())
    } else {
        text.to_string()
    }
}

/// Turns a title into a URL slug.
///
/// Lowercases, strips diacritics, drops everything outside `[a-z0-9 -]`,
/// replaces whitespace runs with '-' and collapses repeated dashes.
pub fn slugify(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(word);
    }

    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Title shown on a connection card: romaji, english, native, else "Unknown".
pub fn connection_title(connection: &Connection) -> &str {
    let title = &connection.node.title;
    title
        .romaji
        .as_deref()
        .or(title.english.as_deref())
        .or(title.native.as_deref())
        .unwrap_or(UNKNOWN_TITLE)
}

/// Slug of a connection target, preferring the english title.
///
/// A title with nothing sluggable (native script only) gives an empty slug.
pub fn connection_slug(connection: &Connection) -> String {
    let title = &connection.node.title;
    let safe_title = title
        .english
        .as_deref()
        .or(title.romaji.as_deref())
        .or(title.native.as_deref())
        .unwrap_or("unknown");

    slugify(safe_title)
}

/// Link a connection card points at.
pub fn connection_link(connection: &Connection) -> String {
    match connection.node.media_type {
        MediaType::Anime => format!("/anime/{}", connection.node.id),
        _ => format!("/manga/{}", connection_slug(connection)),
    }
}

/// Call to action on a connection card.
pub fn connection_action(connection: &Connection) -> &'static str {
    match connection.node.media_type {
        MediaType::Anime => "Watch Now",
        _ => "Read Now",
    }
}

/// Cover image of a connection: large, medium, else the placeholder.
pub fn connection_cover(connection: &Connection) -> &str {
    connection
        .node
        .cover_large
        .as_deref()
        .or(connection.node.cover_medium.as_deref())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// Cover image of a series, else the placeholder.
pub fn series_cover(series: &Series) -> &str {
    series.cover_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
}

/// Relative href of a search hit: the part of its link after "/manga/".
///
/// Falls back to the result id when the link has no such segment.
pub fn search_result_href(result: &SearchResult) -> &str {
    match result.link.split_once("/manga/") {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => &result.id,
    }
}

/// Upload time of a chapter as one line.
pub fn upload_time(chapter: &Chapter) -> String {
    chapter.uploaded.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConnectionNode, TitleVariants};

    fn connection(media_type: MediaType, title: TitleVariants) -> Connection {
        Connection {
            relation: "ADAPTATION".to_string(),
            node: ConnectionNode {
                id: "21".to_string(),
                media_type,
                title,
                cover_medium: None,
                cover_large: None,
            },
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 35), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ñandú ñandú", 5), "ñandú...");
        assert_eq!(truncate_trimmed("abc def", 4), "abc...");
        assert_eq!(truncate("abc def", 4), "abc ...");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Attack on Titan"), "attack-on-titan");
        assert_eq!(slugify("  Pokémon: Adventures!  "), "pokemon-adventures");
        assert_eq!(slugify("A -- B"), "a-b");
        assert_eq!(slugify("21st Century Boys"), "21st-century-boys");
        assert_eq!(slugify("ワンピース"), "");
    }

    #[test]
    fn test_connection_title_and_slug_fallbacks() {
        let full = connection(
            MediaType::Manga,
            TitleVariants {
                romaji: Some("Shingeki no Kyojin".to_string()),
                english: Some("Attack on Titan".to_string()),
                native: Some("進撃の巨人".to_string()),
            },
        );
        assert_eq!(connection_title(&full), "Shingeki no Kyojin");
        assert_eq!(connection_slug(&full), "attack-on-titan");
        assert_eq!(connection_link(&full), "/manga/attack-on-titan");
        assert_eq!(connection_action(&full), "Read Now");

        let native_only = connection(
            MediaType::Manga,
            TitleVariants {
                native: Some("進撃の巨人".to_string()),
                ..TitleVariants::default()
            },
        );
        assert_eq!(connection_title(&native_only), "進撃の巨人");
        assert_eq!(connection_slug(&native_only), "");
        assert_eq!(connection_link(&native_only), "/manga/");

        let empty = connection(MediaType::Manga, TitleVariants::default());
        assert_eq!(connection_title(&empty), UNKNOWN_TITLE);
        assert_eq!(connection_slug(&empty), "unknown");
        assert_eq!(connection_cover(&empty), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_anime_connection_links_by_id() {
        let anime = connection(MediaType::Anime, TitleVariants::default());
        assert_eq!(connection_link(&anime), "/anime/21");
        assert_eq!(connection_action(&anime), "Watch Now");
    }

    #[test]
    fn test_search_result_href() {
        let mut result = SearchResult {
            id: "manga-xy".to_string(),
            title: "X".to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            link: "https://site.example/manga/manga-xy".to_string(),
            latest_chapter: "3".to_string(),
        };
        assert_eq!(search_result_href(&result), "manga-xy");
        result.link = String::new();
        assert_eq!(search_result_href(&result), "manga-xy");
    }

    #[test]
    fn test_upload_time() {
        let chapter = Chapter {
            number: "1".to_string(),
            name: "One".to_string(),
            uploaded: vec!["Jan 01,2024".to_string(), "10:00".to_string()],
        };
        assert_eq!(upload_time(&chapter), "Jan 01,2024 10:00");
    }
}
