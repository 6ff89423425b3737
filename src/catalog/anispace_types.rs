/// Anispace API response types for deserialization.
///
/// These structures mirror the JSON response format of the Anispace API.
/// Most fields are optional because the API omits them freely.
use serde::Deserialize;

/// A value the API sends either as a JSON string or as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    pub fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

/// Upload time of a chapter, a single string or several parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UploadTime {
    Single(String),
    Many(Vec<String>),
}

impl UploadTime {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            UploadTime::Single(s) => vec![s],
            UploadTime::Many(v) => v,
        }
    }
}

/// Response of `GET /manga/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceManga {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub authors: Option<Vec<String>>,
    pub status: Option<String>,
    pub genres: Option<Vec<String>>,
    pub year: Option<i32>,
    pub updated_on: Option<Vec<String>>,
    pub chapters: Option<Vec<AnispaceChapter>>,
}

/// A chapter entry inside a manga response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceChapter {
    pub chapter_name: Option<String>,
    pub chapter_number: Option<StringOrNumber>,
    pub time_of_upload: Option<UploadTime>,
}

/// Response of `GET /manga/{id}/chapter/{chapter}`.
#[derive(Debug, Deserialize)]
pub(super) struct AnispaceChapterImages {
    pub images: Option<Vec<String>>,
}

/// Response of `GET /manga/search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceSearchResponse {
    pub query: Option<String>,
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    pub page_limit: Option<u32>,
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<AnispaceMangaResult>,
}

/// A search hit or popular list entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceMangaResult {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub latest_chapter: Option<StringOrNumber>,
}

/// Response of `GET /manga/popular`.
#[derive(Debug, Deserialize)]
pub(super) struct AnispacePopularResponse {
    #[serde(default)]
    pub results: Vec<AnispaceMangaResult>,
}

/// An entry of `GET /manga/genres`.
#[derive(Debug, Deserialize)]
pub(super) struct AnispaceGenre {
    pub id: String,
    pub slug: String,
}

/// Response of `GET /connections/manga?kakalot={id}`.
#[derive(Debug, Deserialize)]
pub(super) struct AnispaceCrossReference {
    pub id: Option<StringOrNumber>,
}

/// An entry of `GET /manga/{id}/relations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceRelation {
    pub relation_type: Option<String>,
    pub node: Option<AnispaceRelationNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnispaceRelationNode {
    pub id: Option<StringOrNumber>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub title: Option<AnispaceTitle>,
    pub cover_image: Option<AnispaceCoverImage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnispaceTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AnispaceCoverImage {
    pub medium: Option<String>,
    pub large: Option<String>,
}
