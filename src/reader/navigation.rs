//! Previous/next chapter navigation for the reader.

use crate::catalog::{Chapter, parse_chapter_number};
use crate::routes::Route;

/// Locates the open chapter in a series' chapter list.
///
/// The list is held in reading order (oldest first). The API delivers it
/// newest first, so [`ChapterNavigator::from_api_order`] reverses it.
#[derive(Debug, Clone)]
pub struct ChapterNavigator {
    series_id: String,
    chapters: Vec<Chapter>,
    current: String,
    current_index: Option<usize>,
}

impl ChapterNavigator {
    /// Builds a navigator from a chapter list in API order (newest first).
    pub fn from_api_order(series_id: &str, mut chapters: Vec<Chapter>, current: &str) -> Self {
        chapters.reverse();
        Self::from_reading_order(series_id, chapters, current)
    }

    /// Builds a navigator from a chapter list already in reading order.
    pub fn from_reading_order(series_id: &str, chapters: Vec<Chapter>, current: &str) -> Self {
        let current_index = parse_chapter_number(current)
            .and_then(|wanted| chapters.iter().position(|c| c.numeric() == Some(wanted)));

        Self {
            series_id: series_id.to_string(),
            chapters,
            current: current.to_string(),
            current_index,
        }
    }

    /// A navigator without a chapter list; it never offers navigation.
    pub fn empty(series_id: &str, current: &str) -> Self {
        Self::from_reading_order(series_id, Vec::new(), current)
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    /// The chapter number the reader was opened with.
    pub fn current_number(&self) -> &str {
        &self.current
    }

    /// Chapters in reading order, for a chapter picker.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Position of the open chapter in reading order, if it is listed.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&Chapter> {
        self.current_index.map(|i| &self.chapters[i])
    }

    /// The chapter before the open one.
    pub fn previous(&self) -> Option<&Chapter> {
        match self.current_index {
            Some(i) if i > 0 => self.chapters.get(i - 1),
            _ => None,
        }
    }

    /// The chapter after the open one.
    ///
    /// When the open chapter is not in the list, this is the first chapter.
    pub fn next(&self) -> Option<&Chapter> {
        match self.current_index {
            Some(i) => self.chapters.get(i + 1),
            None => self.chapters.first(),
        }
    }

    /// Reader route for a chapter of this series.
    pub fn route_to(&self, chapter_number: &str) -> Route {
        Route::reader(self.series_id.clone(), chapter_number)
    }

    pub fn previous_route(&self) -> Option<Route> {
        self.previous().map(|c| self.route_to(&c.number))
    }

    pub fn next_route(&self) -> Option<Route> {
        self.next().map(|c| self.route_to(&c.number))
    }
}
