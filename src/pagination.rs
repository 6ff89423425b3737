//! Client-side pagination for chapter lists.
//!
//! [`page_window`] computes the elided row of page controls shown under a
//! list; [`ChapterPager`] holds the list ordering and current page of a
//! series' chapter tab.

use crate::catalog::Chapter;

/// Chapters shown per page on the series page
pub const DEFAULT_PER_PAGE: usize = 10;

/// Pages shown on each side of the current page
pub const DEFAULT_SPAN: usize = 1;

/// One control in a pagination row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A selectable page number (1-based)
    Page(usize),
    /// Elision marker for skipped pages
    Dots,
}

/// Computes the pagination window around `current`.
///
/// The window always starts with page 1 and, when `total > 1`, ends with
/// `total`. Pages within `span` of `current` are listed in between, and a
/// [`PageItem::Dots`] marks each gap. The result is a pure function of the
/// arguments.
///
/// A `total` of 0 is treated as 1.
pub fn page_window(current: usize, total: usize, span: usize) -> Vec<PageItem> {
    let total = total.max(1);
    let mut pages = Vec::new();

    // Inner range is [max(2, c - s), min(t - 1, c + s)], possibly empty
    let start = current.saturating_sub(span).max(2);
    let end = current.saturating_add(span).min(total - 1);

    pages.push(PageItem::Page(1));
    if start > 2 {
        pages.push(PageItem::Dots);
    }
    for page in start..=end {
        pages.push(PageItem::Page(page));
    }
    if end < total - 1 {
        pages.push(PageItem::Dots);
    }
    if total > 1 {
        pages.push(PageItem::Page(total));
    }

    pages
}

/// Order chapters are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterOrder {
    /// As delivered by the API (newest first)
    #[default]
    NewestFirst,
    /// Reversed (oldest first)
    OldestFirst,
}

impl ChapterOrder {
    pub fn toggled(self) -> Self {
        match self {
            ChapterOrder::NewestFirst => ChapterOrder::OldestFirst,
            ChapterOrder::OldestFirst => ChapterOrder::NewestFirst,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChapterOrder::NewestFirst => "Newest first",
            ChapterOrder::OldestFirst => "Oldest first",
        }
    }
}

/// Paging state of a chapter list.
///
/// The current page always stays within `1..=total_pages()`, also after the
/// list is replaced by a shorter one.
#[derive(Debug, Clone)]
pub struct ChapterPager {
    chapters: Vec<Chapter>,
    order: ChapterOrder,
    page: usize,
    per_page: usize,
}

impl ChapterPager {
    /// Creates a pager over chapters in API order, positioned on page 1.
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self::with_per_page(chapters, DEFAULT_PER_PAGE)
    }

    /// Creates a pager with a custom page size. A size of 0 is treated as 1.
    pub fn with_per_page(chapters: Vec<Chapter>, per_page: usize) -> Self {
        Self {
            chapters,
            order: ChapterOrder::default(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Replaces the chapter list, clamping the current page.
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) {
        self.chapters = chapters;
        self.page = self.page.min(self.total_pages());
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn order(&self) -> ChapterOrder {
        self.order
    }

    /// Flips the ordering and returns to page 1.
    pub fn toggle_order(&mut self) {
        self.order = self.order.toggled();
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages, at least 1 even for an empty list.
    pub fn total_pages(&self) -> usize {
        self.chapters.len().div_ceil(self.per_page).max(1)
    }

    /// Moves to `page`, clamped into the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Chapters on the current page in the selected order.
    pub fn visible(&self) -> Vec<&Chapter> {
        let skip = (self.page - 1) * self.per_page;
        match self.order {
            ChapterOrder::NewestFirst => self
                .chapters
                .iter()
                .skip(skip)
                .take(self.per_page)
                .collect(),
            ChapterOrder::OldestFirst => self
                .chapters
                .iter()
                .rev()
                .skip(skip)
                .take(self.per_page)
                .collect(),
        }
    }

    /// Pagination controls for the current page.
    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.page, self.total_pages(), DEFAULT_SPAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Dots, Page};

    fn chapters(count: usize) -> Vec<Chapter> {
        // API order: newest first
        (1..=count)
            .rev()
            .map(|n| Chapter {
                number: n.to_string(),
                name: format!("Chapter {}", n),
                uploaded: vec![],
            })
            .collect()
    }

    fn numbers(visible: Vec<&Chapter>) -> Vec<String> {
        visible.into_iter().map(|c| c.number.clone()).collect()
    }

    #[test]
    fn test_single_page_window() {
        assert_eq!(page_window(1, 1, 1), vec![Page(1)]);
        assert_eq!(page_window(1, 0, 1), vec![Page(1)]);
    }

    #[test]
    fn test_window_with_gaps_on_both_sides() {
        assert_eq!(
            page_window(5, 10, 1),
            vec![Page(1), Dots, Page(4), Page(5), Page(6), Dots, Page(10)]
        );
    }

    #[test]
    fn test_window_without_gaps() {
        assert_eq!(page_window(1, 3, 1), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_window(1, 2, 1), vec![Page(1), Page(2)]);
        assert_eq!(page_window(3, 5, 1), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn test_window_at_edges() {
        assert_eq!(page_window(1, 10, 1), vec![Page(1), Page(2), Dots, Page(10)]);
        assert_eq!(page_window(10, 10, 1), vec![Page(1), Dots, Page(9), Page(10)]);
        assert_eq!(
            page_window(5, 10, 2),
            vec![Page(1), Dots, Page(3), Page(4), Page(5), Page(6), Page(7), Dots, Page(10)]
        );
    }

    #[test]
    fn test_window_has_no_duplicates_and_is_stable() {
        for total in 1..30 {
            for current in 1..=total {
                let window = page_window(current, total, 1);
                assert_eq!(window, page_window(current, total, 1));

                let pages: Vec<usize> = window
                    .iter()
                    .filter_map(|item| match item {
                        Page(p) => Some(*p),
                        Dots => None,
                    })
                    .collect();
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                assert_eq!(pages.first(), Some(&1));
                assert_eq!(pages.last(), Some(&total));
                assert!(pages.contains(&current));
            }
        }
    }

    #[test]
    fn test_pager_slices_and_clamps() {
        let mut pager = ChapterPager::new(chapters(25));
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(numbers(pager.visible())[0], "25");
        assert_eq!(pager.visible().len(), 10);
        assert!(!pager.has_previous());

        pager.set_page(3);
        assert_eq!(numbers(pager.visible()), vec!["5", "4", "3", "2", "1"]);
        assert!(!pager.has_next());

        pager.next_page();
        assert_eq!(pager.page(), 3);
        pager.set_page(0);
        assert_eq!(pager.page(), 1);
        pager.previous_page();
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn test_toggle_order_resets_page() {
        let mut pager = ChapterPager::new(chapters(25));
        pager.set_page(2);
        pager.toggle_order();

        assert_eq!(pager.order(), ChapterOrder::OldestFirst);
        assert_eq!(pager.page(), 1);
        assert_eq!(numbers(pager.visible())[..3], ["1", "2", "3"]);
    }

    #[test]
    fn test_shrinking_list_clamps_page() {
        let mut pager = ChapterPager::new(chapters(45));
        pager.set_page(5);
        pager.set_chapters(chapters(12));
        assert_eq!(pager.page(), 2);
        assert_eq!(numbers(pager.visible()), vec!["2", "1"]);
    }

    #[test]
    fn test_empty_pager() {
        let pager = ChapterPager::new(Vec::new());
        assert!(pager.is_empty());
        assert_eq!(pager.total_pages(), 1);
        assert!(pager.visible().is_empty());
        assert_eq!(pager.window(), vec![Page(1)]);
    }
}
