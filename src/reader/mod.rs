/// Chapter reader: page tracking, page jumps and chapter navigation.
///
/// The reader shows a chapter as a vertical strip of page images. The
/// rendering surface reports scroll geometry as [`ScrollEvent`]s; a
/// [`PageTracker`] turns those into the current page and announces changes
/// as [`VisibleEntryChanged`] events. Nothing in here needs a real viewport.
mod navigation;
mod observer;

pub use navigation::ChapterNavigator;
pub use observer::{EventSource, Subscription};

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Scroll geometry reported by a rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollEvent {
    /// Signed distance of each rendered page's top edge from the viewport's
    /// top edge, in page order
    pub offsets: Vec<f64>,
}

/// The page closest to the top of the viewport changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEntryChanged {
    /// 0-based page index
    pub index: usize,
}

/// Surface capability to bring a page into view.
pub trait PageScroller {
    /// Scrolls page `page` (1-based) into view smoothly.
    ///
    /// Returns false when the surface has no element for that page.
    fn scroll_into_view(&mut self, page: usize) -> bool;
}

/// Index of the offset with the smallest absolute value.
///
/// Ties go to the lowest index. NaN offsets never win. Returns None for an
/// empty slice.
pub fn closest_page(offsets: &[f64]) -> Option<usize> {
    let mut closest_index = None;
    let mut closest_offset = f64::INFINITY;

    for (index, offset) in offsets.iter().enumerate() {
        let distance = offset.abs();
        if distance < closest_offset {
            closest_offset = distance;
            closest_index = Some(index);
        }
    }

    closest_index
}

/// Tracks the current page of a chapter with `total` pages.
pub struct PageTracker {
    total: usize,
    current: usize,
    changes: EventSource<VisibleEntryChanged>,
}

impl PageTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: 0,
            changes: EventSource::new(),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total
    }

    /// 0-based index of the current page.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 1-based number of the current page, 0 for an empty chapter.
    pub fn current_page(&self) -> usize {
        if self.total == 0 { 0 } else { self.current + 1 }
    }

    /// Share of the chapter read, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current_page() as f64 / self.total as f64 * 100.0
        }
    }

    /// Source of page change notifications.
    pub fn changes(&self) -> EventSource<VisibleEntryChanged> {
        self.changes.clone()
    }

    /// Resolves the current page from measured offsets without notifying.
    ///
    /// Returns a change event only when the resolved page differs from the
    /// current one. Without pages this does nothing.
    pub fn resolve(&mut self, offsets: &[f64]) -> Option<VisibleEntryChanged> {
        if self.total == 0 {
            return None;
        }

        let index = closest_page(offsets)?.min(self.total - 1);
        if index == self.current {
            return None;
        }

        self.current = index;
        Some(VisibleEntryChanged { index })
    }

    /// Like [`PageTracker::resolve`], and also notifies [`PageTracker::changes`].
    pub fn observe(&mut self, offsets: &[f64]) -> Option<VisibleEntryChanged> {
        let event = self.resolve(offsets)?;
        self.changes.emit(&event);
        Some(event)
    }

    /// Asks the surface to scroll to page `page` (1-based).
    ///
    /// Pages outside `1..=total` and pages the surface cannot find are
    /// ignored; the return value says whether a scroll was started. The
    /// current page follows from the scroll events that result.
    pub fn jump_to_page<S: PageScroller + ?Sized>(&self, page: usize, scroller: &mut S) -> bool {
        self.accepts_page(page) && scroller.scroll_into_view(page)
    }

    /// Whether `page` (1-based) exists in this chapter.
    pub fn accepts_page(&self, page: usize) -> bool {
        if page < 1 || page > self.total {
            debug!(page, total = self.total, "ignoring jump outside chapter");
            return false;
        }
        true
    }
}

/// State of an open chapter: its pages, the page tracker, the toolbar and
/// chapter navigation.
pub struct ChapterReader {
    images: Vec<String>,
    tracker: Rc<RefCell<PageTracker>>,
    navigator: ChapterNavigator,
    toolbar_visible: bool,
    scroll_subscription: Option<Subscription>,
}

impl ChapterReader {
    pub fn new(images: Vec<String>, navigator: ChapterNavigator) -> Self {
        let tracker = PageTracker::new(images.len());
        Self {
            images,
            tracker: Rc::new(RefCell::new(tracker)),
            navigator,
            toolbar_visible: true,
            scroll_subscription: None,
        }
    }

    /// Starts tracking scroll events from `scroll`.
    ///
    /// `initial` is the geometry at activation; it is evaluated once right
    /// away. Activating again replaces the previous registration. The
    /// registration ends on [`ChapterReader::deactivate`] or when the reader
    /// is dropped.
    pub fn activate(&mut self, scroll: &EventSource<ScrollEvent>, initial: &ScrollEvent) {
        self.scroll_subscription = None;

        let tracker = Rc::clone(&self.tracker);
        let subscription = scroll.subscribe(move |event: &ScrollEvent| {
            Self::track(&tracker, &event.offsets);
        });
        self.scroll_subscription = Some(subscription);

        Self::track(&self.tracker, &initial.offsets);
    }

    /// Resolves the page, then notifies with the tracker released so that
    /// listeners may query the reader.
    fn track(tracker: &Rc<RefCell<PageTracker>>, offsets: &[f64]) {
        let (event, changes) = match tracker.try_borrow_mut() {
            Ok(mut tracker) => (tracker.resolve(offsets), tracker.changes()),
            Err(_) => return,
        };
        if let Some(event) = event {
            changes.emit(&event);
        }
    }

    /// Stops tracking scroll events.
    pub fn deactivate(&mut self) {
        self.scroll_subscription = None;
    }

    pub fn is_active(&self) -> bool {
        self.scroll_subscription.is_some()
    }

    /// Registers a listener for page changes.
    pub fn on_page_change<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&VisibleEntryChanged) + 'static,
    {
        self.tracker.borrow().changes().subscribe(listener)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn total_pages(&self) -> usize {
        self.images.len()
    }

    /// 1-based current page, 0 for an empty chapter.
    pub fn current_page(&self) -> usize {
        self.tracker.borrow().current_page()
    }

    pub fn progress_percent(&self) -> f64 {
        self.tracker.borrow().progress_percent()
    }

    /// "current/total" as shown next to the progress bar.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.current_page(), self.total_pages())
    }

    /// Scrolls to page `page` (1-based), see [`PageTracker::jump_to_page`].
    ///
    /// The tracker is not borrowed while the surface scrolls, so surfaces
    /// may report the resulting geometry synchronously.
    pub fn jump_to_page<S: PageScroller + ?Sized>(&self, page: usize, scroller: &mut S) -> bool {
        let accepted = self.tracker.borrow().accepts_page(page);
        accepted && scroller.scroll_into_view(page)
    }

    pub fn navigator(&self) -> &ChapterNavigator {
        &self.navigator
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible
    }

    /// A tap on the reading area shows or hides the toolbar.
    pub fn toggle_toolbar(&mut self) {
        self.toolbar_visible = !self.toolbar_visible;
    }
}
