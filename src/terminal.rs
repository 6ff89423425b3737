//! Terminal rendering of the views and the interactive chapter reader.

use anispace_reader::catalog::{CatalogProvider, SearchResults};
use anispace_reader::display::{
    CARD_LABEL_LEN, CARD_TITLE_LEN, connection_action, connection_cover, connection_link,
    connection_title, search_result_href, series_cover, truncate, truncate_trimmed, upload_time,
};
use anispace_reader::pagination::PageItem;
use anispace_reader::reader::{ChapterReader, EventSource, PageScroller, ScrollEvent};
use anispace_reader::routes::Route;
use anispace_reader::view::ViewState;
use anispace_reader::{LoadEvent, SeriesPage, load_reader, load_search_page, load_series_page};
use dialoguer::{Input, Select};
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

use crate::cli::Tab;

/// Virtual height of one page on the terminal surface
const PAGE_HEIGHT: f64 = 1000.0;

/// Errors that end a terminal session
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Reading user input failed
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

fn log_load_event(event: LoadEvent) {
    debug!(?event, "loading");
}

/// Runs a view's fetch, showing the view's placeholder while it loads and
/// when it fails.
fn load_view<T, E: Display>(context: &str, fetch: impl FnOnce() -> Result<T, E>) -> Option<T> {
    if let Some(message) = ViewState::<T>::Loading.placeholder() {
        eprintln!("{}", message);
    }
    let state = ViewState::from_result(context, fetch());
    if let Some(message) = state.placeholder() {
        println!("{}", message);
    }
    state.into_loaded()
}

/// A virtual vertical strip of equally tall pages.
///
/// Reports its geometry through [`TerminalSurface::events`] whenever it
/// scrolls, like a browser viewport would.
pub struct TerminalSurface {
    pages: usize,
    page_height: f64,
    scroll_top: f64,
    events: EventSource<ScrollEvent>,
}

impl TerminalSurface {
    pub fn new(pages: usize, page_height: f64) -> Self {
        Self {
            pages,
            page_height,
            scroll_top: 0.0,
            events: EventSource::new(),
        }
    }

    pub fn events(&self) -> &EventSource<ScrollEvent> {
        &self.events
    }

    /// Distance of each page's top edge from the viewport top.
    pub fn geometry(&self) -> ScrollEvent {
        ScrollEvent {
            offsets: (0..self.pages)
                .map(|i| i as f64 * self.page_height - self.scroll_top)
                .collect(),
        }
    }

    pub fn scroll_to(&mut self, top: f64) {
        let max_top = self.pages.saturating_sub(1) as f64 * self.page_height;
        self.scroll_top = top.clamp(0.0, max_top);
        self.events.emit(&self.geometry());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_top + delta);
    }
}

impl PageScroller for TerminalSurface {
    fn scroll_into_view(&mut self, page: usize) -> bool {
        if page == 0 || page > self.pages {
            return false;
        }
        self.scroll_to((page - 1) as f64 * self.page_height);
        true
    }
}

fn format_window(items: &[PageItem], current: usize) -> String {
    items
        .iter()
        .map(|item| match item {
            PageItem::Page(p) if *p == current => format!("[{}]", p),
            PageItem::Page(p) => p.to_string(),
            PageItem::Dots => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prints the series page. Returns false when it could not be loaded.
pub fn show_series<P: CatalogProvider + ?Sized>(
    provider: &P,
    series_id: &str,
    tab: Tab,
    page: usize,
    oldest_first: bool,
) -> bool {
    let Some(mut series_page) = load_view("series", || {
        load_series_page(provider, series_id, log_load_event)
    }) else {
        return false;
    };

    if oldest_first {
        series_page.chapters.toggle_order();
    }
    series_page.chapters.set_page(page);

    print_series_header(&series_page);
    match tab {
        Tab::About => print_about(&series_page),
        Tab::Chapters => print_chapters(&series_page),
        Tab::Connections => print_connections(&series_page),
    }
    true
}

fn print_series_header(page: &SeriesPage) {
    let series = &page.series;
    println!("{}", series.title);
    println!("Cover: {}", series_cover(series));
    let mut badges = Vec::new();
    if let Some(status) = &series.status {
        badges.push(status.clone());
    }
    badges.extend(series.genres.iter().cloned());
    if !badges.is_empty() {
        println!("{}", badges.join(" · "));
    }
    println!("Start reading: {}", Route::reader(series.id.clone(), "1"));
    println!();
}

fn print_about(page: &SeriesPage) {
    let series = &page.series;
    println!("=== About ===");
    if !series.authors.is_empty() {
        println!("Author: {}", series.authors.join(", "));
    }
    if let Some(year) = series.year {
        println!("Year: {}", year);
    }
    if !series.updated_on.is_empty() {
        println!("Last Updated: {}", series.updated_on.join(" "));
    }
    if let Some(status) = &series.status {
        println!("Status: {}", status);
    }
    println!();
    println!("{}", series.description.as_deref().unwrap_or(""));
}

fn print_chapters(page: &SeriesPage) {
    let pager = &page.chapters;
    println!("=== Chapters ({}) ===", pager.order().label());
    if pager.is_empty() {
        println!("No chapters.");
        return;
    }

    for chapter in pager.visible() {
        println!(
            "Ch. {:<8} {}  [{}]  {}",
            chapter.number,
            truncate(&chapter.name, CARD_TITLE_LEN),
            upload_time(chapter),
            Route::reader(page.series.id.clone(), chapter.number.clone())
        );
    }

    println!();
    println!("{}", format_window(&pager.window(), pager.page()));
    println!("Page {} of {}", pager.page(), pager.total_pages());
}

fn print_connections(page: &SeriesPage) {
    println!("=== Connections ===");
    if page.connections.is_empty() {
        println!("No connections.");
        return;
    }

    for connection in &page.connections {
        println!(
            "[{}] {} ({})",
            connection.node.media_type.label(),
            truncate(connection_title(connection), CARD_TITLE_LEN),
            truncate(&connection.relation, CARD_LABEL_LEN),
        );
        println!("    Cover: {}", connection_cover(connection));
        println!("    {}: {}", connection_action(connection), connection_link(connection));
    }
}

/// Prints a page of search results. Returns false when it could not be loaded.
pub fn show_search<P: CatalogProvider + ?Sized>(provider: &P, query: &str, page: u32) -> bool {
    match load_view("search", || {
        load_search_page(provider, query, page, log_load_event)
    }) {
        None => false,
        Some(None) => {
            println!("Enter a search query.");
            false
        }
        Some(Some(results)) => {
            print_search_results(&results);
            true
        }
    }
}

fn print_search_results(results: &SearchResults) {
    println!("Results for {}", results.query);
    println!();
    for result in &results.results {
        println!(
            "{}  (Ch. {})",
            truncate(&result.title, CARD_TITLE_LEN),
            result.latest_chapter
        );
        println!("    {}", Route::series(search_result_href(result)));
    }
    println!();
    println!(
        "Page {} of {} ({} results)",
        results.current_page, results.page_limit, results.total_results
    );
    if results.has_next_page {
        println!(
            "Next: {}",
            Route::search(results.query.clone(), results.current_page + 1)
        );
    }
}

pub fn show_genres<P: CatalogProvider + ?Sized>(provider: &P) -> bool {
    let Some(genres) = load_view("genres", || provider.fetch_genres()) else {
        return false;
    };

    println!("GENRES");
    for genre in genres {
        println!("{:<20} {}", genre.id, Route::Genre { slug: genre.slug });
    }
    true
}

pub fn show_popular<P: CatalogProvider + ?Sized>(provider: &P, limit: usize) -> bool {
    let Some(entries) = load_view("popular", || provider.fetch_popular()) else {
        return false;
    };

    for entry in entries.iter().take(limit) {
        println!("{}  (Ch. {})", truncate_trimmed(&entry.title, 50), entry.latest_chapter);
        if !entry.description.is_empty() {
            println!("    {}", truncate_trimmed(&entry.description, 150));
        }
        println!("    Read Now: {}", Route::series(entry.id.clone()));
    }
    true
}

fn print_reader_status(reader: &ChapterReader) {
    if !reader.toolbar_visible() {
        return;
    }
    let nav = reader.navigator();
    println!(
        "Chapter {} · Page {} ({:.0}%)",
        nav.current_number(),
        reader.progress_label(),
        reader.progress_percent()
    );
}

fn print_chapter(reader: &ChapterReader) {
    print_reader_status(reader);
    for (index, image) in reader.images().iter().enumerate() {
        let marker = if index + 1 == reader.current_page() { ">" } else { " " };
        println!("{} {:>3}  {}", marker, index + 1, image);
    }
    let nav = reader.navigator();
    if let Some(route) = nav.previous_route() {
        println!("Previous chapter: {}", route);
    }
    if let Some(route) = nav.next_route() {
        println!("Next chapter: {}", route);
    }
}

enum ReaderAction {
    NextPage,
    PreviousPage,
    JumpToPage,
    PreviousChapter(Route),
    NextChapter(Route),
    ChooseChapter,
    ToggleToolbar,
    Quit,
}

impl ReaderAction {
    fn label(&self) -> &'static str {
        match self {
            ReaderAction::NextPage => "Next page",
            ReaderAction::PreviousPage => "Previous page",
            ReaderAction::JumpToPage => "Jump to page",
            ReaderAction::PreviousChapter(_) => "Previous chapter",
            ReaderAction::NextChapter(_) => "Next chapter",
            ReaderAction::ChooseChapter => "Choose chapter",
            ReaderAction::ToggleToolbar => "Toggle toolbar",
            ReaderAction::Quit => "Quit",
        }
    }
}

/// How an interactive reader session ended
enum ReaderExit {
    Quit,
    Open(Route),
}

fn reader_actions(reader: &ChapterReader) -> Vec<ReaderAction> {
    let mut actions = Vec::new();
    if reader.current_page() < reader.total_pages() {
        actions.push(ReaderAction::NextPage);
    }
    if reader.current_page() > 1 {
        actions.push(ReaderAction::PreviousPage);
    }
    if reader.total_pages() > 0 {
        actions.push(ReaderAction::JumpToPage);
    }
    let nav = reader.navigator();
    if let Some(route) = nav.next_route() {
        actions.push(ReaderAction::NextChapter(route));
    }
    if let Some(route) = nav.previous_route() {
        actions.push(ReaderAction::PreviousChapter(route));
    }
    if !nav.chapters().is_empty() {
        actions.push(ReaderAction::ChooseChapter);
    }
    actions.push(ReaderAction::ToggleToolbar);
    actions.push(ReaderAction::Quit);
    actions
}

fn reader_loop(
    reader: &mut ChapterReader,
    surface: &mut TerminalSurface,
) -> Result<ReaderExit, TerminalError> {
    loop {
        print_reader_status(reader);
        if let Some(image) = reader.images().get(reader.current_page().wrapping_sub(1)) {
            println!("{}", image);
        }

        let actions = reader_actions(reader);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new().items(&labels).default(0).interact()?;

        match actions.into_iter().nth(choice).unwrap_or(ReaderAction::Quit) {
            ReaderAction::NextPage => surface.scroll_by(PAGE_HEIGHT),
            ReaderAction::PreviousPage => surface.scroll_by(-PAGE_HEIGHT),
            ReaderAction::JumpToPage => {
                let page: usize = Input::new()
                    .with_prompt(format!("Page (1-{})", reader.total_pages()))
                    .interact_text()?;
                if !reader.jump_to_page(page, surface) {
                    println!("No page {}.", page);
                }
            }
            ReaderAction::PreviousChapter(route) | ReaderAction::NextChapter(route) => {
                return Ok(ReaderExit::Open(route));
            }
            ReaderAction::ChooseChapter => {
                let nav = reader.navigator();
                let names: Vec<&str> = nav.chapters().iter().map(|c| c.name.as_str()).collect();
                let picked = Select::new()
                    .with_prompt("Chapter")
                    .items(&names)
                    .default(nav.current_index().unwrap_or(0))
                    .interact()?;
                if let Some(chapter) = nav.chapters().get(picked) {
                    return Ok(ReaderExit::Open(nav.route_to(&chapter.number)));
                }
            }
            ReaderAction::ToggleToolbar => reader.toggle_toolbar(),
            ReaderAction::Quit => return Ok(ReaderExit::Quit),
        }
    }
}

/// Opens a chapter, optionally on a given page, and either prints it or
/// runs an interactive session that can move between chapters.
///
/// Returns false when a chapter could not be loaded.
pub fn run_reader<P: CatalogProvider + ?Sized>(
    provider: &P,
    series_id: &str,
    chapter: &str,
    mut start_page: Option<usize>,
    interactive: bool,
) -> Result<bool, TerminalError> {
    let mut series_id = series_id.to_string();
    let mut chapter = chapter.to_string();

    loop {
        let Some(mut reader) = load_view("reader", || {
            load_reader(provider, &series_id, &chapter, log_load_event)
        }) else {
            return Ok(false);
        };

        let mut surface = TerminalSurface::new(reader.total_pages(), PAGE_HEIGHT);
        reader.activate(surface.events(), &surface.geometry());
        let _page_log = reader.on_page_change(|event| debug!(page = event.index + 1, "page changed"));

        if let Some(page) = start_page.take() {
            reader.jump_to_page(page, &mut surface);
        }

        if !interactive {
            print_chapter(&reader);
            return Ok(true);
        }

        match reader_loop(&mut reader, &mut surface)? {
            ReaderExit::Quit => return Ok(true),
            ReaderExit::Open(Route::Reader { id, chapter: next }) => {
                series_id = id;
                chapter = next;
            }
            ReaderExit::Open(_) => return Ok(true),
        }
    }
}

/// Shows whatever view a route addresses.
pub fn open_route<P: CatalogProvider + ?Sized>(
    provider: &P,
    route: &Route,
) -> Result<bool, TerminalError> {
    match route {
        Route::Series { id } => Ok(show_series(provider, id, Tab::Chapters, 1, false)),
        Route::Reader { id, chapter } => run_reader(provider, id, chapter, None, false),
        Route::Search { query, page } => Ok(show_search(provider, query, *page)),
        Route::Genre { slug } => {
            println!("Browsing by genre is not offered by the catalog API ({}).", slug);
            Ok(false)
        }
        Route::Anime { .. } | Route::AnimeSearch { .. } => {
            println!("Anime titles are not served by this catalog.");
            Ok(false)
        }
    }
}
