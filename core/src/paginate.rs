//! Fixed-size paging over ordered result views.
//!
//! A `Pager` walks a queue of views back to back. Each view starts at
//! page 0 and follows the `PagerState` machine:
//!
//!   ShowingPage(p) --Next-->      ShowingPage(p + 1)
//!   ShowingPage(p) --Previous-->  ShowingPage(max(p - 1, 0))
//!   ShowingPage(p) --Back-->      Closed   (go on to the next view)
//!   ShowingPage(p) --ExitEarly--> Aborted  (drop all remaining views)
//!
//! Rendering and input are seams (`PageRenderer`, `NavigationSource`)
//! so nothing here touches a terminal.

use crate::{
    error::{ScopeError, ScopeResult},
    record::Record,
    search::Hit,
    store::RecordStore,
};
use std::ops::Range;

pub const FULL_PAGE_SIZE: usize = 10;
pub const PREVIEW_PAGE_SIZE: usize = 5;

/// A validated, non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const FULL: PageSize = PageSize(FULL_PAGE_SIZE);
    pub const PREVIEW: PageSize = PageSize(PREVIEW_PAGE_SIZE);

    pub fn new(size: usize) -> ScopeResult<Self> {
        if size == 0 {
            return Err(ScopeError::InvalidPageSize { size });
        }
        Ok(Self(size))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::FULL
    }
}

/// `[page*size, min((page+1)*size, len))`, or `None` when the window
/// starts at or past `len` ("no more data").
pub fn page_window(len: usize, page: usize, size: PageSize) -> Option<Range<usize>> {
    let start = page.checked_mul(size.get())?;
    if start >= len {
        return None;
    }
    let end = start.saturating_add(size.get()).min(len);
    Some(start..end)
}

/// Page `page` of a slice; empty when past the end.
pub fn paginate_slice<T>(items: &[T], page: usize, size: PageSize) -> &[T] {
    match page_window(items.len(), page, size) {
        Some(range) => &items[range],
        None => &[],
    }
}

/// Caller intent while a page is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Next,
    Previous,
    Back,
    ExitEarly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    ShowingPage(usize),
    Closed,
    Aborted,
}

impl PagerState {
    pub const INITIAL: PagerState = PagerState::ShowingPage(0);

    pub fn apply(self, nav: Nav) -> PagerState {
        match (self, nav) {
            (Self::ShowingPage(p), Nav::Next)      => Self::ShowingPage(p.saturating_add(1)),
            (Self::ShowingPage(p), Nav::Previous)  => Self::ShowingPage(p.saturating_sub(1)),
            (Self::ShowingPage(_), Nav::Back)      => Self::Closed,
            (Self::ShowingPage(_), Nav::ExitEarly) => Self::Aborted,
            (terminal, _) => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::ShowingPage(_))
    }
}

/// What a view pages over.
pub enum ViewSource<'a> {
    Store(&'a dyn RecordStore),
    Hits(Vec<Hit<'a>>),
}

/// One titled result sequence queued for display.
pub struct View<'a> {
    pub title:  String,
    pub source: ViewSource<'a>,
    pub size:   PageSize,
}

impl<'a> View<'a> {
    pub fn of_store(title: impl Into<String>, store: &'a dyn RecordStore, size: PageSize) -> Self {
        Self { title: title.into(), source: ViewSource::Store(store), size }
    }

    pub fn of_hits(title: impl Into<String>, hits: Vec<Hit<'a>>, size: PageSize) -> Self {
        Self { title: title.into(), source: ViewSource::Hits(hits), size }
    }

    pub fn len(&self) -> usize {
        match &self.source {
            ViewSource::Store(store) => store.len(),
            ViewSource::Hits(hits)   => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize page `number` of this view.
    pub fn page(&self, number: usize) -> Page<'_> {
        let total = self.len();
        let records: Vec<&Record> = match page_window(total, number, self.size) {
            None => Vec::new(),
            Some(range) => match &self.source {
                ViewSource::Store(store) => store
                    .iter()
                    .skip(range.start)
                    .take(range.len())
                    .collect(),
                ViewSource::Hits(hits) => hits[range].iter().map(|hit| hit.record).collect(),
            },
        };
        Page {
            title: &self.title,
            number,
            size: self.size.get(),
            total,
            records,
        }
    }
}

/// One rendered window of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub title:   &'a str,
    pub number:  usize,
    pub size:    usize,
    pub total:   usize,
    pub records: Vec<&'a Record>,
}

impl Page<'_> {
    /// Window starts past the available records.
    pub fn is_no_more_data(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the first record on this page within the view.
    pub fn first_index(&self) -> usize {
        self.number.saturating_mul(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.first_index().saturating_add(self.size) < self.total
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.size)
    }
}

pub trait PageRenderer {
    fn render(&mut self, page: &Page<'_>);
}

pub trait NavigationSource {
    /// Next intent for the page on screen; `None` (input exhausted)
    /// is treated as `ExitEarly`.
    fn next_nav(&mut self, page: &Page<'_>) -> Option<Nav>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagerOutcome {
    /// Views left with `Back`.
    pub views_completed: usize,
    /// Views never shown because of `ExitEarly`.
    pub views_skipped:   usize,
    pub aborted:         bool,
}

/// Drives queued views through the page state machine.
pub struct Pager;

impl Pager {
    pub fn run(
        views: &[View<'_>],
        renderer: &mut dyn PageRenderer,
        input: &mut dyn NavigationSource,
    ) -> PagerOutcome {
        let mut outcome = PagerOutcome::default();

        for (i, view) in views.iter().enumerate() {
            let mut state = PagerState::INITIAL;
            while let PagerState::ShowingPage(number) = state {
                let page = view.page(number);
                renderer.render(&page);
                let nav = input.next_nav(&page).unwrap_or(Nav::ExitEarly);
                state = state.apply(nav);
            }

            match state {
                PagerState::Aborted => {
                    outcome.aborted = true;
                    outcome.views_skipped = views.len() - i - 1;
                    log::debug!("pager: exit early at view '{}'", view.title);
                    break;
                }
                _ => outcome.views_completed += 1,
            }
        }
        outcome
    }
}
