//! Pagination tests: window arithmetic, the page state machine, and
//! driving several queued views with scripted navigation.

use std::collections::VecDeque;
use txnscope_core::{
    paginate::{
        page_window, paginate_slice, Nav, NavigationSource, Page, PageRenderer, PageSize, Pager,
        PagerState, View,
    },
    search::{self, Query, Window},
    Field, IndexedStore, Record, ScopeError, SequentialStore,
};

fn txn(id: &str) -> Record {
    Record {
        transaction_id: id.into(),
        transaction_type: "transfer".into(),
        payment_channel: "ACH".into(),
        ..Record::default()
    }
}

fn numbered(prefix: &str, n: usize) -> Vec<Record> {
    (0..n).map(|i| txn(&format!("{prefix}{i}"))).collect()
}

/// Records every page it is asked to render.
#[derive(Default)]
struct Recorder {
    shown: Vec<(String, usize, Vec<String>)>,
}

impl PageRenderer for Recorder {
    fn render(&mut self, page: &Page<'_>) {
        self.shown.push((
            page.title.to_string(),
            page.number,
            page.records.iter().map(|r| r.transaction_id.clone()).collect(),
        ));
    }
}

/// Replays a fixed list of intents, then runs dry.
struct Script(VecDeque<Nav>);

impl Script {
    fn new(navs: &[Nav]) -> Self {
        Self(navs.iter().copied().collect())
    }
}

impl NavigationSource for Script {
    fn next_nav(&mut self, _page: &Page<'_>) -> Option<Nav> {
        self.0.pop_front()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window arithmetic
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn window_matches_slice_bounds() {
    let items: Vec<usize> = (0..23).collect();
    for size in [1, 5, 10, 7] {
        let page_size = PageSize::new(size).expect("non-zero");
        for page in 0..8 {
            let start = page * size;
            let expected: &[usize] = if start >= items.len() {
                &[]
            } else {
                &items[start..((page + 1) * size).min(items.len())]
            };
            assert_eq!(paginate_slice(&items, page, page_size), expected, "page {page} size {size}");
            assert_eq!(page_window(items.len(), page, page_size).is_none(), start >= items.len());
        }
    }
}

#[test]
fn last_partial_page_and_past_end() {
    assert_eq!(page_window(12, 1, PageSize::FULL), Some(10..12));
    assert_eq!(page_window(12, 2, PageSize::FULL), None);
    assert_eq!(page_window(0, 0, PageSize::PREVIEW), None);
    assert_eq!(page_window(10, usize::MAX, PageSize::FULL), None);
}

#[test]
fn zero_page_size_is_rejected() {
    assert!(matches!(PageSize::new(0), Err(ScopeError::InvalidPageSize { size: 0 })));
    assert_eq!(PageSize::default().get(), 10);
    assert_eq!(PageSize::PREVIEW.get(), 5);
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn state_transitions() {
    let start = PagerState::INITIAL;
    assert_eq!(start, PagerState::ShowingPage(0));
    assert_eq!(start.apply(Nav::Previous), PagerState::ShowingPage(0));
    assert_eq!(start.apply(Nav::Next).apply(Nav::Next), PagerState::ShowingPage(2));
    assert_eq!(PagerState::ShowingPage(2).apply(Nav::Previous), PagerState::ShowingPage(1));
    assert_eq!(start.apply(Nav::Back), PagerState::Closed);
    assert_eq!(start.apply(Nav::ExitEarly), PagerState::Aborted);
    assert!(PagerState::Closed.apply(Nav::Next).is_terminal());
}

// ─────────────────────────────────────────────────────────────────────────────
// Driving views
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn pages_forward_back_and_reports_no_more_data() {
    let store = SequentialStore::from_records(numbered("A", 12));
    let views = [View::of_store("card", &store, PageSize::PREVIEW)];
    let mut recorder = Recorder::default();
    let mut script = Script::new(&[Nav::Next, Nav::Next, Nav::Next, Nav::Previous, Nav::Back]);

    let outcome = Pager::run(&views, &mut recorder, &mut script);

    let pages: Vec<usize> = recorder.shown.iter().map(|(_, n, _)| *n).collect();
    assert_eq!(pages, vec![0, 1, 2, 3, 2]);
    assert_eq!(recorder.shown[0].2, vec!["A0", "A1", "A2", "A3", "A4"]);
    assert_eq!(recorder.shown[2].2, vec!["A10", "A11"]);
    assert!(recorder.shown[3].2.is_empty(), "page 3 is past the end");
    assert_eq!(outcome.views_completed, 1);
    assert!(!outcome.aborted);
}

#[test]
fn back_moves_to_next_view_and_exit_early_skips_the_rest() {
    let card = IndexedStore::from_records(numbered("C", 3));
    let ach = IndexedStore::from_records(numbered("A", 3));
    let upi = IndexedStore::from_records(numbered("U", 3));
    let wire = IndexedStore::from_records(numbered("W", 3));
    let views = [
        View::of_store("card", &card, PageSize::PREVIEW),
        View::of_store("ach", &ach, PageSize::PREVIEW),
        View::of_store("upi", &upi, PageSize::PREVIEW),
        View::of_store("wire", &wire, PageSize::PREVIEW),
    ];
    let mut recorder = Recorder::default();
    let mut script = Script::new(&[Nav::Back, Nav::ExitEarly, Nav::Back]);

    let outcome = Pager::run(&views, &mut recorder, &mut script);

    let titles: Vec<&str> = recorder.shown.iter().map(|(t, _, _)| t.as_str()).collect();
    assert_eq!(titles, vec!["card", "ach"]);
    assert!(outcome.aborted);
    assert_eq!(outcome.views_completed, 1);
    assert_eq!(outcome.views_skipped, 2);
}

#[test]
fn exhausted_input_acts_as_exit_early() {
    let store = IndexedStore::from_records(numbered("X", 30));
    let views = [
        View::of_store("one", &store, PageSize::FULL),
        View::of_store("two", &store, PageSize::FULL),
    ];
    let mut recorder = Recorder::default();
    let outcome = Pager::run(&views, &mut recorder, &mut Script::new(&[Nav::Next]));
    assert_eq!(recorder.shown.len(), 2);
    assert!(outcome.aborted);
}

#[test]
fn pages_over_search_hits() {
    let mut records = numbered("T", 14);
    for record in records.iter_mut().step_by(2) {
        record.transaction_type = "upi_transfer".into();
    }
    let store = IndexedStore::from_records(records);
    let hits = search::linear_search(&[&store], &Query::new(Field::TransactionType, "UPI"), Window::ALL);
    let view = View::of_hits("upi hits", hits, PageSize::PREVIEW);

    assert_eq!(view.len(), 7);
    let second = view.page(1);
    let ids: Vec<&str> = second.records.iter().map(|r| r.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["T10", "T12"]);
    assert!(!second.has_next());
    assert_eq!(second.page_count(), 2);
    assert!(view.page(2).is_no_more_data());
}
