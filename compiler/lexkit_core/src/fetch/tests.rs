use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;

/// Failure raised by [`ListFetcher`] when it reaches a poisoned slot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Malformed(usize);

/// Fetcher over a fixed list, ending with `0`.
///
/// `None` slots fail with [`Malformed`]. Calls and disposals are counted
/// through shared cells so tests can observe them after the scanner is gone.
struct ListFetcher {
    items: Vec<Option<i32>>,
    cursor: usize,
    fetches: Rc<Cell<usize>>,
    disposals: Rc<Cell<usize>>,
    seen_previous: Vec<i32>,
}

impl ListFetcher {
    fn new(items: &[i32]) -> Self {
        Self::with_slots(items.iter().copied().map(Some).collect())
    }

    fn with_slots(items: Vec<Option<i32>>) -> Self {
        ListFetcher {
            items,
            cursor: 0,
            fetches: Rc::new(Cell::new(0)),
            disposals: Rc::new(Cell::new(0)),
            seen_previous: Vec::new(),
        }
    }

    fn take(&mut self) -> Result<i32, Malformed> {
        self.fetches.set(self.fetches.get() + 1);
        let slot = self.items.get(self.cursor).copied().unwrap_or(Some(0));
        self.cursor += 1;
        slot.ok_or(Malformed(self.cursor - 1))
    }
}

impl Fetcher for ListFetcher {
    type Item = i32;
    type Error = Malformed;

    fn fetch_initial(&mut self) -> Result<i32, Malformed> {
        assert_eq!(self.cursor, 0, "fetch_initial called twice");
        self.take()
    }

    fn fetch_next(&mut self, previous: &i32) -> Result<i32, Malformed> {
        self.seen_previous.push(*previous);
        self.take()
    }

    fn is_end(&self, item: &i32) -> bool {
        *item == 0
    }

    fn dispose(&mut self) {
        self.disposals.set(self.disposals.get() + 1);
    }
}

// === Production ===

#[test]
fn yields_items_until_end_marker() {
    let scanner = Scanner::new(ListFetcher::new(&[1, 2, 3]));
    let items: Vec<_> = scanner.collect();
    assert_eq!(items, vec![Ok(1), Ok(2), Ok(3)]);
}

#[test]
fn fetch_next_receives_previous_item() {
    let mut scanner = Scanner::new(ListFetcher::new(&[4, 5, 6]));
    while scanner.next().is_some() {}
    assert_eq!(scanner.fetcher().seen_previous, vec![4, 5, 6]);
}

#[test]
fn state_transitions() {
    let mut scanner = Scanner::new(ListFetcher::new(&[7]));
    assert_eq!(scanner.state(), ScanState::NotStarted);
    assert_eq!(scanner.next(), Some(Ok(7)));
    assert_eq!(scanner.state(), ScanState::Running);
    assert_eq!(scanner.next(), None);
    assert_eq!(scanner.state(), ScanState::Ended);
}

#[test]
fn initial_end_marker_yields_nothing() {
    let mut scanner = Scanner::new(ListFetcher::new(&[]));
    assert_eq!(scanner.next(), None);
    assert_eq!(scanner.state(), ScanState::Ended);
    assert_eq!(scanner.end_marker(), Some(&0));
}

// === End is sticky ===

#[test]
fn no_fetch_after_end() {
    let fetcher = ListFetcher::new(&[1]);
    let fetches = Rc::clone(&fetcher.fetches);
    let mut scanner = Scanner::new(fetcher);

    assert_eq!(scanner.next(), Some(Ok(1)));
    assert_eq!(scanner.next(), None);
    let after_end = fetches.get();
    for _ in 0..5 {
        assert_eq!(scanner.next(), None);
    }
    assert_eq!(fetches.get(), after_end);
}

#[test]
fn end_marker_is_retained() {
    let mut scanner = Scanner::new(ListFetcher::new(&[1, 2]));
    assert_eq!(scanner.end_marker(), None);
    while scanner.next().is_some() {}
    assert_eq!(scanner.end_marker(), Some(&0));
}

// === Failures ===

#[test]
fn fetch_error_is_yielded_once() {
    let mut scanner = Scanner::new(ListFetcher::with_slots(vec![Some(1), None, Some(3)]));
    assert_eq!(scanner.next(), Some(Ok(1)));
    assert_eq!(scanner.next(), Some(Err(Malformed(1))));
    assert_eq!(scanner.state(), ScanState::Failed);
    assert_eq!(scanner.next(), None);
    assert_eq!(scanner.next(), None);
}

#[test]
fn initial_fetch_error() {
    let mut scanner = Scanner::new(ListFetcher::with_slots(vec![None]));
    assert_eq!(scanner.next(), Some(Err(Malformed(0))));
    assert_eq!(scanner.next(), None);
}

// === Disposal ===

#[test]
fn dispose_is_idempotent() {
    let fetcher = ListFetcher::new(&[1, 2]);
    let disposals = Rc::clone(&fetcher.disposals);
    let mut scanner = Scanner::new(fetcher);

    scanner.dispose();
    scanner.dispose();
    assert!(scanner.is_disposed());
    assert_eq!(disposals.get(), 1);

    drop(scanner);
    assert_eq!(disposals.get(), 1);
}

#[test]
fn drop_disposes_exactly_once() {
    let fetcher = ListFetcher::new(&[1, 2, 3]);
    let disposals = Rc::clone(&fetcher.disposals);
    {
        let mut scanner = Scanner::new(fetcher);
        assert_eq!(scanner.next(), Some(Ok(1)));
        assert_eq!(disposals.get(), 0);
    }
    assert_eq!(disposals.get(), 1);
}

#[test]
fn dispose_after_failure_keeps_failed_state() {
    let fetcher = ListFetcher::with_slots(vec![None]);
    let disposals = Rc::clone(&fetcher.disposals);
    let mut scanner = Scanner::new(fetcher);
    assert!(matches!(scanner.next(), Some(Err(_))));
    scanner.dispose();
    assert_eq!(scanner.state(), ScanState::Failed);
    assert_eq!(disposals.get(), 1);
}

#[test]
fn disposed_scanner_stops_producing() {
    let fetcher = ListFetcher::new(&[1, 2, 3]);
    let fetches = Rc::clone(&fetcher.fetches);
    let mut scanner = Scanner::new(fetcher);
    assert_eq!(scanner.next(), Some(Ok(1)));
    scanner.dispose();
    assert_eq!(scanner.next(), None);
    assert_eq!(fetches.get(), 1);
}

// === Closure fetcher ===

#[test]
fn fn_fetcher_counts_down() {
    let fetcher = fn_fetcher(
        || Ok::<_, Malformed>(3),
        |prev: &i32| Ok(prev - 1),
        |item: &i32| *item == 0,
    );
    let items: Vec<_> = Scanner::new(fetcher).collect();
    assert_eq!(items, vec![Ok(3), Ok(2), Ok(1)]);
}

#[test]
fn fn_fetcher_propagates_errors() {
    let fetcher = fn_fetcher(
        || Ok(10),
        |prev: &i32| if *prev > 5 { Err(Malformed(1)) } else { Ok(*prev) },
        |_: &i32| false,
    );
    let items: Vec<_> = Scanner::new(fetcher).collect();
    assert_eq!(items, vec![Ok(10), Err(Malformed(1))]);
}
