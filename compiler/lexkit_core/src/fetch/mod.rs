//! Fetch-driven scanning.
//!
//! A [`Fetcher`] is the smallest pull contract over a raw item source: make
//! the first item, make the next item from the previous one, classify an item
//! as the end marker, release the source. [`Scanner`] turns that contract into
//! a forward-only, single-pass iterator of `Result<Item, Error>` that a
//! lookahead buffer can consume.
//!
//! # Resource Release
//!
//! The scanner owns its fetcher. [`Scanner::dispose`] forwards to
//! [`Fetcher::dispose`] at most once, and `Drop` calls it, so the wrapped
//! resource is released exactly once whether the scanner is disposed
//! explicitly, dropped after running to completion, or dropped while an error
//! unwinds out of the lexer.

use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

/// Pull contract over a raw item source.
///
/// Implementations are stateful: the scanner calls [`fetch_initial`] once and
/// then [`fetch_next`] with the previously produced item until [`is_end`]
/// classifies an item as the end marker.
///
/// [`fetch_initial`]: Fetcher::fetch_initial
/// [`fetch_next`]: Fetcher::fetch_next
/// [`is_end`]: Fetcher::is_end
pub trait Fetcher {
    /// Item produced by the source.
    type Item;
    /// Failure raised while fetching (malformed data, I/O).
    type Error;

    /// Produce the first item. Called at most once, before any `fetch_next`.
    fn fetch_initial(&mut self) -> Result<Self::Item, Self::Error>;

    /// Produce the item following `previous`.
    ///
    /// Only called after a fetch whose item was not classified as the end.
    fn fetch_next(&mut self, previous: &Self::Item) -> Result<Self::Item, Self::Error>;

    /// Returns `true` if `item` marks the end of the sequence.
    ///
    /// Must be consistent: the same item always classifies the same way.
    fn is_end(&self, item: &Self::Item) -> bool;

    /// Release any held resource. Must tolerate repeated calls.
    fn dispose(&mut self) {}
}

/// A [`Fetcher`] assembled from closures.
///
/// Built by [`fn_fetcher`]. Holds no resource, so disposal is a no-op.
pub struct FnFetcher<I, N, P> {
    initial: I,
    next: N,
    is_end: P,
}

/// Build a [`Fetcher`] from an initial-item closure, a next-item closure, and
/// an end predicate.
///
/// ```
/// use lexkit_core::{fn_fetcher, Scanner};
///
/// let fetcher = fn_fetcher(
///     || Ok::<_, std::convert::Infallible>(1u32),
///     |prev: &u32| Ok(prev * 2),
///     |item: &u32| *item > 8,
/// );
/// let items: Vec<_> = Scanner::new(fetcher).filter_map(Result::ok).collect();
/// assert_eq!(items, [1, 2, 4, 8]);
/// ```
pub fn fn_fetcher<T, E, I, N, P>(initial: I, next: N, is_end: P) -> FnFetcher<I, N, P>
where
    I: FnMut() -> Result<T, E>,
    N: FnMut(&T) -> Result<T, E>,
    P: Fn(&T) -> bool,
{
    FnFetcher {
        initial,
        next,
        is_end,
    }
}

impl<T, E, I, N, P> Fetcher for FnFetcher<I, N, P>
where
    I: FnMut() -> Result<T, E>,
    N: FnMut(&T) -> Result<T, E>,
    P: Fn(&T) -> bool,
{
    type Item = T;
    type Error = E;

    fn fetch_initial(&mut self) -> Result<T, E> {
        (self.initial)()
    }

    fn fetch_next(&mut self, previous: &T) -> Result<T, E> {
        (self.next)(previous)
    }

    fn is_end(&self, item: &T) -> bool {
        (self.is_end)(item)
    }
}

impl<I, N, P> fmt::Debug for FnFetcher<I, N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

/// Lifecycle of a [`Scanner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// No item has been fetched yet.
    NotStarted,
    /// At least one real item has been produced and the end is not reached.
    Running,
    /// The fetcher reported the end marker, or the scanner was disposed.
    Ended,
    /// The fetcher failed; the error has been handed out once.
    Failed,
}

/// Adapter turning a [`Fetcher`] into a single-pass iterator.
///
/// Yields `Ok(item)` for each real item, `Err(e)` once if the fetcher fails,
/// and `None` forever after the end marker, a failure, or disposal.
pub struct Scanner<F: Fetcher> {
    fetcher: F,
    state: ScanState,
    /// Last real item, fed back into `fetch_next`.
    previous: Option<F::Item>,
    /// Item the fetcher classified as the end, kept for callers that want it.
    end_marker: Option<F::Item>,
    disposed: bool,
}

impl<F: Fetcher> Scanner<F> {
    /// Wrap a fetcher whose resource is already open.
    pub fn new(fetcher: F) -> Self {
        Scanner {
            fetcher,
            state: ScanState::NotStarted,
            previous: None,
            end_marker: None,
            disposed: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Returns `true` once the fetcher's resource has been released.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Shared access to the wrapped fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The item the fetcher classified as the end marker, once seen.
    pub fn end_marker(&self) -> Option<&F::Item> {
        self.end_marker.as_ref()
    }

    /// Release the fetcher's resource.
    ///
    /// Forwards to [`Fetcher::dispose`] on the first call only. A disposed
    /// scanner yields nothing further.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if self.state != ScanState::Failed {
            self.state = ScanState::Ended;
        }
        self.previous = None;
        self.fetcher.dispose();
        debug!("scanner disposed its fetcher");
    }

    fn fetch(&mut self) -> Option<Result<F::Item, F::Error>> {
        match self.state {
            ScanState::NotStarted => Some(self.fetcher.fetch_initial()),
            ScanState::Running => {
                let previous = self.previous.as_ref()?;
                Some(self.fetcher.fetch_next(previous))
            }
            ScanState::Ended | ScanState::Failed => None,
        }
    }
}

impl<F> Iterator for Scanner<F>
where
    F: Fetcher,
    F::Item: Clone,
{
    type Item = Result<F::Item, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.fetch()? {
            Ok(item) if self.fetcher.is_end(&item) => {
                trace!(state = ?self.state, "fetcher reported end of sequence");
                self.state = ScanState::Ended;
                self.previous = None;
                self.end_marker = Some(item);
                None
            }
            Ok(item) => {
                self.state = ScanState::Running;
                self.previous = Some(item.clone());
                Some(Ok(item))
            }
            Err(err) => {
                debug!("fetcher failed; scanner stops producing");
                self.state = ScanState::Failed;
                self.previous = None;
                Some(Err(err))
            }
        }
    }
}

impl<F> FusedIterator for Scanner<F>
where
    F: Fetcher,
    F::Item: Clone,
{
}

impl<F: Fetcher> Drop for Scanner<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<F> fmt::Debug for Scanner<F>
where
    F: Fetcher + fmt::Debug,
    F::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("fetcher", &self.fetcher)
            .field("state", &self.state)
            .field("previous", &self.previous)
            .field("end_marker", &self.end_marker)
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
