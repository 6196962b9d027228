//! Fixed-window lookahead: peek depth bounded at construction.

use std::collections::VecDeque;
use std::fmt;

use super::{Items, Lookahead, Producer};
use crate::window::{pull_into, WindowState};
use crate::LookaheadError;

/// Largest window `FixedLookahead::new` reserves up front.
const PREALLOCATED_LIMIT: usize = 1024;

/// Lookahead buffer whose window never grows past `max_lookahead + 1` items.
///
/// Up to 1024 slots are allocated at construction; deeper
/// windows grow on demand. Asking for more lookahead than the window holds is
/// a contract violation, reported as
/// [`LookaheadError::LookaheadOutOfRange`] without touching the producer.
pub struct FixedLookahead<P: Producer> {
    producer: P,
    /// Items from the current one forward; the front is always current.
    window: VecDeque<P::Item>,
    max_lookahead: usize,
    state: WindowState<P::Item>,
}

impl<P: Producer> FixedLookahead<P> {
    /// Wrap a producer, allowing peeks up to `max_lookahead` items ahead.
    pub fn new(producer: P, max_lookahead: usize) -> Self {
        FixedLookahead {
            producer,
            window: VecDeque::with_capacity(
                max_lookahead.saturating_add(1).min(PREALLOCATED_LIMIT),
            ),
            max_lookahead,
            state: WindowState::new(),
        }
    }

    /// Report `generate(last_item)` for every position at or past the end.
    ///
    /// Has no effect once the end of the sequence has been found.
    #[must_use]
    pub fn with_end_item<G>(mut self, generate: G) -> Self
    where
        G: Fn(&P::Item) -> P::Item + 'static,
    {
        self.state.set_end_item(Box::new(generate));
        self
    }

    /// Deepest lookahead this buffer accepts.
    pub fn max_lookahead(&self) -> usize {
        self.max_lookahead
    }

    /// Shared access to the producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }
}

impl<I: Iterator> FixedLookahead<Items<I>> {
    /// Buffer over an iterator that cannot fail.
    pub fn from_items(items: impl IntoIterator<IntoIter = I>, max_lookahead: usize) -> Self {
        FixedLookahead::new(Items::new(items), max_lookahead)
    }
}

impl<P> Lookahead for FixedLookahead<P>
where
    P: Producer,
    P::Item: Clone + Default,
{
    type Item = P::Item;
    type Error = P::Error;

    fn window_state(&self) -> &WindowState<P::Item> {
        &self.state
    }

    fn window_len(&self) -> usize {
        self.window.len()
    }

    fn ensure_lookahead(&mut self, lookahead: usize) -> Result<(), LookaheadError<P::Error>> {
        if lookahead > self.max_lookahead {
            return Err(LookaheadError::LookaheadOutOfRange {
                requested: lookahead,
                max: self.max_lookahead,
            });
        }
        self.state.mark_initialized();
        let available = self.window.len();
        if lookahead < available || self.state.sentinel_for(lookahead).is_some() {
            return Ok(());
        }
        pull_into(
            &mut self.producer,
            &mut self.window,
            0,
            (lookahead - available).saturating_add(1),
            &mut self.state,
        )
    }

    #[inline]
    fn raw_peek_at(&self, lookahead: usize) -> Option<&P::Item> {
        self.state
            .sentinel_for(lookahead)
            .or_else(|| self.window.get(lookahead))
    }

    fn move_to_next(&mut self) -> Result<(), LookaheadError<P::Error>> {
        if let Some(item) = self.window.pop_front() {
            self.state.retire(item);
        }
        self.state.step();
        self.ensure_lookahead(0)
    }
}

impl<P> fmt::Debug for FixedLookahead<P>
where
    P: Producer + fmt::Debug,
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedLookahead")
            .field("producer", &self.producer)
            .field("window", &self.window)
            .field("max_lookahead", &self.max_lookahead)
            .field("state", &self.state)
            .finish()
    }
}
