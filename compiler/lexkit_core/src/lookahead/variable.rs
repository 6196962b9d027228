//! Variable-window lookahead: unbounded depth, window grows on demand.

use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use super::{Items, Lookahead, Producer};
use crate::window::{pull_into, WindowState};
use crate::LookaheadError;

/// What happens to items once the cursor has moved past them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reclaim {
    /// Drop consumed items immediately. The window never holds more than the
    /// deepest lookahead requested plus one.
    #[default]
    Eager,
    /// Keep every consumed item in the window. Memory grows with the stream;
    /// observable results are the same as with `Eager`.
    Retain,
}

/// Lookahead buffer with no bound on peek depth.
///
/// ```
/// use lexkit_core::{Lookahead, VariableLookahead};
///
/// let mut buf = VariableLookahead::from_items([1, 2, 3]).with_end_item(|last: &i32| last * 0);
/// assert_eq!(buf.peek(5), Ok(&0));
/// assert_eq!(buf.peek(1), Ok(&2));
/// ```
pub struct VariableLookahead<P: Producer> {
    producer: P,
    window: VecDeque<P::Item>,
    /// Index of the current item in `window`. Always 0 under `Reclaim::Eager`.
    cursor: usize,
    reclaim: Reclaim,
    state: WindowState<P::Item>,
}

impl<P: Producer> VariableLookahead<P> {
    /// Wrap a producer that has not started yet. Nothing is pulled until the
    /// first `peek` or `advance`.
    pub fn new(producer: P) -> Self {
        VariableLookahead {
            producer,
            window: VecDeque::new(),
            cursor: 0,
            reclaim: Reclaim::default(),
            state: WindowState::new(),
        }
    }

    /// Report `generate(last_item)` for every position at or past the end
    /// instead of the last item itself.
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

    /// Choose what happens to consumed items.
    #[must_use]
    pub fn with_reclaim(mut self, reclaim: Reclaim) -> Self {
        self.reclaim = reclaim;
        self
    }

    /// Reserve room for `capacity` items up front.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.window.reserve(capacity);
        self
    }

    /// The reclamation mode in effect.
    pub fn reclaim(&self) -> Reclaim {
        self.reclaim
    }

    /// Items consumed but still held because of `Reclaim::Retain`.
    pub fn retained(&self) -> impl Iterator<Item = &P::Item> {
        self.window.iter().take(self.cursor)
    }

    /// Shared access to the producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }
}

impl<I: Iterator> VariableLookahead<Items<I>> {
    /// Buffer over an iterator that cannot fail.
    pub fn from_items(items: impl IntoIterator<IntoIter = I>) -> Self {
        VariableLookahead::new(Items::new(items))
    }
}

impl<P> Lookahead for VariableLookahead<P>
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
        self.state.mark_initialized();
        let available = self.window.len() - self.cursor;
        if lookahead < available || self.state.sentinel_for(lookahead).is_some() {
            return Ok(());
        }
        let deficit = (lookahead - available).saturating_add(1);
        pull_into(
            &mut self.producer,
            &mut self.window,
            self.cursor,
            deficit,
            &mut self.state,
        )
    }

    #[inline]
    fn raw_peek_at(&self, lookahead: usize) -> Option<&P::Item> {
        self.state
            .sentinel_for(lookahead)
            .or_else(|| self.window.get(self.cursor.checked_add(lookahead)?))
    }

    fn move_to_next(&mut self) -> Result<(), LookaheadError<P::Error>> {
        if self.cursor < self.window.len() {
            match self.reclaim {
                Reclaim::Eager => {
                    if let Some(item) = self.window.pop_front() {
                        self.state.retire(item);
                    }
                }
                Reclaim::Retain => self.cursor += 1,
            }
        } else {
            trace!(position = self.state.position(), "advancing past the end");
        }
        self.state.step();
        self.ensure_lookahead(0)
    }
}

impl<P> fmt::Debug for VariableLookahead<P>
where
    P: Producer + fmt::Debug,
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableLookahead")
            .field("producer", &self.producer)
            .field("window", &self.window)
            .field("cursor", &self.cursor)
            .field("reclaim", &self.reclaim)
            .field("state", &self.state)
            .finish()
    }
}
