//! Lookahead buffers over lazily-produced sequences.
//!
//! [`Lookahead`] is the cursor a lexer drives: [`peek`](Lookahead::peek) to
//! decide which rule matches, [`advance`](Lookahead::advance) to consume the
//! match. Two strategies implement it:
//!
//! - [`VariableLookahead`]: any lookahead depth, window grows on demand and is
//!   reclaimed behind the cursor.
//! - [`FixedLookahead`]: lookahead bounded at construction, window
//!   reserved up front.
//!
//! Both pull from a [`Producer`] only as far as a peek has required.

mod fixed;
mod variable;

pub use fixed::FixedLookahead;
pub use variable::{Reclaim, VariableLookahead};

use crate::window::{Phase, WindowState};
use crate::LookaheadError;

/// Pull one item or signal that there are none.
///
/// Implemented for every iterator of `Result`s, including
/// [`Scanner`](crate::Scanner). Wrap infallible iterators in [`Items`].
pub trait Producer {
    /// Item produced.
    type Item;
    /// Failure raised while producing.
    type Error;

    /// Produce the next item, `None` once the sequence is exhausted.
    fn pull(&mut self) -> Option<Result<Self::Item, Self::Error>>;
}

impl<I, T, E> Producer for I
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = T;
    type Error = E;

    #[inline]
    fn pull(&mut self) -> Option<Result<T, E>> {
        self.next()
    }
}

/// [`Producer`] over an iterator that cannot fail.
#[derive(Clone, Debug)]
pub struct Items<I>(I);

impl<I: Iterator> Items<I> {
    pub fn new(items: impl IntoIterator<IntoIter = I>) -> Self {
        Items(items.into_iter())
    }
}

impl<I: Iterator> Producer for Items<I> {
    type Item = I::Item;
    type Error = std::convert::Infallible;

    #[inline]
    fn pull(&mut self) -> Option<Result<I::Item, Self::Error>> {
        self.0.next().map(Ok)
    }
}

/// Positioned, forward-only cursor with lookahead over a producer.
///
/// Strategies implement the hooks ([`ensure_lookahead`], [`raw_peek_at`],
/// [`move_to_next`], [`window_state`], [`window_len`]); the public operations
/// are provided on top of them and behave identically for every strategy.
///
/// # Contract
///
/// - `peek(k)` is idempotent between advances.
/// - After `advance()`, `peek(0)` is what `peek(1)` was before.
/// - Once the producer ends at position `p`, every peek at an absolute
///   position `>= p` returns the same sentinel item.
/// - A producer error propagates out of the triggering call; the buffer is
///   poisoned and every later call fails with [`LookaheadError::Poisoned`].
///
/// [`ensure_lookahead`]: Lookahead::ensure_lookahead
/// [`raw_peek_at`]: Lookahead::raw_peek_at
/// [`move_to_next`]: Lookahead::move_to_next
/// [`window_state`]: Lookahead::window_state
/// [`window_len`]: Lookahead::window_len
pub trait Lookahead {
    /// Item held in the window.
    type Item;
    /// Error raised by the underlying producer.
    type Error;

    /// Shared position and end-of-sequence bookkeeping.
    fn window_state(&self) -> &WindowState<Self::Item>;

    /// Number of items currently materialized in memory.
    fn window_len(&self) -> usize;

    /// Make sure the item `lookahead` positions ahead of the cursor is either
    /// materialized or known to lie past the end.
    ///
    /// Pulls exactly `lookahead - available + 1` items when fewer than
    /// `lookahead + 1` are available ahead of the cursor, stopping early at
    /// the end of the sequence.
    fn ensure_lookahead(&mut self, lookahead: usize) -> Result<(), LookaheadError<Self::Error>>;

    /// Item `lookahead` positions ahead of the cursor, or the sentinel.
    ///
    /// Never pulls. Returns `None` if the item has not been materialized yet,
    /// which cannot happen after `ensure_lookahead(lookahead)` succeeded.
    fn raw_peek_at(&self, lookahead: usize) -> Option<&Self::Item>;

    /// Consume the current item, reclaim window space and prefetch one item.
    ///
    /// Only valid after `ensure_lookahead(0)` succeeded.
    fn move_to_next(&mut self) -> Result<(), LookaheadError<Self::Error>>;

    /// Item `lookahead` positions ahead of the current one.
    fn peek(&mut self, lookahead: usize) -> Result<&Self::Item, LookaheadError<Self::Error>> {
        self.window_state().check_usable::<Self::Error>()?;
        self.ensure_lookahead(lookahead)?;
        match self.raw_peek_at(lookahead) {
            Some(item) => Ok(item),
            None => unreachable!("ensure_lookahead left lookahead {lookahead} unmaterialized"),
        }
    }

    /// Consume the current item.
    ///
    /// Past the end this only moves the position; the sentinel stays current.
    fn advance(&mut self) -> Result<(), LookaheadError<Self::Error>> {
        self.window_state().check_usable::<Self::Error>()?;
        self.ensure_lookahead(0)?;
        self.move_to_next()
    }

    /// Consume the current item and return it.
    fn bump(&mut self) -> Result<Self::Item, LookaheadError<Self::Error>>
    where
        Self::Item: Clone,
    {
        let item = self.peek(0)?.clone();
        self.advance()?;
        Ok(item)
    }

    /// Consume `count` items.
    fn advance_by(&mut self, count: usize) -> Result<(), LookaheadError<Self::Error>> {
        for _ in 0..count {
            self.advance()?;
        }
        Ok(())
    }

    /// Consume items while `predicate` holds for the current one, stopping at
    /// the end of the sequence. Returns the number of items consumed.
    fn advance_while<F>(&mut self, mut predicate: F) -> Result<usize, LookaheadError<Self::Error>>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        let mut consumed = 0;
        loop {
            self.peek(0)?;
            if self.window_state().sentinel_for(0).is_some()
                || !self.raw_peek_at(0).is_some_and(&mut predicate)
            {
                return Ok(consumed);
            }
            self.advance()?;
            consumed += 1;
        }
    }

    /// Returns `true` if the current position is at or past the end.
    ///
    /// May pull one item to find out.
    fn is_at_end(&mut self) -> Result<bool, LookaheadError<Self::Error>> {
        self.peek(0)?;
        Ok(self.window_state().sentinel_for(0).is_some())
    }

    /// Number of items consumed since creation.
    fn position(&self) -> usize {
        self.window_state().position()
    }

    /// Absolute position at which the producer signalled exhaustion.
    fn end_position(&self) -> Option<usize> {
        self.window_state().end_position()
    }

    /// Returns `true` once the producer has signalled exhaustion.
    fn is_end_found(&self) -> bool {
        self.window_state().is_end_found()
    }

    /// Current lifecycle phase.
    fn phase(&self) -> Phase {
        self.window_state().phase()
    }
}
