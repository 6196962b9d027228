//! Position and end-of-sequence bookkeeping shared by lookahead strategies.
//!
//! Every strategy keeps its own window of materialized items, but the answers
//! to "where am I", "has the producer run dry", and "what do I report past the
//! end" are identical, so they live in [`WindowState`].
//!
//! # Sentinel
//!
//! When the producer signals exhaustion the state records the absolute end
//! position and computes the sentinel once: the last real item (or
//! `T::default()` if there never was one), passed through the end-item
//! generator if the caller supplied one. Neither value changes afterwards.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::lookahead::Producer;
use crate::LookaheadError;

/// Transform from the last real item to the sentinel reported past the end.
pub(crate) type EndItemFn<T> = Box<dyn Fn(&T) -> T>;

/// Observable lifecycle of a lookahead buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No operation has touched the producer yet.
    Uninitialized,
    /// Real items remain at or after the current position.
    Active,
    /// The current position is at or past the end; every peek answers with
    /// the sentinel. Not terminal: `advance` keeps counting positions.
    ExhaustedTail,
    /// A fetch error propagated; the buffer refuses further use.
    Poisoned,
}

/// Recorded end of the sequence.
struct EndOfSequence<T> {
    /// Absolute position of the first slot with no real item.
    position: usize,
    sentinel: T,
}

/// Cursor position, end-of-sequence state and poisoning shared by strategies.
pub struct WindowState<T> {
    /// Number of `advance` calls since creation.
    position: usize,
    end: Option<EndOfSequence<T>>,
    end_item: Option<EndItemFn<T>>,
    /// Most recent item reclaimed from the window. Stands in for the last real
    /// item when the end is found with an empty window.
    retired: Option<T>,
    initialized: bool,
    poisoned: bool,
}

impl<T> WindowState<T> {
    pub(crate) fn new() -> Self {
        WindowState {
            position: 0,
            end: None,
            end_item: None,
            retired: None,
            initialized: false,
            poisoned: false,
        }
    }

    /// Install the end-item generator. Ignored once the end has been found.
    pub(crate) fn set_end_item(&mut self, generate: EndItemFn<T>) {
        if self.end.is_none() {
            self.end_item = Some(generate);
        }
    }

    /// Number of items consumed since creation.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Absolute position at which the producer signalled exhaustion.
    pub fn end_position(&self) -> Option<usize> {
        self.end.as_ref().map(|end| end.position)
    }

    /// Returns `true` once the producer has signalled exhaustion.
    pub fn is_end_found(&self) -> bool {
        self.end.is_some()
    }

    /// The sentinel item, once the end has been found.
    pub fn sentinel(&self) -> Option<&T> {
        self.end.as_ref().map(|end| &end.sentinel)
    }

    /// Returns `true` once a fetch error has propagated.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        if self.poisoned {
            Phase::Poisoned
        } else if !self.initialized {
            Phase::Uninitialized
        } else if self.sentinel_for(0).is_some() {
            Phase::ExhaustedTail
        } else {
            Phase::Active
        }
    }

    /// The sentinel, if `lookahead` positions ahead of the cursor lies at or
    /// beyond the end of the sequence.
    #[inline]
    pub fn sentinel_for(&self, lookahead: usize) -> Option<&T> {
        let end = self.end.as_ref()?;
        (self.position.saturating_add(lookahead) >= end.position).then_some(&end.sentinel)
    }

    /// Fail fast if a previous fetch error poisoned the buffer.
    pub(crate) fn check_usable<E>(&self) -> Result<(), LookaheadError<E>> {
        if self.poisoned {
            Err(LookaheadError::Poisoned)
        } else {
            Ok(())
        }
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(crate) fn poison(&mut self) {
        debug!(position = self.position, "fetch failed; lookahead buffer poisoned");
        self.poisoned = true;
    }

    /// Move the position forward by one consumed item.
    pub(crate) fn step(&mut self) {
        self.position = self.position.saturating_add(1);
    }

    /// Remember an item dropped from the front of the window.
    pub(crate) fn retire(&mut self, item: T) {
        self.retired = Some(item);
    }
}

impl<T: Clone + Default> WindowState<T> {
    /// Record that the producer ran dry at absolute position `at`.
    ///
    /// `last_in_window` is the newest item still materialized; when the window
    /// is empty the most recently retired item is used instead.
    pub(crate) fn record_end(&mut self, at: usize, last_in_window: Option<&T>) {
        if self.end.is_some() {
            return;
        }
        let last = last_in_window
            .or(self.retired.as_ref())
            .cloned()
            .unwrap_or_default();
        let sentinel = match &self.end_item {
            Some(generate) => generate(&last),
            None => last,
        };
        debug!(end_position = at, "end of sequence found");
        self.end = Some(EndOfSequence {
            position: at,
            sentinel,
        });
        self.retired = None;
    }
}

impl<T: fmt::Debug> fmt::Debug for WindowState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowState")
            .field("position", &self.position)
            .field("end_position", &self.end_position())
            .field("sentinel", &self.sentinel())
            .field("has_end_item", &self.end_item.is_some())
            .field("initialized", &self.initialized)
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}

/// Pull up to `amount` items from `producer` onto the back of `window`.
///
/// `cursor` is the index of the current item in `window`. Stops early and
/// records the end position the moment the producer yields nothing. A fetch
/// error poisons `state` and propagates unchanged.
pub(crate) fn pull_into<P>(
    producer: &mut P,
    window: &mut VecDeque<P::Item>,
    cursor: usize,
    amount: usize,
    state: &mut WindowState<P::Item>,
) -> Result<(), LookaheadError<P::Error>>
where
    P: Producer,
    P::Item: Clone + Default,
{
    if state.is_end_found() {
        return Ok(());
    }
    for _ in 0..amount {
        match producer.pull() {
            Some(Ok(item)) => window.push_back(item),
            Some(Err(err)) => {
                state.poison();
                return Err(LookaheadError::Fetch(err));
            }
            None => {
                let ahead = window.len() - cursor;
                state.record_end(state.position() + ahead, window.back());
                return Ok(());
            }
        }
    }
    trace!(
        pulled = amount,
        materialized = window.len(),
        "lookahead window filled"
    );
    Ok(())
}
