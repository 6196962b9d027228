//! Errors surfaced by lookahead buffers.
//!
//! Reaching the end of the sequence is not an error and has no variant here;
//! it is answered with the sentinel item.

use thiserror::Error;

/// Failure raised by a [`Lookahead`](crate::Lookahead) operation.
///
/// `E` is the error type of the underlying producer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookaheadError<E> {
    /// The producer failed while the buffer was pulling items.
    ///
    /// The buffer is poisoned afterwards.
    #[error("failed to fetch the next item")]
    Fetch(#[source] E),
    /// The buffer was used after a fetch failure had propagated out of it.
    #[error("lookahead buffer used after a fetch failure")]
    Poisoned,
    /// A fixed-window buffer was asked to look further than its window.
    #[error("lookahead {requested} exceeds the fixed window maximum of {max}")]
    LookaheadOutOfRange { requested: usize, max: usize },
}

impl<E> LookaheadError<E> {
    /// Returns the producer error, if this is a fetch failure.
    pub fn into_fetch_error(self) -> Option<E> {
        match self {
            LookaheadError::Fetch(err) => Some(err),
            LookaheadError::Poisoned | LookaheadError::LookaheadOutOfRange { .. } => None,
        }
    }

    /// Returns `true` for errors caused by misuse of the buffer rather than
    /// by the producer.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, LookaheadError::Fetch(_))
    }
}
