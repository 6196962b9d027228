//! Lookahead input buffering for hand-written lexers.
//!
//! This crate lets a tokenizer read an arbitrary-length sequence of items
//! (characters, bytes, or already-scanned sub-tokens) with unbounded-depth
//! lookahead, without re-reading the source and without special-casing
//! end-of-input.
//!
//! - [`Fetcher`]: the minimal pull contract (first, next, is-end, dispose)
//!   wrapping a raw item source.
//! - [`Scanner`]: adapts a `Fetcher` into a single-pass [`Producer`].
//! - [`Lookahead`]: `peek(k)` / `advance()` over any producer, with two
//!   strategies: [`VariableLookahead`] (unbounded, reclaiming) and
//!   [`FixedLookahead`] (bounded ring window).
//!
//! # End of Sequence
//!
//! Once the producer runs dry, every peek at or beyond the end position
//! answers with a stable sentinel item: the last real item, or whatever the
//! caller's end-item generator makes of it. Exhaustion is never an error.
//!
//! # Example
//!
//! ```
//! use lexkit_core::{Lookahead, VariableLookahead};
//!
//! let mut buf = VariableLookahead::from_items([1, 2, 3]);
//! assert_eq!(buf.peek(2), Ok(&3));
//! assert!(buf.advance().is_ok());
//! assert_eq!(buf.peek(0), Ok(&2));
//! assert_eq!(buf.peek(100), Ok(&3));
//! ```

mod error;
mod fetch;
mod lookahead;
mod window;

pub use error::LookaheadError;
pub use fetch::{fn_fetcher, FnFetcher, Fetcher, ScanState, Scanner};
pub use lookahead::{FixedLookahead, Items, Lookahead, Producer, Reclaim, VariableLookahead};
pub use window::{Phase, WindowState};
