//! The token contract.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::TextLocation;

/// A classified span of source text.
///
/// `K` is the classification tag, usually a fieldless enum.
pub trait Token<K: Copy + PartialEq + fmt::Debug> {
    /// Identifier of the source the token came from (file name, buffer id).
    fn source(&self) -> &str;

    /// Where the token starts.
    fn location(&self) -> TextLocation;

    /// Literal text of the token.
    fn value(&self) -> &str;

    /// Classification tag.
    fn kind(&self) -> K;

    /// Returns `true` if the token is classified as `kind`.
    fn is_of(&self, kind: K) -> bool {
        self.kind() == kind
    }

    /// Fail unless the token is classified as `kind`.
    fn verify_is_of(&self, kind: K) -> Result<(), TokenMismatch<K>> {
        if self.is_of(kind) {
            Ok(())
        } else {
            Err(TokenMismatch {
                expected: kind,
                found: self.kind(),
                location: self.location(),
            })
        }
    }
}

/// A token had a different classification than required.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("expected {expected:?} at {location}, found {found:?}")]
pub struct TokenMismatch<K: fmt::Debug> {
    pub expected: K,
    pub found: K,
    pub location: TextLocation,
}

/// Owned token with a shared source identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleToken<K> {
    source: Rc<str>,
    location: TextLocation,
    value: String,
    kind: K,
}

impl<K> SimpleToken<K> {
    pub fn new(
        source: Rc<str>,
        location: TextLocation,
        value: impl Into<String>,
        kind: K,
    ) -> Self {
        SimpleToken {
            source,
            location,
            value: value.into(),
            kind,
        }
    }
}

impl<K: Copy + PartialEq + fmt::Debug> Token<K> for SimpleToken<K> {
    fn source(&self) -> &str {
        &self.source
    }

    fn location(&self) -> TextLocation {
        self.location
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn kind(&self) -> K {
        self.kind
    }
}
