//! Token contract for lexers built on `lexkit_core`.
//!
//! The lookahead core never constructs tokens. A lexer peeks and advances to
//! find token boundaries, then hands the matched text to something that
//! implements [`Token`]. [`SimpleToken`] is a ready-made implementation.

mod location;
mod token;

pub use location::TextLocation;
pub use token::{SimpleToken, Token, TokenMismatch};
