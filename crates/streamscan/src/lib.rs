//! An incremental token scanner over byte streams of unknown length.
//!
//! A [`Scanner`] reads from a [`Source`] into a growable buffer and splits the
//! buffered bytes into tokens with a pluggable [`Split`] strategy: bytes,
//! UTF-8 code points, white-space separated words, lines, or anything a
//! closure can decide.
//!
//! ```rust
//! use streamscan::{Scanner, SliceSource, SplitStrategy};
//!
//! let input = "the quick\nbrown  fox\n";
//!
//! let mut scanner = Scanner::new(SliceSource::new(input.as_bytes()));
//! let mut lines = 0;
//! while scanner.advance() {
//!     lines += 1;
//! }
//! assert_eq!(lines, 2);
//!
//! let mut words = Scanner::with_strategy(SliceSource::new(input.as_bytes()), SplitStrategy::Words);
//! let mut longest = Vec::new();
//! while let Some(word) = words.next_token() {
//!     if word.len() > longest.len() {
//!         longest = word.to_vec();
//!     }
//! }
//! assert_eq!(longest, b"quick");
//! assert!(words.last_error().is_none());
//! ```
//!
//! Tokens borrow the scanner's buffer and are only valid until the next call
//! to [`Scanner::advance`]; the borrow checker enforces this.
//!
//! # Features
//!
//! - `std` (default): [`IoSource`] for any `std::io::Read`, and
//!   [`Scanner::from_reader`].
//!
//! Without `std` the crate needs only `alloc`.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod error;
mod options;
mod scanner;
pub mod source;
pub mod split;
pub mod utf8;

#[cfg(test)]
mod tests;

pub use error::ScanError;
pub use options::{
    DEFAULT_MAX_TOKEN_SIZE, MAX_CONSECUTIVE_EMPTY_READS, START_BUFFER_SIZE, ScannerOptions,
};
pub use scanner::{ScanState, Scanner, ScannerError};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{FromFn, ReadOutcome, ReadStatus, SliceSource, Source, from_fn};
pub use split::{Decision, Split, SplitStrategy};
