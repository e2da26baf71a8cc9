//! Split strategies: the pluggable decision function that finds token
//! boundaries in the buffered window.
//!
//! A strategy is asked to interpret the unconsumed bytes the scanner holds,
//! together with a flag telling it whether the source is exhausted. It answers
//! with a [`Decision`]. The stock strategies are available both as
//! [`SplitStrategy`] variants and as free functions ([`bytes`],
//! [`code_points`], [`words`], [`lines`]) so that custom strategies can wrap
//! them.
//!
//! # Contract
//!
//! - Without the exhausted flag, [`Decision::NeedMoreData`] means the strategy
//!   made no progress: it must not consume anything and ask for more at the
//!   same time.
//! - `advance` and the token span must lie inside the window.
//! - [`Decision::Skip`] must skip at least one byte.
//!
//! Breaking the contract is a bug in the strategy and makes the scanner
//! panic.
//!
//! # Examples
//!
//! A custom strategy that yields comma separated fields:
//!
//! ```rust
//! use core::convert::Infallible;
//!
//! use streamscan::{Decision, Scanner, SliceSource};
//!
//! let fields = |window: &[u8], at_eof: bool| -> Decision<Infallible> {
//!     match window.iter().position(|&b| b == b',') {
//!         Some(i) => Decision::token(i + 1, 0..i),
//!         None if at_eof && !window.is_empty() => Decision::token(window.len(), 0..window.len()),
//!         None if at_eof => Decision::Done,
//!         None => Decision::NeedMoreData,
//!     }
//! };
//!
//! let mut scanner = Scanner::with_split(SliceSource::new(b"a,bb,ccc"), fields);
//! let mut seen = Vec::new();
//! while let Some(field) = scanner.next_token() {
//!     seen.push(field.to_vec());
//! }
//! assert_eq!(seen, [b"a".to_vec(), b"bb".to_vec(), b"ccc".to_vec()]);
//! assert!(scanner.last_error().is_none());
//! ```

use alloc::boxed::Box;
use core::{convert::Infallible, fmt, ops::Range};

use bstr::ByteSlice;

use crate::utf8;

/// What a split strategy decided about the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<E> {
    /// The window does not hold a complete token yet.
    NeedMoreData,
    /// A token was found.
    Token {
        /// Number of bytes to consume from the head of the window.
        advance: usize,
        /// The token, as a range into the window.
        span: Range<usize>,
    },
    /// Consume the given number of bytes without producing a token.
    Skip(usize),
    /// No further tokens will be produced.
    Done,
    /// Stop scanning with the given failure.
    Fail(E),
}

impl<E> Decision<E> {
    /// Shorthand for [`Decision::Token`].
    #[must_use]
    #[inline]
    pub fn token(advance: usize, span: Range<usize>) -> Self {
        Decision::Token { advance, span }
    }
}

/// The capability shared by every split strategy.
///
/// Implemented for [`SplitStrategy`] and for any
/// `FnMut(&[u8], bool) -> Decision<E>` closure.
pub trait Split {
    /// The failure a strategy may report through [`Decision::Fail`].
    type Error;

    /// Interprets `window`, the buffered and not yet consumed bytes.
    ///
    /// `at_eof` is `true` once the source can deliver no more data. The
    /// scanner never calls a strategy with an empty window unless `at_eof` is
    /// set.
    fn split(&mut self, window: &[u8], at_eof: bool) -> Decision<Self::Error>;
}

impl<F, E> Split for F
where
    F: FnMut(&[u8], bool) -> Decision<E>,
{
    type Error = E;

    #[inline]
    fn split(&mut self, window: &[u8], at_eof: bool) -> Decision<E> {
        self(window, at_eof)
    }
}

/// The stock strategies plus an escape hatch for user-defined ones.
///
/// # Default
///
/// [`SplitStrategy::Lines`]
pub enum SplitStrategy<E = Infallible> {
    /// Every byte is a token. See [`bytes`].
    Bytes,
    /// Every UTF-8 encoded scalar value is a token. See [`code_points`].
    CodePoints,
    /// Runs of non-space characters are tokens. See [`words`].
    Words,
    /// Lines, without their terminator. See [`lines`].
    Lines,
    /// A user-defined strategy.
    Custom(Box<dyn Split<Error = E>>),
}

impl<E> Default for SplitStrategy<E> {
    fn default() -> Self {
        SplitStrategy::Lines
    }
}

impl<E> SplitStrategy<E> {
    /// Wraps a user-defined strategy.
    pub fn custom<S>(split: S) -> Self
    where
        S: Split<Error = E> + 'static,
    {
        SplitStrategy::Custom(Box::new(split))
    }
}

impl<E> Split for SplitStrategy<E> {
    type Error = E;

    fn split(&mut self, window: &[u8], at_eof: bool) -> Decision<E> {
        match self {
            SplitStrategy::Bytes => bytes(window, at_eof),
            SplitStrategy::CodePoints => code_points(window, at_eof),
            SplitStrategy::Words => words(window, at_eof),
            SplitStrategy::Lines => lines(window, at_eof),
            SplitStrategy::Custom(split) => split.split(window, at_eof),
        }
    }
}

impl<E> fmt::Debug for SplitStrategy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::Bytes => f.write_str("Bytes"),
            SplitStrategy::CodePoints => f.write_str("CodePoints"),
            SplitStrategy::Words => f.write_str("Words"),
            SplitStrategy::Lines => f.write_str("Lines"),
            SplitStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[inline]
fn empty<E>(at_eof: bool) -> Decision<E> {
    if at_eof {
        Decision::Done
    } else {
        Decision::NeedMoreData
    }
}

/// Yields each byte as its own token.
#[must_use]
pub fn bytes<E>(window: &[u8], at_eof: bool) -> Decision<E> {
    if window.is_empty() {
        return empty(at_eof);
    }
    Decision::token(1, 0..1)
}

/// Yields each UTF-8 encoded scalar value as its own token.
///
/// A malformed or truncated sequence is yielded one byte at a time; decoding
/// such a token with [`utf8::decode`] gives U+FFFD. The strategy asks for
/// more data only while the window holds an incomplete (but so far valid)
/// encoding and the source is not exhausted.
#[must_use]
pub fn code_points<E>(window: &[u8], at_eof: bool) -> Decision<E> {
    let Some(&head) = window.first() else {
        return empty(at_eof);
    };

    // ASCII fast path.
    if head < 0x80 {
        return Decision::token(1, 0..1);
    }

    if !at_eof && !utf8::full_rune(window) {
        return Decision::NeedMoreData;
    }

    let (_, width) = utf8::decode(window);
    Decision::token(width, 0..width)
}

/// Yields runs of non-space characters, dropping the white space between
/// them (see [`utf8::is_space`]). Never yields an empty token.
#[must_use]
pub fn words<E>(window: &[u8], at_eof: bool) -> Decision<E> {
    let mut start = 0;
    while start < window.len() {
        let (ch, width) = utf8::decode(&window[start..]);
        if !utf8::is_space(ch) {
            break;
        }
        start += width;
    }
    if start > 0 {
        return Decision::Skip(start);
    }
    if window.is_empty() {
        return empty(at_eof);
    }

    let mut end = 0;
    while end < window.len() {
        let (ch, width) = utf8::decode(&window[end..]);
        if utf8::is_space(ch) {
            return Decision::token(end + width, 0..end);
        }
        end += width;
    }

    // The word may continue in data not read yet.
    if at_eof {
        Decision::token(window.len(), 0..window.len())
    } else {
        Decision::NeedMoreData
    }
}

/// Yields lines with their terminator removed.
///
/// The terminator is one optional carriage return followed by a mandatory
/// newline (`\r?\n`). The last line may lack a newline; a trailing carriage
/// return is stripped from it as well. An empty final line (input ending in
/// `\n\n`) is yielded, but no empty token follows a final terminator.
#[must_use]
pub fn lines<E>(window: &[u8], at_eof: bool) -> Decision<E> {
    if window.is_empty() {
        return empty(at_eof);
    }
    if let Some(i) = window.find_byte(b'\n') {
        return Decision::token(i + 1, 0..without_cr(&window[..i]));
    }
    if at_eof {
        return Decision::token(window.len(), 0..without_cr(window));
    }
    Decision::NeedMoreData
}

#[inline]
fn without_cr(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}
