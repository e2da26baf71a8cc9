//! The scanner engine.
//!
//! [`Scanner::advance`] drives the active split strategy over the buffered
//! window, reading from the source whenever the strategy needs more data,
//! until a token is found or scanning stops for good.
//!
//! # Examples
//!
//! ```rust
//! use streamscan::{Scanner, SliceSource, SplitStrategy};
//!
//! let mut scanner = Scanner::new(SliceSource::new(b"one two\r\nthree\n"));
//! let mut lines = Vec::new();
//! while scanner.advance() {
//!     lines.push(scanner.token_text());
//! }
//! assert_eq!(lines, ["one two", "three"]);
//! assert!(scanner.last_error().is_none());
//!
//! let mut scanner = Scanner::with_strategy(SliceSource::new(b" one  two "), SplitStrategy::Words);
//! assert_eq!(scanner.next_token(), Some(b"one".as_slice()));
//! assert_eq!(scanner.next_token(), Some(b"two".as_slice()));
//! assert_eq!(scanner.next_token(), None);
//! ```
//!
//! # Errors and termination
//!
//! Once `advance` returns `false` it keeps returning `false`. What stopped the
//! scanner is reported by [`Scanner::last_error`], in order of precedence:
//!
//! 1. a failure reported by the split strategy,
//! 2. a failure of the source (or a source that stopped making progress),
//! 3. nothing, if the source simply ran out of data.
//!
//! A read failure does not discard buffered data: the strategy gets to turn
//! the remaining bytes into tokens first, and the failure is reported once
//! no more tokens can be produced.

use alloc::string::String;
use core::{fmt, ops::Range};

use bstr::ByteSlice;
use log::{debug, trace, warn};

use crate::{
    buffer::Buffer,
    error::ScanError,
    options::ScannerOptions,
    source::{ReadOutcome, ReadStatus, Source},
    split::{Decision, Split, SplitStrategy},
};

/// How many zero-length advances in a row a strategy may make while yielding
/// tokens before it is considered broken.
const MAX_CONSECUTIVE_EMPTY_TOKENS: usize = 100;

/// The error type of a scanner over source `S` with strategy `P`.
pub type ScannerError<S, P> = ScanError<<S as Source>::Error, <P as Split>::Error>;

/// Where a scanner is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No token is available; the next `advance` will look for one.
    Ready,
    /// The last `advance` produced a token.
    TokenAvailable,
    /// The source ran out and every token was produced.
    Exhausted,
    /// Scanning stopped with an error, see [`Scanner::last_error`].
    Failed,
}

enum State<E> {
    Ready,
    Token(Range<usize>),
    Exhausted,
    Failed(E),
}

/// Splits a byte stream into tokens.
///
/// See the [module documentation](self) for an overview.
pub struct Scanner<S: Source, P: Split = SplitStrategy> {
    source: S,
    split: P,
    buffer: Buffer,
    state: State<ScannerError<S, P>>,
    /// No more reads: the source ended, failed, or made no progress.
    source_done: bool,
    /// A read failure held back until the buffered bytes are used up.
    deferred: Option<ScannerError<S, P>>,
    max_empty_reads: usize,
    empty_tokens: usize,
    started: bool,
}

impl<S: Source> Scanner<S> {
    /// Creates a scanner yielding lines from `source` with default options.
    pub fn new(source: S) -> Self {
        Self::with_split(source, SplitStrategy::Lines)
    }

    /// Creates a scanner using one of the stock strategies with default
    /// options.
    ///
    /// Use [`with_split`](Self::with_split) for strategies with a failure
    /// type of their own.
    pub fn with_strategy(source: S, strategy: SplitStrategy) -> Self {
        Self::with_split(source, strategy)
    }

    /// Creates a scanner using one of the stock strategies and `options`.
    pub fn with_strategy_options(
        source: S,
        strategy: SplitStrategy,
        options: ScannerOptions,
    ) -> Self {
        Self::with_options(source, strategy, options)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Scanner<crate::source::IoSource<R>> {
    /// Creates a scanner yielding lines from `reader` with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::new(crate::source::IoSource::new(reader))
    }
}

impl<S: Source, P: Split> Scanner<S, P> {
    /// Creates a scanner using `split` with default options.
    pub fn with_split(source: S, split: P) -> Self {
        Self::with_options(source, split, ScannerOptions::default())
    }

    /// Creates a scanner using `split` and `options`.
    pub fn with_options(source: S, split: P, options: ScannerOptions) -> Self {
        Self {
            source,
            split,
            buffer: Buffer::new(options.initial_buffer_size, options.max_token_size),
            state: State::Ready,
            source_done: false,
            deferred: None,
            max_empty_reads: options.max_empty_reads,
            empty_tokens: 0,
            started: false,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Configuration
    // --------------------------------------------------------------------------------------------

    /// Replaces the split strategy. Takes effect on the next `advance`.
    pub fn set_split(&mut self, split: P) {
        self.split = split;
    }

    /// Sets the ceiling on buffer growth.
    ///
    /// # Panics
    ///
    /// Panics if scanning has started.
    pub fn set_max_token_size(&mut self, max_token_size: usize) {
        assert!(!self.started, "max token size set after scanning started");
        self.buffer.set_max_size(max_token_size);
    }

    /// Sets the size of the first buffer allocation.
    ///
    /// # Panics
    ///
    /// Panics if scanning has started.
    pub fn set_initial_buffer_size(&mut self, initial_buffer_size: usize) {
        assert!(!self.started, "initial buffer size set after scanning started");
        self.buffer.set_initial_size(initial_buffer_size);
    }

    /// The configured ceiling on buffer growth.
    #[must_use]
    pub fn max_token_size(&self) -> usize {
        self.buffer.max_size()
    }

    /// Current size of the buffer allocation. It only ever grows.
    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    // --------------------------------------------------------------------------------------------
    // Scanning
    // --------------------------------------------------------------------------------------------

    /// Advances to the next token.
    ///
    /// Returns `true` if a token is available through [`token`](Self::token),
    /// and `false` once scanning has stopped, either because the input is
    /// used up or because of an error (see [`last_error`](Self::last_error)).
    /// After returning `false` it always returns `false`.
    ///
    /// May block on the source.
    ///
    /// # Panics
    ///
    /// Panics if the split strategy breaks its contract: advancing past the
    /// window, returning a span outside the window, skipping zero bytes, or
    /// yielding too many empty tokens without consuming input. Also panics if
    /// the source reports more bytes than it was given room for.
    pub fn advance(&mut self) -> bool {
        match self.state {
            State::Exhausted | State::Failed(_) => return false,
            State::Ready | State::Token(_) => self.state = State::Ready,
        }
        self.started = true;
        // The strategy asked for more data with the source exhausted.
        let mut final_pass = false;

        loop {
            if !self.buffer.is_empty() || self.source_done {
                let at_eof = self.source_done;
                let window_len = self.buffer.len();
                let decision = self.split.split(self.buffer.window(), at_eof);
                match decision {
                    Decision::Token { advance, span } => {
                        trace!(target: "streamscan", "token {span:?}, advance {advance} of {window_len}");
                        return self.yield_token(advance, span, window_len);
                    }
                    Decision::Skip(skip) => {
                        trace!(target: "streamscan", "skip {skip} of {window_len}");
                        assert!(skip > 0, "split strategy skipped zero bytes");
                        self.buffer.consume(skip);
                        final_pass = false;
                        continue;
                    }
                    Decision::Fail(err) => return self.fail(ScanError::Split(err)),
                    Decision::Done => return self.finish(),
                    Decision::NeedMoreData if at_eof && !final_pass => {
                        trace!(target: "streamscan", "need more data at end of source; asking once more");
                        final_pass = true;
                        continue;
                    }
                    Decision::NeedMoreData if at_eof => {
                        warn!(
                            target: "streamscan",
                            "split strategy needs more data after end of source; {window_len} bytes dropped"
                        );
                        return self.finish();
                    }
                    Decision::NeedMoreData => {}
                }
            }

            if let Err(err) = self.fill() {
                return self.fail(err);
            }
        }
    }

    /// Advances and returns the next token, or `None` once scanning has
    /// stopped.
    pub fn next_token(&mut self) -> Option<&[u8]> {
        if self.advance() {
            Some(self.token())
        } else {
            None
        }
    }

    /// The token produced by the last successful `advance`.
    ///
    /// Empty if the last `advance` returned `false`. The borrow ends before
    /// the next `advance`; copy the token to keep it longer.
    #[must_use]
    pub fn token(&self) -> &[u8] {
        match &self.state {
            State::Token(range) => self.buffer.slice(range.clone()),
            _ => &[],
        }
    }

    /// The current token as text, with invalid UTF-8 replaced by U+FFFD.
    #[must_use]
    pub fn token_text(&self) -> String {
        self.token().to_str_lossy().into_owned()
    }

    /// The current token as `&str`, if it is valid UTF-8.
    #[must_use]
    pub fn token_str(&self) -> Option<&str> {
        self.token().to_str().ok()
    }

    /// Where the scanner is in its life cycle.
    #[must_use]
    pub fn state(&self) -> ScanState {
        match self.state {
            State::Ready => ScanState::Ready,
            State::Token(_) => ScanState::TokenAvailable,
            State::Exhausted => ScanState::Exhausted,
            State::Failed(_) => ScanState::Failed,
        }
    }

    /// Whether the source will not be read again: it reached its end, failed,
    /// or stopped making progress. Tokens may still be produced from buffered
    /// bytes.
    #[must_use]
    pub fn source_exhausted(&self) -> bool {
        self.source_done
    }

    /// Why scanning stopped.
    ///
    /// `None` while scanning is in progress and after a clean end of input.
    #[must_use]
    pub fn last_error(&self) -> Option<&ScannerError<S, P>> {
        match &self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Consumes the scanner, returning why scanning stopped.
    pub fn into_error(self) -> Option<ScannerError<S, P>> {
        match self.state {
            State::Failed(err) => Some(err),
            _ => None,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Source access
    // --------------------------------------------------------------------------------------------

    /// Returns a reference to the source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the source.
    ///
    /// Reading from it directly loses the data to the scanner.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the source. Buffered bytes are lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    // --------------------------------------------------------------------------------------------
    // Internals
    // --------------------------------------------------------------------------------------------

    fn yield_token(&mut self, advance: usize, span: Range<usize>, window_len: usize) -> bool {
        assert!(
            advance <= window_len,
            "split strategy advanced {advance} bytes in a {window_len}-byte window"
        );
        assert!(
            span.start <= span.end && span.end <= window_len,
            "split strategy returned token {span:?} outside a {window_len}-byte window"
        );

        if advance > 0 {
            self.empty_tokens = 0;
        } else {
            self.empty_tokens += 1;
            assert!(
                self.empty_tokens <= MAX_CONSECUTIVE_EMPTY_TOKENS,
                "split strategy yielded too many empty tokens without progressing"
            );
        }

        let base = self.buffer.start();
        self.buffer.consume(advance);
        self.state = State::Token(base + span.start..base + span.end);
        true
    }

    /// Reads once more into the buffer, making room first.
    ///
    /// Read failures are deferred; only a full buffer is an immediate error.
    fn fill(&mut self) -> Result<(), ScannerError<S, P>> {
        if self.buffer.reserve(1).is_err() {
            debug!(
                target: "streamscan",
                "token exceeds {} bytes", self.buffer.max_size()
            );
            return Err(ScanError::TokenTooLong);
        }

        let mut empty_reads = 0;
        loop {
            let ReadOutcome { count, status } = self.source.read(self.buffer.spare_mut());
            self.buffer.commit(count);
            trace!(target: "streamscan", "read {count} bytes");

            match status {
                ReadStatus::More if count > 0 => return Ok(()),
                ReadStatus::More => {
                    empty_reads += 1;
                    if empty_reads >= self.max_empty_reads {
                        self.defer(ScanError::NoProgress);
                        return Ok(());
                    }
                }
                ReadStatus::EndOfSource => {
                    debug!(target: "streamscan", "end of source");
                    self.source_done = true;
                    return Ok(());
                }
                ReadStatus::Error(err) => {
                    self.defer(ScanError::Read(err));
                    return Ok(());
                }
            }
        }
    }

    fn defer(&mut self, err: ScannerError<S, P>) {
        debug!(target: "streamscan", "source stopped with an error; draining buffered bytes");
        self.deferred = Some(err);
        self.source_done = true;
    }

    fn finish(&mut self) -> bool {
        self.buffer.clear();
        self.state = match self.deferred.take() {
            Some(err) => State::Failed(err),
            None => State::Exhausted,
        };
        debug!(target: "streamscan", "scanner stopped: {:?}", self.state());
        false
    }

    fn fail(&mut self, err: ScannerError<S, P>) -> bool {
        self.buffer.clear();
        self.deferred = None;
        self.state = State::Failed(err);
        debug!(target: "streamscan", "scanner failed");
        false
    }
}

impl<S: Source, P: Split> fmt::Debug for Scanner<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("state", &self.state())
            .field("buffered", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .field("source_exhausted", &self.source_done)
            .finish_non_exhaustive()
    }
}
