/// The largest token a scanner buffers unless configured otherwise: 64 KiB.
///
/// The actual limit is slightly smaller, as the buffer may also hold a
/// terminator such as a newline.
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 64 * 1024;

/// Size of the first buffer allocation: 4 KiB.
pub const START_BUFFER_SIZE: usize = 4096;

/// How many reads in a row may return no data and no error before the scanner
/// gives up with [`ScanError::NoProgress`](crate::ScanError::NoProgress).
pub const MAX_CONSECUTIVE_EMPTY_READS: usize = 100;

/// Configuration for a [`Scanner`](crate::Scanner).
///
/// Options are fixed once scanning starts.
///
/// # Examples
///
/// ```rust
/// use streamscan::{Scanner, ScannerOptions, SliceSource, SplitStrategy};
///
/// let options = ScannerOptions {
///     max_token_size: 256,
///     ..Default::default()
/// };
/// let mut scanner = Scanner::with_strategy_options(
///     SliceSource::new(b"short line\n"),
///     SplitStrategy::Lines,
///     options,
/// );
/// assert_eq!(scanner.next_token(), Some(b"short line".as_slice()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerOptions {
    /// The ceiling on buffer growth, and thus on the length of one token
    /// including any bytes the strategy skips along with it.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_TOKEN_SIZE`]
    pub max_token_size: usize,

    /// Size of the first buffer allocation, capped at `max_token_size`. The
    /// buffer doubles from there as needed.
    ///
    /// # Default
    ///
    /// [`START_BUFFER_SIZE`]
    pub initial_buffer_size: usize,

    /// How many consecutive empty reads are tolerated before the scanner stops
    /// with [`ScanError::NoProgress`](crate::ScanError::NoProgress).
    ///
    /// # Default
    ///
    /// [`MAX_CONSECUTIVE_EMPTY_READS`]
    pub max_empty_reads: usize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
            initial_buffer_size: START_BUFFER_SIZE,
            max_empty_reads: MAX_CONSECUTIVE_EMPTY_READS,
        }
    }
}
