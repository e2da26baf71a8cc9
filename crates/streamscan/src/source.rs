//! Byte sources the scanner reads from.
//!
//! A [`Source`] fills a caller-provided buffer and reports how many bytes it
//! wrote together with a [`ReadStatus`]. Any retry, timeout or cancellation
//! policy belongs to the source; the scanner treats every reported error as
//! terminal.
//!
//! Provided adapters:
//!
//! - [`SliceSource`] reads from an in-memory byte slice.
//! - [`FromFn`] (see [`from_fn`]) wraps a closure.
//! - `IoSource` wraps any [`std::io::Read`] (requires the `std` feature).

use core::{convert::Infallible, fmt};

/// How a read ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus<E> {
    /// The source may have more data.
    More,
    /// The source is exhausted. Bytes reported alongside are still valid.
    EndOfSource,
    /// The source failed. Bytes reported alongside are still valid.
    Error(E),
}

/// The result of one [`Source::read`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome<E> {
    /// Number of bytes written to the front of the buffer.
    pub count: usize,
    /// Whether the source can be read again.
    pub status: ReadStatus<E>,
}

impl<E> ReadOutcome<E> {
    /// `count` bytes were read and more may follow.
    #[must_use]
    pub fn more(count: usize) -> Self {
        Self {
            count,
            status: ReadStatus::More,
        }
    }

    /// `count` bytes were read and the source is now exhausted.
    #[must_use]
    pub fn end(count: usize) -> Self {
        Self {
            count,
            status: ReadStatus::EndOfSource,
        }
    }

    /// `count` bytes were read before the source failed with `error`.
    #[must_use]
    pub fn error(count: usize, error: E) -> Self {
        Self {
            count,
            status: ReadStatus::Error(error),
        }
    }
}

/// A device that produces bytes on demand.
pub trait Source {
    /// The failure this source may report.
    type Error;

    /// Reads up to `buf.len()` bytes into the front of `buf`.
    ///
    /// The reported count must not exceed `buf.len()`. Returning zero bytes
    /// with [`ReadStatus::More`] is allowed but counts against the scanner's
    /// patience for sources that make no progress.
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Self::Error>;
}

impl<S: Source + ?Sized> Source for &mut S {
    type Error = S::Error;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Self::Error> {
        (**self).read(buf)
    }
}

impl<S: Source + ?Sized> Source for alloc::boxed::Box<S> {
    type Error = S::Error;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Self::Error> {
        (**self).read(buf)
    }
}

// ------------------------------------------------------------------------------------------------
// In-memory
// ------------------------------------------------------------------------------------------------

/// A source over a borrowed byte slice.
///
/// The read that drains the slice reports [`ReadStatus::EndOfSource`] along
/// with the final bytes.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    remaining: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Creates a source yielding `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { remaining: data }
    }

    /// The bytes not read yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }
}

impl Source for SliceSource<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Infallible> {
        let count = buf.len().min(self.remaining.len());
        let (head, tail) = self.remaining.split_at(count);
        buf[..count].copy_from_slice(head);
        self.remaining = tail;
        if tail.is_empty() {
            ReadOutcome::end(count)
        } else {
            ReadOutcome::more(count)
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Closures
// ------------------------------------------------------------------------------------------------

/// A source backed by a closure. Created by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    read: F,
}

/// Creates a source that calls `read` for every read request.
///
/// ```rust
/// use streamscan::{ReadOutcome, Scanner, source};
///
/// // A source that never delivers anything.
/// let silent = source::from_fn(|_: &mut [u8]| ReadOutcome::<()>::more(0));
/// let mut scanner = Scanner::new(silent);
/// assert!(!scanner.advance());
/// assert_eq!(
///     scanner.last_error(),
///     Some(&streamscan::ScanError::NoProgress)
/// );
/// ```
pub fn from_fn<F, E>(read: F) -> FromFn<F>
where
    F: FnMut(&mut [u8]) -> ReadOutcome<E>,
{
    FromFn { read }
}

impl<F, E> Source for FromFn<F>
where
    F: FnMut(&mut [u8]) -> ReadOutcome<E>,
{
    type Error = E;

    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<E> {
        (self.read)(buf)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

// ------------------------------------------------------------------------------------------------
// std::io
// ------------------------------------------------------------------------------------------------

#[cfg(feature = "std")]
pub use self::io::IoSource;

#[cfg(feature = "std")]
mod io {
    use std::io::{self, Read};

    use super::{ReadOutcome, Source};

    /// A source over any [`Read`] implementor.
    ///
    /// `Ok(0)` from the reader is end-of-source. Reads interrupted by a
    /// signal ([`io::ErrorKind::Interrupted`]) are retried; any other error is
    /// passed through to the scanner.
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: R,
    }

    impl<R: Read> IoSource<R> {
        /// Wraps `inner`.
        pub fn new(inner: R) -> Self {
            Self { inner }
        }

        /// Returns a reference to the wrapped reader.
        pub fn get_ref(&self) -> &R {
            &self.inner
        }

        /// Returns a mutable reference to the wrapped reader.
        pub fn get_mut(&mut self) -> &mut R {
            &mut self.inner
        }

        /// Unwraps the reader.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read> Source for IoSource<R> {
        type Error = io::Error;

        fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<io::Error> {
            loop {
                match self.inner.read(buf) {
                    Ok(0) if !buf.is_empty() => return ReadOutcome::end(0),
                    Ok(count) => return ReadOutcome::more(count),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                        log::trace!(target: "streamscan", "read interrupted, retrying");
                    }
                    Err(err) => return ReadOutcome::error(0, err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn slice_source_reports_end_with_last_bytes() {
        let mut src = SliceSource::new(b"hello");
        let mut buf = [0u8; 3];
        assert_eq!(src.read(&mut buf), ReadOutcome::more(3));
        assert_eq!(&buf, b"hel");
        assert_eq!(src.remaining(), b"lo");
        assert_eq!(src.read(&mut buf), ReadOutcome::end(2));
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(src.read(&mut buf), ReadOutcome::end(0));
    }

    #[test]
    fn empty_slice_source_ends_immediately() {
        let mut src = SliceSource::new(b"");
        let mut buf = [0u8; 8];
        assert_eq!(src.read(&mut buf), ReadOutcome::end(0));
    }

    #[test]
    fn from_fn_forwards_to_closure() {
        let mut chunks = vec![b"ab".as_slice(), b"c".as_slice()].into_iter();
        let mut src = from_fn(move |buf: &mut [u8]| match chunks.next() {
            Some(chunk) => {
                buf[..chunk.len()].copy_from_slice(chunk);
                ReadOutcome::<&str>::more(chunk.len())
            }
            None => ReadOutcome::error(0, "gone"),
        });
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf), ReadOutcome::more(2));
        assert_eq!(src.read(&mut buf), ReadOutcome::more(1));
        assert_eq!(src.read(&mut buf), ReadOutcome::error(0, "gone"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn io_source_maps_reader_results() {
        use std::io::{self, Cursor, Read};

        struct Flaky {
            calls: usize,
        }

        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.calls += 1;
                match self.calls {
                    1 => Err(io::ErrorKind::Interrupted.into()),
                    2 => {
                        buf[0] = b'x';
                        Ok(1)
                    }
                    _ => Err(io::ErrorKind::UnexpectedEof.into()),
                }
            }
        }

        let mut buf = [0u8; 4];
        let mut cursor = IoSource::new(Cursor::new(b"ab".to_vec()));
        assert_eq!(cursor.read(&mut buf).count, 2);
        assert!(matches!(
            cursor.read(&mut buf),
            ReadOutcome {
                count: 0,
                status: ReadStatus::EndOfSource
            }
        ));

        let mut flaky = IoSource::new(Flaky { calls: 0 });
        let first = flaky.read(&mut buf);
        assert_eq!((first.count, &buf[..1]), (1, b"x".as_slice()));
        assert!(matches!(first.status, ReadStatus::More));
        assert_eq!(flaky.get_ref().calls, 2);
        match flaky.read(&mut buf).status {
            ReadStatus::Error(err) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected an error, got {other:?}"),
        }
    }
}
