use alloc::vec::Vec;
use core::convert::Infallible;

use crate::{ReadOutcome, Scanner, Source, Split};

/// Hands out at most `max` bytes per read and reports the end of the data
/// only on the read after the last byte, like a typical `io::Read`.
pub(crate) struct SlowSource<'a> {
    data: &'a [u8],
    max: usize,
}

impl<'a> SlowSource<'a> {
    pub(crate) fn new(data: &'a [u8], max: usize) -> Self {
        assert!(max > 0);
        Self { data, max }
    }
}

impl Source for SlowSource<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Infallible> {
        if self.data.is_empty() {
            return ReadOutcome::end(0);
        }
        let count = buf.len().min(self.max).min(self.data.len());
        buf[..count].copy_from_slice(&self.data[..count]);
        self.data = &self.data[count..];
        ReadOutcome::more(count)
    }
}

/// Hands out the data in the chunk sizes given, cycling through them. A size
/// of zero produces an empty read.
pub(crate) struct ChunkedSource<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    next: usize,
}

impl<'a> ChunkedSource<'a> {
    pub(crate) fn new(data: &'a [u8], sizes: Vec<usize>) -> Self {
        Self {
            data,
            sizes,
            next: 0,
        }
    }
}

impl Source for ChunkedSource<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome<Infallible> {
        if self.data.is_empty() {
            return ReadOutcome::end(0);
        }
        let size = if self.sizes.is_empty() {
            self.data.len()
        } else {
            let size = self.sizes[self.next % self.sizes.len()];
            self.next += 1;
            size
        };
        let count = size.min(buf.len()).min(self.data.len());
        buf[..count].copy_from_slice(&self.data[..count]);
        self.data = &self.data[count..];
        ReadOutcome::more(count)
    }
}

/// Drains `scanner`, copying every token.
pub(crate) fn collect<S: Source, P: Split>(scanner: &mut Scanner<S, P>) -> Vec<Vec<u8>> {
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token.to_vec());
    }
    tokens
}

/// A predictable but non-trivial line of `n` bytes including its terminator.
/// Every fifth line ends in `\r\n`. Without the terminator, this is the token
/// the line splitter should produce.
pub(crate) fn gen_line(line_num: usize, n: usize, add_newline: bool) -> Vec<u8> {
    let do_cr = line_num % 5 == 0;
    let n = if do_cr { n.saturating_sub(1) } else { n };
    let mut line = Vec::with_capacity(n + 1);
    #[allow(clippy::cast_possible_truncation)]
    for i in 0..n.saturating_sub(1) {
        let c = b'a'.wrapping_add((line_num + i) as u8);
        line.push(if c == b'\n' || c == b'\r' { b'N' } else { c });
    }
    if add_newline {
        if do_cr {
            line.push(b'\r');
        }
        line.push(b'\n');
    }
    line
}
