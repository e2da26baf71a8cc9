//! Growable byte buffer with a sliding unconsumed window.
//!
//! Layout: `data[..start]` is consumed and reclaimable, `data[start..end]` is
//! the window handed to split strategies, and `data[end..]` is free space for
//! the next read. `data.len()` is the capacity; the buffer only grows, up to
//! `max_size`.
#![allow(clippy::inline_always)]

use alloc::vec::Vec;
use core::ops::Range;

use log::trace;

/// The buffer cannot grow past its maximum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufferFull;

#[derive(Debug)]
pub(crate) struct Buffer {
    data: Vec<u8>,
    start: usize,
    end: usize,
    max_size: usize,
    initial_size: usize,
}

impl Buffer {
    pub(crate) fn new(initial_size: usize, max_size: usize) -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            end: 0,
            max_size,
            initial_size,
        }
    }

    pub(crate) fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    pub(crate) fn set_initial_size(&mut self, initial_size: usize) {
        self.initial_size = initial_size;
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Offset of the window within the buffer.
    #[inline(always)]
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline(always)]
    pub(crate) fn window(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    /// Bytes at an absolute range, as recorded from `start()` before a
    /// `consume`. Only valid until the next `reserve`.
    #[inline(always)]
    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.data[range]
    }

    /// Marks `n` bytes at the head of the window as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the window length.
    #[inline]
    pub(crate) fn consume(&mut self, n: usize) {
        assert!(
            n <= self.len(),
            "consumed {n} bytes from a {}-byte window",
            self.len()
        );
        trace!(target: "streamscan", "consume({n})");
        self.start += n;
    }

    /// Guarantees at least `min_extra` free bytes after the window.
    ///
    /// Slides the window to the front when that reclaims enough space (or
    /// when more than half the buffer is consumed), then grows the buffer
    /// geometrically, never past `max_size`.
    pub(crate) fn reserve(&mut self, min_extra: usize) -> Result<(), BufferFull> {
        if self.start > 0
            && (self.data.len() - self.end < min_extra || self.start > self.data.len() / 2)
        {
            self.slide();
        }
        if self.data.len() - self.end >= min_extra {
            return Ok(());
        }

        let needed = self.len() + min_extra;
        if needed > self.max_size {
            return Err(BufferFull);
        }

        let mut new_size = if self.data.is_empty() {
            self.initial_size.max(1)
        } else {
            self.data.len().saturating_mul(2)
        };
        while new_size < needed {
            new_size = new_size.saturating_mul(2);
        }
        let new_size = new_size.min(self.max_size);

        trace!(target: "streamscan", "grow buffer {} -> {new_size}", self.data.len());
        self.slide();
        self.data.resize(new_size, 0);
        Ok(())
    }

    /// The free space after the window.
    #[inline(always)]
    pub(crate) fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.end..]
    }

    /// Extends the window by `n` bytes freshly written into `spare_mut()`.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the free space.
    #[inline]
    pub(crate) fn commit(&mut self, n: usize) {
        let spare = self.data.len() - self.end;
        assert!(n <= spare, "source reported {n} bytes read into a {spare}-byte buffer");
        self.end += n;
    }

    /// Drops the window. The allocation is kept.
    pub(crate) fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    fn slide(&mut self) {
        if self.start == 0 {
            return;
        }
        self.data.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
    }
}
