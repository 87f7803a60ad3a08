//! Read and write cursors over wire buffers.
//!
//! Every encoder runs twice against the same code path: once with a
//! [`WriteCursor::counting`] cursor that only measures, and once with a
//! [`WriteCursor::writing`] cursor over a caller buffer. Because both passes
//! execute identical calls, the measured length always equals the bytes
//! written.
//!
//! Decoders consume a [`ReadCursor`]. All reads go through a single checked
//! advance ([`ReadCursor::take`]), so no decoder can look past the end of its
//! input regardless of what lengths or counts the input claims.
//!
//! # Security
//!
//! A writing cursor never stores past the end of its buffer. An oversized
//! write records a [`WireError::CapacityExceeded`] fault and keeps counting, so
//! [`WriteCursor::finish`] can report the full required length.

use tracing::trace;

use crate::error::{Result, WireError};

/// Boundary used by aligned strings.
pub const ALIGNMENT: usize = 4;

/// Number of zero bytes needed to move `position` up to a multiple of `align`.
///
/// An `align` of zero or one never needs padding.
pub const fn padding_for(position: usize, align: usize) -> usize {
    if align <= 1 {
        return 0;
    }
    match position % align {
        0 => 0,
        rem => align - rem,
    }
}

#[derive(Debug)]
enum Sink<'b> {
    Counting { len: usize },
    Writing { buf: &'b mut [u8], offset: usize },
}

/// Position of a reserved 32-bit field, filled in later with
/// [`WriteCursor::patch_len`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(usize);

/// Destination of an encoding pass.
///
/// Either counts bytes without storing them or writes them into a borrowed
/// buffer. The first fault (capacity or length overflow) is latched and
/// reported by [`finish`](Self::finish).
#[derive(Debug)]
pub struct WriteCursor<'b> {
    sink: Sink<'b>,
    fault: Option<WireError>,
}

impl<'b> WriteCursor<'b> {
    /// Cursor that measures an encoding without writing it.
    pub const fn counting() -> Self {
        Self { sink: Sink::Counting { len: 0 }, fault: None }
    }

    /// Cursor that writes into `buf` starting at offset zero.
    pub fn writing(buf: &'b mut [u8]) -> Self {
        Self { sink: Sink::Writing { buf, offset: 0 }, fault: None }
    }

    /// Bytes produced so far, measured from the start of the buffer.
    pub const fn position(&self) -> usize {
        match &self.sink {
            Sink::Counting { len } => *len,
            Sink::Writing { offset, .. } => *offset,
        }
    }

    fn poison(&mut self, err: WireError) {
        if self.fault.is_none() {
            trace!(error = %err, position = self.position(), "write cursor faulted");
            self.fault = Some(err);
        }
    }

    fn advance(&mut self, n: usize, fill: impl FnOnce(&mut [u8])) {
        match &mut self.sink {
            Sink::Counting { len } => *len = len.saturating_add(n),
            Sink::Writing { buf, offset } => {
                let end = offset.saturating_add(n);
                let capacity = buf.len();
                match buf.get_mut(*offset..end) {
                    Some(dst) => fill(dst),
                    None => {
                        if self.fault.is_none() {
                            self.fault = Some(WireError::CapacityExceeded { required: end, capacity });
                        }
                    },
                }
                *offset = end;
            },
        }
    }

    /// Appends raw bytes with no length prefix.
    pub fn put_block(&mut self, bytes: &[u8]) {
        self.advance(bytes.len(), |dst| dst.copy_from_slice(bytes));
    }

    /// Appends `n` zero bytes.
    pub fn put_zeros(&mut self, n: usize) {
        self.advance(n, |dst| dst.fill(0));
    }

    /// Appends zero bytes until the position is a multiple of `align`.
    pub fn pad_to(&mut self, align: usize) {
        self.put_zeros(padding_for(self.position(), align));
    }

    /// Appends `len` as a little-endian `u32`.
    ///
    /// Lengths above `u32::MAX` latch [`WireError::LengthOverflow`].
    pub fn put_len(&mut self, len: usize) {
        let raw = self.len_to_wire(len);
        self.put_block(&raw.to_le_bytes());
    }

    /// Reserves a 32-bit field to be filled in once its value is known.
    pub fn reserve_u32(&mut self) -> Slot {
        let slot = Slot(self.position());
        self.put_zeros(4);
        slot
    }

    /// Fills a reserved field with `len`.
    pub fn patch_len(&mut self, slot: Slot, len: usize) {
        let raw = self.len_to_wire(len);
        if let Sink::Writing { buf, .. } = &mut self.sink
            && let Some(dst) = buf.get_mut(slot.0..slot.0 + 4)
        {
            dst.copy_from_slice(&raw.to_le_bytes());
        }
    }

    fn len_to_wire(&mut self, len: usize) -> u32 {
        u32::try_from(len).unwrap_or_else(|_| {
            self.poison(WireError::LengthOverflow { len });
            u32::MAX
        })
    }

    /// Ends the pass, returning the bytes produced or the first fault.
    pub fn finish(self) -> Result<usize> {
        match self.fault {
            Some(err) => Err(err),
            None => Ok(self.position()),
        }
    }
}

/// Cursor over bytes being decoded.
///
/// Tracks the unconsumed tail of the input and the absolute offset of that
/// tail from the start of the root buffer. Sub-cursors produced by
/// [`split`](Self::split) keep counting from the root, so alignment is always
/// computed against the outermost buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCursor<'a> {
    rest: &'a [u8],
    position: usize,
}

impl<'a> ReadCursor<'a> {
    /// Cursor at the start of `data`.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { rest: data, position: 0 }
    }

    /// Bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Returns `true` once every byte has been consumed.
    pub const fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Absolute offset of the next byte from the start of the root buffer.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The unconsumed bytes.
    pub const fn rest(&self) -> &'a [u8] {
        self.rest
    }

    /// Borrows the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        self.rest.get(..n).ok_or_else(|| self.truncated(n))
    }

    /// Consumes and returns the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let Some((head, tail)) = self.rest.split_at_checked(n) else {
            return Err(self.truncated(n));
        };
        self.rest = tail;
        self.position += n;
        Ok(head)
    }

    /// Consumes the next `N` bytes as an array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Discards the next `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Discards bytes until the absolute position is a multiple of `align`.
    pub fn skip_padding(&mut self, align: usize) -> Result<()> {
        self.skip(padding_for(self.position, align))
    }

    /// Consumes the next `n` bytes and returns a cursor over just those bytes.
    pub fn split(&mut self, n: usize) -> Result<Self> {
        let position = self.position;
        let rest = self.take(n)?;
        Ok(Self { rest, position })
    }

    fn truncated(&self, needed: usize) -> WireError {
        trace!(needed, remaining = self.rest.len(), position = self.position, "read past end of input");
        WireError::Truncated { needed, remaining: self.rest.len() }
    }
}
