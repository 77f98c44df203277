//! The chunked byte source contract.
//!
//! This is an external collaborator: the crate only specifies the
//! interface it consumes. A real implementation might wrap a file handle,
//! a network socket, or an in-memory buffer split into fixed-size chunks;
//! none of that lives here.
//!
//! # Contract
//!
//! [`ByteSource::next_chunk`] returns the next readable window of bytes,
//! or an empty slice to signal EOF (or a read error — the two are not
//! distinguished at this layer; [`Reader`](crate::reader) treats both as
//! exhaustion). Implementations must not return an empty slice unless no
//! more bytes will ever become available: the reader latches on the first
//! empty chunk and never calls `next_chunk` again.
//!
//! [`ByteSource::back_up`] ungets the trailing `count` bytes of the most
//! recently returned chunk. The tokenizer calls this exactly once, when
//! it is torn down, to return any bytes it buffered but never consumed.
//! `count` is always less than or equal to the length of the last chunk
//! returned by `next_chunk`.

/// A pull-based chunked byte source.
///
/// Modeled on the classic zero-copy input stream interface: the source
/// owns its buffers and hands out borrowed windows into them, rather than
/// copying bytes into a caller-supplied buffer.
pub trait ByteSource {
    /// Returns the next chunk of bytes, or an empty slice at end-of-stream
    /// (or on a read error the source wishes to surface as EOF).
    fn next_chunk(&mut self) -> &[u8];

    /// Ungets the last `count` bytes of the most recently returned chunk.
    ///
    /// Called at most once per call to `next_chunk`, and only with a
    /// `count` no greater than that chunk's length.
    fn back_up(&mut self, count: usize);
}

/// A [`ByteSource`] over a single in-memory byte slice, handed out in one
/// chunk.
///
/// Useful for tests and for small schema files that comfortably fit in
/// memory — no chunking overhead, no lifetime gymnastics.
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    /// Number of bytes already handed out via `next_chunk`.
    consumed: usize,
    /// Bytes returned to the source via `back_up`, re-offered on the next call.
    backed_up: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source that will yield `bytes` as a single chunk.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            consumed: 0,
            backed_up: 0,
        }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_chunk(&mut self) -> &[u8] {
        if self.backed_up > 0 {
            let start = self.consumed - self.backed_up;
            let chunk = &self.bytes[start..self.consumed];
            self.backed_up = 0;
            return chunk;
        }
        if self.consumed >= self.bytes.len() {
            return &[];
        }
        let chunk = &self.bytes[self.consumed..];
        self.consumed = self.bytes.len();
        chunk
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.consumed, "back_up count exceeds bytes handed out");
        self.backed_up = count;
    }
}

/// A [`ByteSource`] that splits an in-memory buffer into fixed-size
/// chunks, exercising the reader's cross-chunk recording and refill
/// logic the way a real streaming source would.
pub struct ChunkedSource<'a> {
    bytes: &'a [u8],
    chunk_size: usize,
    pos: usize,
    /// Set by `back_up`; re-offered (shrunk) on the next `next_chunk` call.
    pending_back_up: usize,
}

impl<'a> ChunkedSource<'a> {
    /// Create a source that yields `bytes` in chunks of at most
    /// `chunk_size` bytes each. `chunk_size` of zero is treated as one.
    #[must_use]
    pub fn new(bytes: &'a [u8], chunk_size: usize) -> Self {
        Self {
            bytes,
            chunk_size: chunk_size.max(1),
            pos: 0,
            pending_back_up: 0,
        }
    }
}

impl ByteSource for ChunkedSource<'_> {
    fn next_chunk(&mut self) -> &[u8] {
        if self.pending_back_up > 0 {
            let start = self.pos - self.pending_back_up;
            let chunk = &self.bytes[start..self.pos];
            self.pending_back_up = 0;
            return chunk;
        }
        if self.pos >= self.bytes.len() {
            return &[];
        }
        let end = (self.pos + self.chunk_size).min(self.bytes.len());
        let chunk = &self.bytes[self.pos..end];
        self.pos = end;
        chunk
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.pos, "back_up count exceeds bytes handed out");
        self.pending_back_up = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_yields_one_chunk_then_eof() {
        let mut src = SliceSource::new(b"abc");
        assert_eq!(src.next_chunk(), b"abc");
        assert_eq!(src.next_chunk(), b"");
        assert_eq!(src.next_chunk(), b"");
    }

    #[test]
    fn slice_source_back_up_then_redraw() {
        let mut src = SliceSource::new(b"abcdef");
        assert_eq!(src.next_chunk(), b"abcdef");
        src.back_up(2);
        assert_eq!(src.next_chunk(), b"ef");
        assert_eq!(src.next_chunk(), b"");
    }

    #[test]
    fn chunked_source_splits_into_fixed_windows() {
        let mut src = ChunkedSource::new(b"abcdefghij", 4);
        assert_eq!(src.next_chunk(), b"abcd");
        assert_eq!(src.next_chunk(), b"efgh");
        assert_eq!(src.next_chunk(), b"ij");
        assert_eq!(src.next_chunk(), b"");
    }

    #[test]
    fn chunked_source_back_up_mid_stream() {
        let mut src = ChunkedSource::new(b"abcdefgh", 4);
        assert_eq!(src.next_chunk(), b"abcd");
        src.back_up(1);
        assert_eq!(src.next_chunk(), b"d");
        assert_eq!(src.next_chunk(), b"efgh");
        assert_eq!(src.next_chunk(), b"");
    }

    #[test]
    fn chunked_source_zero_chunk_size_treated_as_one() {
        let mut src = ChunkedSource::new(b"ab", 0);
        assert_eq!(src.next_chunk(), b"a");
        assert_eq!(src.next_chunk(), b"b");
        assert_eq!(src.next_chunk(), b"");
    }
}
