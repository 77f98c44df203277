//! The buffered, recording-capable byte reader sitting between a
//! [`crate::source::ByteSource`] and the scanner.
//!
//! `Reader` owns exactly one byte of lookahead (`current_char`) plus the
//! buffer window it came from, a latch for source exhaustion, the
//! line/column counters, and an optional recording target. It never
//! allocates except into the byte buffer a caller asks it to record into.
//!
//! Chunks handed out by a [`crate::source::ByteSource`] are borrowed only
//! for the duration of the call that produced them — the trait's
//! `next_chunk(&mut self) -> &[u8]` signature ties the returned slice to
//! that one reborrow, which is too short-lived to store across the many
//! `advance` calls a single chunk is consumed over. `Reader` copies each
//! chunk into its own buffer once per refill rather than fight that
//! lifetime; the source itself still hands out its data without the
//! caller supplying storage, which is the contract that matters.
//!
//! Recording accumulates exact bytes (`Vec<u8>`), not text: a multi-byte
//! UTF-8 sequence can straddle a chunk boundary, and converting each
//! flushed fragment to `String` independently would see an incomplete,
//! individually-invalid sequence at the split and mangle it. Converting
//! to text, where needed at all, is the caller's job once recording is
//! stopped and the full byte range is in hand.

use crate::source::ByteSource;

/// Tab stops are every 8 columns, matching the column-counting invariant.
const TAB_WIDTH: u32 = 8;

pub(crate) struct Reader<'a> {
    source: &'a mut dyn ByteSource,
    buffer: Vec<u8>,
    buffer_pos: usize,
    current_char: u8,
    read_error: bool,
    line: u32,
    column: u32,
    /// `Some(offset into buffer)` while recording is active; the
    /// accumulated bytes live in `recorded`.
    record_start: Option<usize>,
    recorded: Vec<u8>,
}

impl<'a> Reader<'a> {
    /// Construct a reader over `source`, pulling the first chunk
    /// immediately so `current_char`/`is_eof` are valid right away.
    pub(crate) fn new(source: &'a mut dyn ByteSource) -> Self {
        let mut reader = Self {
            source,
            buffer: Vec::new(),
            buffer_pos: 0,
            current_char: 0,
            read_error: false,
            line: 0,
            column: 0,
            record_start: None,
            recorded: Vec::new(),
        };
        reader.refresh();
        reader
    }

    #[inline]
    pub(crate) fn current_char(&self) -> u8 {
        self.current_char
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.read_error
    }

    #[inline]
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    /// Consume `current_char`, advance line/column per the tab-stop and
    /// newline rules, and move to the next byte (refilling if the buffer
    /// is exhausted).
    pub(crate) fn advance(&mut self) {
        if self.read_error {
            return;
        }
        match self.current_char {
            b'\t' => self.column = (self.column / TAB_WIDTH + 1) * TAB_WIDTH,
            b'\n' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        self.buffer_pos += 1;
        if self.buffer_pos >= self.buffer.len() {
            self.refresh();
        } else {
            self.current_char = self.buffer[self.buffer_pos];
        }
    }

    /// Flush any live recording up to the current buffer end, reset
    /// `record_start`, then pull the next chunk. Latches `read_error` on
    /// an empty chunk; once latched, further calls are no-ops.
    fn refresh(&mut self) {
        if self.read_error {
            return;
        }
        if let Some(start) = self.record_start {
            self.flush_record_from(start);
            self.record_start = Some(0);
        }
        let chunk = self.source.next_chunk();
        if chunk.is_empty() {
            self.read_error = true;
            self.current_char = 0;
            self.buffer.clear();
            self.buffer_pos = 0;
            return;
        }
        self.buffer.clear();
        self.buffer.extend_from_slice(chunk);
        self.buffer_pos = 0;
        self.current_char = self.buffer[0];
    }

    /// Appends the exact bytes `buffer[start..buffer_pos]` to the
    /// recording target. No text conversion happens here — a chunk
    /// boundary can fall in the middle of a multi-byte UTF-8 sequence,
    /// and converting each fragment independently would see an
    /// individually-invalid partial sequence and mangle it.
    fn flush_record_from(&mut self, start: usize) {
        let end = self.buffer_pos.min(self.buffer.len());
        if start < end {
            self.recorded.extend_from_slice(&self.buffer[start..end]);
        }
    }

    /// Begin recording consumed bytes starting at the current position.
    /// Discards anything left over from a previous, improperly-stopped
    /// recording.
    pub(crate) fn start_record(&mut self) {
        self.recorded.clear();
        self.record_start = Some(self.buffer_pos);
    }

    /// Stop recording and return the exact bytes recorded since the
    /// matching `start_record`, including the in-progress buffer tail.
    pub(crate) fn stop_record(&mut self) -> Vec<u8> {
        if let Some(start) = self.record_start.take() {
            self.flush_record_from(start);
        }
        std::mem::take(&mut self.recorded)
    }

    /// Return any unread suffix of the current buffer to the source.
    /// Consumes the reader since no further reads are meaningful after.
    pub(crate) fn finish(self) {
        let unread = self.buffer.len().saturating_sub(self.buffer_pos);
        if unread > 0 {
            self.source.back_up(unread);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChunkedSource, SliceSource};

    #[test]
    fn reads_bytes_in_order_and_latches_eof() {
        let mut src = SliceSource::new(b"ab");
        let mut r = Reader::new(&mut src);
        assert_eq!(r.current_char(), b'a');
        r.advance();
        assert_eq!(r.current_char(), b'b');
        r.advance();
        assert!(r.is_eof());
        assert_eq!(r.current_char(), 0);
        r.advance();
        assert!(r.is_eof());
    }

    #[test]
    fn tab_advances_to_next_multiple_of_eight() {
        let mut src = SliceSource::new(b"\tA");
        let mut r = Reader::new(&mut src);
        assert_eq!(r.column(), 0);
        r.advance();
        assert_eq!(r.column(), 8);
        assert_eq!(r.current_char(), b'A');
    }

    #[test]
    fn double_tab_advances_to_sixteen() {
        let mut src = SliceSource::new(b"\t\tA");
        let mut r = Reader::new(&mut src);
        r.advance();
        r.advance();
        assert_eq!(r.column(), 16);
    }

    #[test]
    fn tab_after_two_chars_lands_on_eight() {
        let mut src = SliceSource::new(b"AB\tC");
        let mut r = Reader::new(&mut src);
        r.advance();
        r.advance();
        assert_eq!(r.column(), 2);
        r.advance();
        assert_eq!(r.column(), 8);
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut src = SliceSource::new(b"a\nb");
        let mut r = Reader::new(&mut src);
        r.advance();
        assert_eq!((r.line(), r.column()), (0, 1));
        r.advance();
        assert_eq!((r.line(), r.column()), (1, 0));
    }

    #[test]
    fn recording_spans_a_single_chunk() {
        let mut src = SliceSource::new(b"hello world");
        let mut r = Reader::new(&mut src);
        r.start_record();
        for _ in 0..5 {
            r.advance();
        }
        assert_eq!(r.stop_record(), b"hello");
    }

    #[test]
    fn recording_survives_a_buffer_refill() {
        let mut src = ChunkedSource::new(b"abcdef", 3);
        let mut r = Reader::new(&mut src);
        r.advance();
        r.start_record();
        for _ in 0..4 {
            r.advance();
        }
        assert_eq!(r.stop_record(), b"bcde");
    }

    #[test]
    fn recording_preserves_utf8_sequence_split_across_chunk_boundary() {
        // "é" is 0xC3 0xA9: with a one-byte chunk size, the refill
        // happens in the middle of that two-byte sequence. A flush that
        // tried to convert each fragment to text independently would see
        // half a sequence and mangle it; recording raw bytes instead and
        // converting once, at the end, does not.
        let mut src = ChunkedSource::new("aéb".as_bytes(), 1);
        let mut r = Reader::new(&mut src);
        r.start_record();
        for _ in 0.."aéb".len() {
            r.advance();
        }
        let bytes = r.stop_record();
        assert_eq!(String::from_utf8(bytes).unwrap(), "aéb");
    }

    #[test]
    fn finish_backs_up_unread_suffix() {
        let mut src = ChunkedSource::new(b"abcdef", 4);
        {
            let mut r = Reader::new(&mut src);
            r.advance();
            r.advance();
            r.finish();
        }
        assert_eq!(src.next_chunk(), b"cd");
        assert_eq!(src.next_chunk(), b"ef");
        assert_eq!(src.next_chunk(), b"");
    }

    #[test]
    fn empty_source_is_eof_from_construction() {
        let mut src = SliceSource::new(b"");
        let r = Reader::new(&mut src);
        assert!(r.is_eof());
        assert_eq!(r.current_char(), 0);
    }
}
