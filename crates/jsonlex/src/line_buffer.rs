//! Bounded line window over the character source.
//!
//! The window is refilled one source line at a time and never grows: a line
//! longer than the window is consumed in successive chunks, and tokens that
//! straddle a chunk boundary are captured into owned storage by the caller.
//! Consolidation slides the unread tail of a full window to the front so a
//! token starting near the tail can still be captured as one contiguous
//! view.

use std::io::{self, Read};

use crate::reader::Utf8Reader;

pub(crate) const DEFAULT_BUFFER_SIZE: usize = 1 << 11; // 2048 bytes
pub(crate) const CONSOLIDATE_MARGIN: usize = 1 << 6; // 64 bytes

/// Smallest usable window: one scalar of headroom on either side.
const MIN_BUFFER_SIZE: usize = 16;

/// One decoded scalar: the window offset it occupies, its encoded length,
/// and the 1-based line/column it appeared at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CharAt {
    pub(crate) ch: char,
    pub(crate) offset: usize,
    pub(crate) len: u8,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

pub(crate) struct LineBuffer<R> {
    reader: Utf8Reader<R>,
    buf: Box<[u8]>,
    /// Valid bytes in the window.
    limit: usize,
    /// Next unread byte.
    pos: usize,
    /// The window's last byte is a newline.
    line_complete: bool,
    /// The window starts at the beginning of a source line. Cleared by
    /// consolidation and by long-line continuation refills; guards
    /// [`Self::last_line`] against showing stale content.
    window_aligned: bool,
    source_eof: bool,
    /// Scalar read from the source that did not fit the window tail.
    carry: Option<char>,
    line: usize,
    column: usize,
    pending_newline: bool,
}

impl<R: Read> LineBuffer<R> {
    pub(crate) fn new(source: R, buffer_size: usize) -> Self {
        Self {
            reader: Utf8Reader::new(source),
            buf: vec![0; buffer_size.max(MIN_BUFFER_SIZE)].into_boxed_slice(),
            limit: 0,
            pos: 0,
            line_complete: false,
            window_aligned: true,
            source_eof: false,
            carry: None,
            line: 1,
            column: 0,
            pending_newline: false,
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Decodes and consumes the next scalar from the window, refilling from
    /// the source as needed. `Ok(None)` signals end of stream.
    pub(crate) fn next_char(&mut self) -> io::Result<Option<CharAt>> {
        if self.pos >= self.limit && !self.refill()? {
            return Ok(None);
        }
        let (ch, size) = bstr::decode_utf8(&self.buf[self.pos..self.limit]);
        // The window holds only whole scalars, so the decode cannot fail.
        let ch = ch.unwrap_or(char::REPLACEMENT_CHARACTER);
        if self.pending_newline {
            self.line += 1;
            self.column = 0;
            self.pending_newline = false;
        }
        self.column += 1;
        if ch == '\n' {
            self.pending_newline = true;
        }
        let at = CharAt {
            ch,
            offset: self.pos,
            len: size as u8,
            line: self.line,
            column: self.column,
        };
        self.pos += size;
        Ok(Some(at))
    }

    /// Whether the next read will turn the window over. Callers holding a
    /// span into the window must move it to owned storage first.
    pub(crate) fn exhausted(&self) -> bool {
        self.pos >= self.limit
    }

    /// 1-based line of the most recently read character.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the most recently read character; 0 before any
    /// character has been read on the stream.
    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// Window content as text. Offsets come from [`Self::next_char`] and
    /// always fall on scalar boundaries.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &str {
        std::str::from_utf8(&self.buf[start..end]).expect("window holds whole UTF-8 scalars")
    }

    /// Best-effort text of the current source line for diagnostics: the
    /// window content with the trailing newline stripped, but only while the
    /// window still starts where the line does. Empty otherwise, so error
    /// messages never point at consolidated-away content.
    pub(crate) fn last_line(&self) -> &str {
        if self.limit == 0 || !self.window_aligned {
            return "";
        }
        let end = if self.line_complete {
            self.limit - 1
        } else {
            self.limit
        };
        self.slice(0, end)
    }

    /// Overwrites the window with the next source line, or with the next
    /// chunk of a line longer than the window. Returns false at end of
    /// stream.
    fn refill(&mut self) -> io::Result<bool> {
        if self.source_eof && self.carry.is_none() {
            return Ok(false);
        }
        // The new window starts at a line boundary only if the previous one
        // ended at one.
        self.window_aligned = self.limit == 0 || self.line_complete;
        self.pos = 0;
        self.limit = 0;
        self.line_complete = false;
        self.fill_tail()?;
        Ok(self.limit > 0)
    }

    /// Appends source chars at `limit` until a newline, window capacity, or
    /// end of stream. A scalar that does not fit is carried to the next
    /// refill.
    fn fill_tail(&mut self) -> io::Result<()> {
        loop {
            let ch = match self.carry.take() {
                Some(ch) => ch,
                None => match self.reader.next_char()? {
                    Some(ch) => ch,
                    None => {
                        self.source_eof = true;
                        break;
                    }
                },
            };
            let size = ch.len_utf8();
            if self.limit + size > self.buf.len() {
                self.carry = Some(ch);
                break;
            }
            ch.encode_utf8(&mut self.buf[self.limit..]);
            self.limit += size;
            if ch == '\n' {
                self.line_complete = true;
                break;
            }
        }
        Ok(())
    }

    /// Slides the unread tail of a full, line-terminated window to the front
    /// and tops the window up from the source, so a token starting within
    /// the tail margin can be captured as one contiguous view. Returns the
    /// distance everything moved, so the caller can rebase the offset of the
    /// character in flight; 0 when no consolidation was needed.
    pub(crate) fn maybe_consolidate(&mut self, keep_from: usize) -> io::Result<usize> {
        if self.limit != self.buf.len()
            || keep_from == 0
            || keep_from < self.buf.len().saturating_sub(CONSOLIDATE_MARGIN)
            || !self.line_complete
        {
            return Ok(0);
        }
        self.buf.copy_within(keep_from..self.limit, 0);
        self.limit -= keep_from;
        self.pos -= keep_from;
        self.window_aligned = false;
        self.fill_tail()?;
        self.line_complete = self.limit > 0 && self.buf[self.limit - 1] == b'\n';
        Ok(keep_from)
    }
}
