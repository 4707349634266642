//! Character source adapter: pull-based UTF-8 decoding over a byte stream.

use std::io::{self, Read};

const READ_BUFFER_SIZE: usize = 4096;

/// Incremental UTF-8 decoder over an arbitrary byte source.
///
/// Yields one scalar per call, buffering reads internally. A sequence
/// truncated at the buffer edge is completed on the next refill; an invalid
/// sequence decodes lossily to U+FFFD.
pub(crate) struct Utf8Reader<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
}

impl<R: Read> Utf8Reader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; READ_BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }

    /// Decodes and consumes the next scalar. `Ok(None)` signals end of
    /// stream.
    pub(crate) fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            let head = &self.buf[self.pos..self.len];
            if head.is_empty() {
                if self.eof {
                    return Ok(None);
                }
            } else {
                let (ch, size) = bstr::decode_utf8(head);
                match ch {
                    Some(c) => {
                        self.pos += size;
                        return Ok(Some(c));
                    }
                    // A valid prefix cut short at the end of the buffered
                    // bytes may complete once more input arrives.
                    None if size == head.len() && !self.eof => {}
                    None => {
                        self.pos += size.max(1);
                        return Ok(Some(char::REPLACEMENT_CHARACTER));
                    }
                }
            }
            self.fill()?;
        }
    }

    /// Reclaims the consumed prefix and reads more bytes from the source.
    /// Guarantees progress: either `len` grows or `eof` is set.
    fn fill(&mut self) -> io::Result<()> {
        if self.pos > 0 {
            self.buf.copy_within(self.pos..self.len, 0);
            self.len -= self.pos;
            self.pos = 0;
        }
        loop {
            match self.inner.read(&mut self.buf[self.len..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.len += n;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields at most one byte per read call, forcing scalar reassembly
    /// across refills.
    struct Trickle<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    fn drain(data: &[u8]) -> Vec<char> {
        let mut reader = Utf8Reader::new(Trickle { data, pos: 0 });
        let mut out = Vec::new();
        while let Some(ch) = reader.next_char().unwrap() {
            out.push(ch);
        }
        out
    }

    #[test]
    fn decodes_multibyte_across_reads() {
        let text = "å β 👍 ñ";
        assert_eq!(drain(text.as_bytes()), text.chars().collect::<Vec<_>>());
    }

    #[test]
    fn empty_source_is_end_of_stream() {
        let mut reader = Utf8Reader::new(&b""[..]);
        assert_eq!(reader.next_char().unwrap(), None);
        assert_eq!(reader.next_char().unwrap(), None);
    }

    #[test]
    fn invalid_bytes_decode_lossily() {
        assert_eq!(drain(&[0x66, 0xFF, 0x67]), vec!['f', '\u{FFFD}', 'g']);
    }

    #[test]
    fn truncated_tail_decodes_to_replacement() {
        // The first two bytes of a three-byte scalar, then end of stream.
        assert_eq!(drain(&[0xE2, 0x82]), vec!['\u{FFFD}']);
    }
}
