//! Buffered reader.
//!
//! Invariants:
//! - `pos <= limit <= buf.len()`
//! - bytes `[pos, limit)` are unread data from the wrapped stream
//! - `buf.len()` is fixed at creation

use crate::error::StreamResult;
use crate::stream::ReadableStream;

use super::buffer::BUFSIZ;

/// Refills a fixed-capacity buffer from a wrapped [`ReadableStream`].
#[derive(Debug)]
pub struct BufferedReader<R: ReadableStream> {
    inner: R,
    buf: Box<[u8]>,
    /// Next unread offset.
    pos: usize,
    /// Number of valid bytes in `buf`.
    limit: usize,
}

impl<R: ReadableStream> BufferedReader<R> {
    /// Wrap `inner` with a [`BUFSIZ`] buffer.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(BUFSIZ, inner)
    }

    /// Wrap `inner` with a buffer of `capacity` bytes (at least 1).
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            limit: 0,
        }
    }

    /// Buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of unread bytes currently held in the buffer.
    pub fn buffered(&self) -> usize {
        self.limit - self.pos
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the wrapped stream. Reading from it directly skips
    /// whatever is still buffered.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the stream, discarding buffered bytes.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Replace the buffer contents with one read from the wrapped stream.
    ///
    /// Returns `false` when the stream is at end-of-stream.
    fn refill(&mut self) -> StreamResult<bool> {
        self.pos = 0;
        self.limit = 0;
        self.limit = self.inner.read(&mut self.buf)?;
        Ok(self.limit != 0)
    }
}

impl<R: ReadableStream> ReadableStream for BufferedReader<R> {
    fn read(&mut self, dest: &mut [u8]) -> StreamResult<usize> {
        let mut copied = 0;
        while copied < dest.len() {
            if self.pos == self.limit && !self.refill()? {
                break;
            }
            let take = (dest.len() - copied).min(self.limit - self.pos);
            dest[copied..copied + take].copy_from_slice(&self.buf[self.pos..self.pos + take]);
            self.pos += take;
            copied += take;
        }
        Ok(copied)
    }

    fn read_byte(&mut self) -> StreamResult<Option<u8>> {
        if self.pos == self.limit && !self.refill()? {
            return Ok(None);
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errno;
    use crate::error::StreamError;

    /// Serves `data` in reads of at most `chunk` bytes and counts calls.
    struct Source {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
        calls: usize,
        fail_at_call: Option<usize>,
    }

    impl Source {
        fn new(data: &[u8], chunk: usize) -> Self {
            Self {
                data: data.to_vec(),
                pos: 0,
                chunk,
                calls: 0,
                fail_at_call: None,
            }
        }
    }

    impl ReadableStream for Source {
        fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
            self.calls += 1;
            if self.fail_at_call == Some(self.calls) {
                return Err(StreamError::io(errno::EIO));
            }
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn drain_bytes<R: ReadableStream>(r: &mut R) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = r.read_byte().unwrap() {
            out.push(b);
        }
        out
    }

    #[test]
    fn byte_reads_match_source_for_any_capacity() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        for capacity in [1, 2, 7, 64, 999, 1000, 4096] {
            let mut reader = BufferedReader::with_capacity(capacity, Source::new(&data, 13));
            assert_eq!(drain_bytes(&mut reader), data, "capacity {capacity}");
        }
    }

    #[test]
    fn buffer_amortizes_underlying_reads() {
        let data = vec![b'x'; 100];
        let mut reader = BufferedReader::with_capacity(50, Source::new(&data, 50));
        assert_eq!(drain_bytes(&mut reader).len(), 100);
        // two full refills plus the end-of-stream probe
        assert_eq!(reader.get_ref().calls, 3);
    }

    #[test]
    fn read_spans_multiple_refills() {
        let data: Vec<u8> = (0..50u8).collect();
        let mut reader = BufferedReader::with_capacity(8, Source::new(&data, 5));
        let mut dest = [0u8; 20];
        assert_eq!(reader.read(&mut dest), Ok(20));
        assert_eq!(&dest[..], &data[..20]);
    }

    #[test]
    fn read_returns_short_count_at_end() {
        let mut reader = BufferedReader::with_capacity(4, Source::new(b"hello", 4));
        let mut dest = [0u8; 16];
        assert_eq!(reader.read(&mut dest), Ok(5));
        assert_eq!(&dest[..5], b"hello");
        assert_eq!(reader.read(&mut dest), Ok(0));
    }

    #[test]
    fn end_of_stream_is_idempotent() {
        let mut reader = BufferedReader::with_capacity(4, Source::new(b"a", 4));
        assert_eq!(reader.read_byte(), Ok(Some(b'a')));
        for _ in 0..5 {
            assert_eq!(reader.read_byte(), Ok(None));
        }
    }

    #[test]
    fn mixed_byte_and_span_reads_preserve_order() {
        let mut reader = BufferedReader::with_capacity(3, Source::new(b"abcdefgh", 2));
        assert_eq!(reader.read_byte(), Ok(Some(b'a')));
        let mut dest = [0u8; 4];
        assert_eq!(reader.read(&mut dest), Ok(4));
        assert_eq!(&dest, b"bcde");
        assert_eq!(reader.read_line().unwrap(), b"fgh");
    }

    #[test]
    fn read_line_through_buffer() {
        let mut reader = BufferedReader::with_capacity(4, Source::new(b"one\ntwo\n", 8));
        assert_eq!(reader.read_line().unwrap(), b"one");
        assert_eq!(reader.read_line().unwrap(), b"two");
        assert_eq!(reader.read_line().unwrap(), b"");
    }

    #[test]
    fn source_errors_propagate_unchanged() {
        let mut src = Source::new(b"abcdef", 3);
        src.fail_at_call = Some(2);
        let mut reader = BufferedReader::with_capacity(3, src);
        let mut dest = [0u8; 6];
        assert_eq!(reader.read(&mut dest), Err(StreamError::io(errno::EIO)));
    }

    #[test]
    fn buffered_count_tracks_cursor() {
        let mut reader = BufferedReader::with_capacity(8, Source::new(b"abcdef", 8));
        assert_eq!(reader.buffered(), 0);
        reader.read_byte().unwrap();
        assert_eq!(reader.buffered(), 5);
        assert_eq!(reader.capacity(), 8);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut reader = BufferedReader::with_capacity(0, Source::new(b"xy", 8));
        assert_eq!(reader.capacity(), 1);
        assert_eq!(drain_bytes(&mut reader), b"xy");
    }
}
