//! Buffered writer.
//!
//! Stages bytes in a fixed-capacity buffer and forwards them to the wrapped
//! [`WritableStream`] according to its [`BufMode`]:
//!
//! - `Full`: forward when the buffer fills, or on `flush`/`close`/drop.
//! - `Line`: as `Full`, and also right after a `\n` is staged.
//! - `None`: no buffer; every call is forwarded as-is.
//!
//! Invariants:
//! - `len <= buf.len()`, and `buf.len() == 0` exactly when the mode is `None`
//! - bytes `[0, len)` are pending and have not reached the wrapped stream
//! - after any call returns `Ok`, `len < buf.len()`

use crate::error::StreamResult;
use crate::stream::WritableStream;

use super::buffer::{BUFSIZ, BufMode, effective_capacity};

/// Batches writes to a wrapped [`WritableStream`].
///
/// Dropping the writer flushes pending bytes before the wrapped stream is
/// dropped. Errors at that point are discarded; call [`close`](Self::close)
/// to observe them.
#[derive(Debug)]
pub struct BufferedWriter<W: WritableStream> {
    inner: W,
    mode: BufMode,
    buf: Box<[u8]>,
    /// Number of staged bytes.
    len: usize,
    /// Set by the first write; freezes the buffering policy.
    io_started: bool,
}

impl<W: WritableStream> BufferedWriter<W> {
    /// Wrap `inner` with a [`BUFSIZ`] buffer (none in `BufMode::None`).
    pub fn new(inner: W, mode: BufMode) -> Self {
        Self::with_capacity(BUFSIZ, inner, mode)
    }

    /// Wrap `inner` with a buffer of `capacity` bytes (at least 1 when buffered).
    pub fn with_capacity(capacity: usize, inner: W, mode: BufMode) -> Self {
        Self {
            inner,
            mode,
            buf: vec![0u8; effective_capacity(mode, capacity)].into_boxed_slice(),
            len: 0,
            io_started: false,
        }
    }

    pub fn mode(&self) -> BufMode {
        self.mode
    }

    /// Buffer capacity; 0 when unbuffered.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes staged but not yet forwarded.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutable access to the wrapped stream. Writing to it directly bypasses
    /// (and reorders against) whatever is still staged.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Change the buffering policy (POSIX `setvbuf`).
    ///
    /// Only allowed before the first write; returns `false` afterwards and
    /// leaves the writer unchanged.
    pub fn set_buffering(&mut self, mode: BufMode, capacity: usize) -> bool {
        if self.io_started {
            return false;
        }
        self.mode = mode;
        self.buf = vec![0u8; effective_capacity(mode, capacity)].into_boxed_slice();
        self.len = 0;
        true
    }

    /// Flush pending bytes. The wrapped stream stays owned by this writer.
    pub fn close(&mut self) -> StreamResult<()> {
        self.flush()
    }

    /// Forward the staged bytes with a single write.
    ///
    /// The buffer is emptied whether or not the write succeeds: the wrapped
    /// stream may have delivered part of it, so the bytes are never reissued.
    fn drain(&mut self) -> StreamResult<()> {
        if self.len == 0 {
            return Ok(());
        }
        let staged = std::mem::take(&mut self.len);
        self.inner.write(&self.buf[..staged])
    }
}

impl<W: WritableStream> WritableStream for BufferedWriter<W> {
    fn write(&mut self, mut data: &[u8]) -> StreamResult<()> {
        self.io_started = true;
        if !self.mode.is_buffered() {
            return self.inner.write(data);
        }

        let cap = self.buf.len();
        while !data.is_empty() {
            if self.len == cap {
                self.drain()?;
            }
            let mut take = (cap - self.len).min(data.len());
            let mut hit_newline = false;
            if self.mode == BufMode::Line
                && let Some(nl) = data[..take].iter().position(|&b| b == b'\n')
            {
                take = nl + 1;
                hit_newline = true;
            }
            self.buf[self.len..self.len + take].copy_from_slice(&data[..take]);
            self.len += take;
            data = &data[take..];
            if hit_newline || self.len == cap {
                self.drain()?;
            }
        }
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        self.io_started = true;
        if !self.mode.is_buffered() {
            return self.inner.write_byte(byte);
        }

        if self.len == self.buf.len() {
            self.drain()?;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if (self.mode == BufMode::Line && byte == b'\n') || self.len == self.buf.len() {
            self.drain()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.drain()?;
        self.inner.flush()
    }
}

impl<W: WritableStream> Drop for BufferedWriter<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
