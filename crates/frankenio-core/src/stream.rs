//! Readable and writable stream contracts.
//!
//! Implementors provide the single required method; the byte, line and
//! C-string helpers are derived from it. Decorators may override a helper with
//! a faster path as long as the observable behavior is the same.

use std::ffi::CStr;

use crate::error::StreamResult;

/// A source of bytes.
pub trait ReadableStream {
    /// Read up to `buf.len()` bytes into `buf`.
    ///
    /// Returns `Ok(0)` for a non-empty `buf` only at end-of-stream. A short
    /// count is not an error.
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize>;

    /// Read a single byte; `None` is the end-of-stream sentinel.
    fn read_byte(&mut self) -> StreamResult<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Read bytes up to (not including) the next `\n` or end-of-stream.
    ///
    /// Returns an empty vector when end-of-stream is reached before any byte.
    fn read_line(&mut self) -> StreamResult<Vec<u8>> {
        let mut line = Vec::new();
        while let Some(byte) = self.read_byte()? {
            if byte == b'\n' {
                break;
            }
            line.push(byte);
        }
        Ok(line)
    }
}

/// A sink of bytes.
pub trait WritableStream {
    /// Write all of `buf` or fail. Partial consumption is never reported as
    /// success.
    fn write(&mut self, buf: &[u8]) -> StreamResult<()>;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        self.write(&[byte])
    }

    /// Push staged bytes down to the device. Unbuffered sinks have nothing
    /// to do.
    fn flush(&mut self) -> StreamResult<()> {
        Ok(())
    }

    /// Write the bytes of a NUL-terminated string, excluding the terminator.
    fn write_cstr(&mut self, s: &CStr) -> StreamResult<()> {
        self.write(s.to_bytes())
    }

    /// Write the UTF-8 bytes of `s`.
    fn write_str(&mut self, s: &str) -> StreamResult<()> {
        self.write(s.as_bytes())
    }
}

impl<T: ReadableStream + ?Sized> ReadableStream for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        (**self).read(buf)
    }

    fn read_byte(&mut self) -> StreamResult<Option<u8>> {
        (**self).read_byte()
    }

    fn read_line(&mut self) -> StreamResult<Vec<u8>> {
        (**self).read_line()
    }
}

impl<T: ReadableStream + ?Sized> ReadableStream for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        (**self).read(buf)
    }

    fn read_byte(&mut self) -> StreamResult<Option<u8>> {
        (**self).read_byte()
    }

    fn read_line(&mut self) -> StreamResult<Vec<u8>> {
        (**self).read_line()
    }
}

impl<T: WritableStream + ?Sized> WritableStream for Box<T> {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        (**self).write(buf)
    }

    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }
}

impl<T: WritableStream + ?Sized> WritableStream for &mut T {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        (**self).write(buf)
    }

    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> StreamResult<()> {
        (**self).flush()
    }
}

/// In-memory source: reading consumes the front of the slice.
impl ReadableStream for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

/// In-memory sink: writes append.
impl WritableStream for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}
