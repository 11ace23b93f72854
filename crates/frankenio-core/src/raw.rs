//! Device-backed streams.
//!
//! [`RawByteSource`] and [`RawByteSink`] sit directly on a [`RawDevice`]:
//! one device attempt per read, and a write loop that only retries on partial
//! success. [`Fd`] is the production device, an owned file descriptor that is
//! closed exactly once on drop.

use crate::error::{StreamError, StreamResult};
use crate::stream::{ReadableStream, WritableStream};
use crate::syscall;

/// Single-attempt device primitives.
///
/// Each call maps onto exactly one system call. Errors are raw errno values.
pub trait RawDevice {
    /// One read attempt; `Ok(0)` means end-of-stream.
    fn read_once(&mut self, buf: &mut [u8]) -> Result<usize, i32>;

    /// One write attempt; may accept fewer bytes than offered.
    fn write_once(&mut self, buf: &[u8]) -> Result<usize, i32>;
}

/// Owned file descriptor.
///
/// Not `Clone`: the descriptor has exactly one owner and is released when
/// that owner drops it.
#[derive(Debug)]
pub struct Fd {
    raw: i32,
}

impl Fd {
    /// Take ownership of `raw`. It will be closed when the `Fd` drops.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    /// The underlying descriptor number.
    #[must_use]
    pub fn as_raw(&self) -> i32 {
        self.raw
    }

    /// Close now and report the outcome instead of discarding it in `drop`.
    pub fn close(self) -> StreamResult<()> {
        let raw = self.raw;
        std::mem::forget(self);
        syscall::sys_close(raw).map_err(StreamError::io)
    }
}

impl RawDevice for Fd {
    fn read_once(&mut self, buf: &mut [u8]) -> Result<usize, i32> {
        syscall::sys_read(self.raw, buf)
    }

    fn write_once(&mut self, buf: &[u8]) -> Result<usize, i32> {
        syscall::sys_write(self.raw, buf)
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        let _ = syscall::sys_close(self.raw);
    }
}

/// Unbuffered reader over a device.
#[derive(Debug)]
pub struct RawByteSource<D: RawDevice = Fd> {
    device: D,
}

impl<D: RawDevice> RawByteSource<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn get_ref(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

impl RawByteSource<Fd> {
    /// Read from an owned descriptor number.
    #[must_use]
    pub fn from_raw_fd(raw: i32) -> Self {
        Self::new(Fd::from_raw(raw))
    }
}

impl<D: RawDevice> ReadableStream for RawByteSource<D> {
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.device.read_once(buf).map_err(StreamError::io)
    }
}

/// Unbuffered writer over a device.
#[derive(Debug)]
pub struct RawByteSink<D: RawDevice = Fd> {
    device: D,
}

impl<D: RawDevice> RawByteSink<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn get_ref(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}

impl RawByteSink<Fd> {
    /// Write to an owned descriptor number.
    #[must_use]
    pub fn from_raw_fd(raw: i32) -> Self {
        Self::new(Fd::from_raw(raw))
    }
}

impl<D: RawDevice> WritableStream for RawByteSink<D> {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        let mut remaining = buf;
        while !remaining.is_empty() {
            match self.device.write_once(remaining) {
                Err(errno) => return Err(StreamError::io(errno)),
                Ok(0) => return Err(StreamError::BrokenPipe),
                Ok(written) => remaining = &remaining[written.min(remaining.len())..],
            }
        }
        Ok(())
    }
}

/// Create a pipe and return its two ends as raw streams.
pub fn pipe() -> StreamResult<(RawByteSource<Fd>, RawByteSink<Fd>)> {
    let (r, w) = syscall::sys_pipe().map_err(StreamError::io)?;
    Ok((RawByteSource::from_raw_fd(r), RawByteSink::from_raw_fd(w)))
}
