//! Opening files as raw streams.
//!
//! Reference: POSIX.1-2024 open, fopen; ISO C11 7.21.5.3
//!
//! Design: an [`OpenMode`] selects the `O_*` flags; the resulting descriptor
//! is wrapped in an owned [`Fd`] and handed to the raw stream types, which
//! callers then decorate with a buffered reader or writer as needed.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::errno;
use crate::error::{StreamError, StreamResult};
use crate::raw::{Fd, RawByteSink, RawByteSource};
use crate::syscall;

/// Permission bits for newly created files, before the umask.
pub const DEFAULT_CREATE_MODE: u32 = 0o666;

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read only; the file must exist.
    Read,
    /// Write only; create, truncate.
    Write,
    /// Write only; create, every write lands at the end.
    Append,
    /// Read and write; create, no truncation.
    ReadWrite,
}

impl OpenMode {
    /// POSIX `O_*` flag bits for this mode.
    #[must_use]
    pub fn oflags(self) -> i32 {
        match self {
            OpenMode::Read => libc::O_RDONLY,
            OpenMode::Write => libc::O_WRONLY | libc::O_TRUNC | libc::O_CREAT,
            OpenMode::Append => libc::O_WRONLY | libc::O_APPEND | libc::O_CREAT,
            OpenMode::ReadWrite => libc::O_RDWR | libc::O_CREAT,
        }
    }

    #[must_use]
    pub fn is_readable(self) -> bool {
        matches!(self, OpenMode::Read | OpenMode::ReadWrite)
    }

    #[must_use]
    pub fn is_writable(self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

/// Parse an fopen-style mode string (`"r"`, `"w"`, `"a"`, `"r+"`, `"w+"`,
/// `"a+"`, each optionally with `b`).
///
/// `w+` and `a+` map to [`OpenMode::ReadWrite`]; truncation and append
/// positioning for the `+` forms are not modelled since streams never seek.
/// Returns `None` if the mode string is invalid.
pub fn parse_mode(mode: &[u8]) -> Option<OpenMode> {
    let (&base, modifiers) = mode.split_first()?;

    let mut plus = false;
    for &m in modifiers {
        match m {
            b'+' if !plus => plus = true,
            b'b' => {}
            _ => return None,
        }
    }

    match (base, plus) {
        (b'r', false) => Some(OpenMode::Read),
        (b'w', false) => Some(OpenMode::Write),
        (b'a', false) => Some(OpenMode::Append),
        (b'r' | b'w' | b'a', true) => Some(OpenMode::ReadWrite),
        _ => None,
    }
}

fn path_to_cstring(path: &Path) -> StreamResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| StreamError::io(errno::EINVAL))
}

/// Open `path` with `mode` and return the owned descriptor.
pub fn open_with(path: &Path, mode: OpenMode) -> StreamResult<Fd> {
    let c_path = path_to_cstring(path)?;
    let raw = syscall::sys_open(&c_path, mode.oflags() | libc::O_CLOEXEC, DEFAULT_CREATE_MODE)
        .map_err(StreamError::io)?;
    Ok(Fd::from_raw(raw))
}

/// Open an existing file for reading.
pub fn open_for_reading(path: &Path) -> StreamResult<RawByteSource<Fd>> {
    open_with(path, OpenMode::Read).map(RawByteSource::new)
}

/// Open a file for writing. `OpenMode::Read` is rejected with `EINVAL`.
pub fn open_for_writing(path: &Path, mode: OpenMode) -> StreamResult<RawByteSink<Fd>> {
    if !mode.is_writable() {
        return Err(StreamError::io(errno::EINVAL));
    }
    open_with(path, mode).map(RawByteSink::new)
}
