//! Typed syscall veneer.
//!
//! Each wrapper issues exactly one system call and returns the raw kernel
//! outcome as `Result<_, errno>`. Nothing here retries, including on `EINTR`;
//! retry policy belongs to the stream layer.
//!
//! # Safety
//!
//! The wrappers take slices and `CStr`s, so pointer validity is guaranteed by
//! the borrow checker. The only remaining obligation is descriptor ownership,
//! which [`crate::raw::Fd`] enforces.

use std::ffi::CStr;

use crate::errno;

/// Last errno reported by the C library on this thread.
#[inline]
fn last_errno() -> i32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(errno::EIO)
}

/// Convert a C-style `ssize_t` return into `Result<usize, errno>`.
#[inline]
pub fn syscall_result(ret: isize) -> Result<usize, i32> {
    if ret < 0 {
        Err(last_errno())
    } else {
        Ok(ret as usize)
    }
}

/// `read(fd, buf, count)` — one read attempt.
#[inline]
pub fn sys_read(fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
    // SAFETY: `buf` is a live, writable region of exactly `buf.len()` bytes.
    let ret = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    syscall_result(ret)
}

/// `write(fd, buf, count)` — one write attempt; may be short.
#[inline]
pub fn sys_write(fd: i32, buf: &[u8]) -> Result<usize, i32> {
    // SAFETY: `buf` is a live, readable region of exactly `buf.len()` bytes.
    let ret = unsafe { libc::write(fd, buf.as_ptr().cast(), buf.len()) };
    syscall_result(ret)
}

/// `open(path, flags, mode)` — returns the new descriptor.
#[inline]
pub fn sys_open(path: &CStr, flags: i32, mode: u32) -> Result<i32, i32> {
    // SAFETY: `path` is a valid NUL-terminated string for the duration of the call.
    let ret = unsafe { libc::open(path.as_ptr(), flags, mode as libc::c_uint) };
    if ret < 0 { Err(last_errno()) } else { Ok(ret) }
}

/// `close(fd)` — release a descriptor.
#[inline]
pub fn sys_close(fd: i32) -> Result<(), i32> {
    // SAFETY: close is safe to call on any fd value (bad fd just returns EBADF).
    let ret = unsafe { libc::close(fd) };
    if ret < 0 { Err(last_errno()) } else { Ok(()) }
}

/// `pipe(fds)` — returns `(read_fd, write_fd)`.
#[inline]
pub fn sys_pipe() -> Result<(i32, i32), i32> {
    let mut fds = [0 as libc::c_int; 2];
    // SAFETY: `fds` is a writable array of two c_ints as pipe(2) requires.
    let ret = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if ret < 0 {
        Err(last_errno())
    } else {
        Ok((fds[0], fds[1]))
    }
}
