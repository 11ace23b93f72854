//! Error number definitions.
//!
//! Platform errno values used by the stream layer, taken from `libc`, plus
//! the message table the collaborator layer prints next to a failing path.

pub const EPERM: i32 = libc::EPERM;
pub const ENOENT: i32 = libc::ENOENT;
pub const EINTR: i32 = libc::EINTR;
pub const EIO: i32 = libc::EIO;
pub const ENXIO: i32 = libc::ENXIO;
pub const EBADF: i32 = libc::EBADF;
pub const EAGAIN: i32 = libc::EAGAIN;
pub const ENOMEM: i32 = libc::ENOMEM;
pub const EACCES: i32 = libc::EACCES;
pub const EFAULT: i32 = libc::EFAULT;
pub const EEXIST: i32 = libc::EEXIST;
pub const ENOTDIR: i32 = libc::ENOTDIR;
pub const EISDIR: i32 = libc::EISDIR;
pub const EINVAL: i32 = libc::EINVAL;
pub const ENFILE: i32 = libc::ENFILE;
pub const EMFILE: i32 = libc::EMFILE;
pub const EFBIG: i32 = libc::EFBIG;
pub const ENOSPC: i32 = libc::ENOSPC;
pub const ESPIPE: i32 = libc::ESPIPE;
pub const EROFS: i32 = libc::EROFS;
pub const EPIPE: i32 = libc::EPIPE;
pub const ENAMETOOLONG: i32 = libc::ENAMETOOLONG;
pub const ENOSYS: i32 = libc::ENOSYS;

/// Returns the `strerror`-style message for `errno`.
pub fn describe(errno: i32) -> &'static str {
    match errno {
        EPERM => "Operation not permitted",
        ENOENT => "No such file or directory",
        EINTR => "Interrupted system call",
        EIO => "Input/output error",
        ENXIO => "No such device or address",
        EBADF => "Bad file descriptor",
        EAGAIN => "Resource temporarily unavailable",
        ENOMEM => "Cannot allocate memory",
        EACCES => "Permission denied",
        EFAULT => "Bad address",
        EEXIST => "File exists",
        ENOTDIR => "Not a directory",
        EISDIR => "Is a directory",
        EINVAL => "Invalid argument",
        ENFILE => "Too many open files in system",
        EMFILE => "Too many open files",
        EFBIG => "File too large",
        ENOSPC => "No space left on device",
        ESPIPE => "Illegal seek",
        EROFS => "Read-only file system",
        EPIPE => "Broken pipe",
        ENAMETOOLONG => "File name too long",
        ENOSYS => "Function not implemented",
        _ => "Unknown error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_errnos_have_messages() {
        assert_eq!(describe(ENOENT), "No such file or directory");
        assert_eq!(describe(EPIPE), "Broken pipe");
        assert_eq!(describe(EISDIR), "Is a directory");
    }

    #[test]
    fn unknown_errno_is_generic() {
        assert_eq!(describe(0), "Unknown error");
        assert_eq!(describe(9999), "Unknown error");
    }

    #[test]
    fn every_constant_has_a_message() {
        let all = [
            EPERM, ENOENT, EINTR, EIO, ENXIO, EBADF, EAGAIN, ENOMEM, EACCES, EFAULT, EEXIST,
            ENOTDIR, EISDIR, EINVAL, ENFILE, EMFILE, EFBIG, ENOSPC, ESPIPE, EROFS, EPIPE,
            ENAMETOOLONG, ENOSYS,
        ];
        for errno in all {
            assert_ne!(describe(errno), "Unknown error", "errno {errno}");
        }
    }

    #[test]
    fn os_errors_round_trip_through_describe() {
        let err = std::io::Error::from_raw_os_error(EPIPE);
        assert_eq!(err.raw_os_error(), Some(libc::EPIPE));
        assert_eq!(describe(libc::EPIPE), "Broken pipe");
    }
}
