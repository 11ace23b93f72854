//! Stream error taxonomy.
//!
//! End-of-stream is not represented here: it is a zero-length read or a
//! `None` from [`crate::ReadableStream::read_byte`].

use thiserror::Error;

use crate::errno;

/// Failure raised by a raw stream and propagated unchanged by decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The device operation failed with a platform error code.
    #[error("{} (errno {errno})", describe_errno(.errno))]
    Io { errno: i32 },
    /// A write delivered zero bytes for a non-empty request: the reader is gone.
    #[error("broken pipe: peer closed")]
    BrokenPipe,
}

pub type StreamResult<T> = Result<T, StreamError>;

fn describe_errno(errno: &i32) -> &'static str {
    errno::describe(*errno)
}

impl StreamError {
    /// Wrap a platform error code.
    #[must_use]
    pub const fn io(errno: i32) -> Self {
        Self::Io { errno }
    }

    /// Platform error code equivalent to this failure.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match *self {
            Self::Io { errno } => errno,
            Self::BrokenPipe => errno::EPIPE,
        }
    }

    /// Message text without the numeric suffix, as `perror` prints it.
    #[must_use]
    pub fn message(&self) -> &'static str {
        errno::describe(self.errno())
    }
}

impl From<StreamError> for std::io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io { errno } => std::io::Error::from_raw_os_error(errno),
            StreamError::BrokenPipe => {
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, StreamError::BrokenPipe)
            }
        }
    }
}
