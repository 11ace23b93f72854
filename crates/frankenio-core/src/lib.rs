//! # frankenio-core
//!
//! Buffered byte streams over raw file descriptors.
//!
//! The crate is layered the way a C stdio is: [`syscall`] issues single
//! read/write/open/close attempts, [`raw`] wraps an owned descriptor in the
//! [`ReadableStream`]/[`WritableStream`] traits, and [`stdio`] decorates any
//! stream with a fixed-capacity buffer and a flush policy. No `unsafe` code is
//! permitted outside the syscall veneer.

#![deny(unsafe_code)]

pub mod config;
pub mod errno;
pub mod error;
pub mod raw;
pub mod stdio;
pub mod stream;
#[allow(unsafe_code)]
pub mod syscall;

pub use config::StreamConfig;
pub use error::{StreamError, StreamResult};
pub use raw::{Fd, RawByteSink, RawByteSource, RawDevice, pipe};
pub use stdio::{
    BUFSIZ, BufMode, BufferedReader, BufferedWriter, OpenMode, StdStreams, open_for_reading,
    open_for_writing, open_with, parse_mode,
};
pub use stream::{ReadableStream, WritableStream};
