//! Buffered standard I/O.
//!
//! Buffering decorators, their flush policies, file opening and the
//! standard-stream context.

pub mod buffer;
pub mod context;
pub mod file;
pub mod reader;
pub mod writer;

pub use buffer::{BUFSIZ, BufMode};
pub use context::{StdStreams, perror};
pub use file::{OpenMode, open_for_reading, open_for_writing, open_with, parse_mode};
pub use reader::BufferedReader;
pub use writer::BufferedWriter;
