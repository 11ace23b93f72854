//! Standard stream context.
//!
//! The three standard streams are an explicit value owned by the entry point
//! and passed by reference, not process-wide statics. Conventional policy:
//! input is buffered, output is line-buffered, error is unbuffered, all
//! adjustable through [`StreamConfig`].

use crate::config::StreamConfig;
use crate::error::{StreamError, StreamResult};
use crate::raw::{RawByteSink, RawByteSource};
use crate::stream::{ReadableStream, WritableStream};

use super::reader::BufferedReader;
use super::writer::BufferedWriter;

pub const STDIN_FILENO: i32 = 0;
pub const STDOUT_FILENO: i32 = 1;
pub const STDERR_FILENO: i32 = 2;

/// Buffered standard input, output and error.
///
/// Field order is drop order: output and error are flushed before the
/// context releases their descriptors.
pub struct StdStreams {
    pub output: BufferedWriter<Box<dyn WritableStream>>,
    pub error: BufferedWriter<Box<dyn WritableStream>>,
    pub input: BufferedReader<Box<dyn ReadableStream>>,
}

impl StdStreams {
    /// Bind descriptors 0, 1 and 2. The context takes ownership of them.
    pub fn open(config: &StreamConfig) -> Self {
        Self::from_parts(
            Box::new(RawByteSource::from_raw_fd(STDIN_FILENO)),
            Box::new(RawByteSink::from_raw_fd(STDOUT_FILENO)),
            Box::new(RawByteSink::from_raw_fd(STDERR_FILENO)),
            config,
        )
    }

    /// Build a context over arbitrary streams.
    pub fn from_parts(
        input: Box<dyn ReadableStream>,
        output: Box<dyn WritableStream>,
        error: Box<dyn WritableStream>,
        config: &StreamConfig,
    ) -> Self {
        Self {
            output: BufferedWriter::with_capacity(config.buffer_size, output, config.stdout_mode),
            error: BufferedWriter::with_capacity(config.buffer_size, error, config.stderr_mode),
            input: BufferedReader::with_capacity(config.buffer_size, input),
        }
    }

    /// Flush output and error.
    pub fn flush(&mut self) -> StreamResult<()> {
        let out = self.output.flush();
        let err = self.error.flush();
        out.and(err)
    }
}

/// Write `"<prefix>: <message>\n"` describing `err` to `stream`.
///
/// An empty prefix prints the message alone, as C `perror` does.
pub fn perror<W: WritableStream + ?Sized>(
    stream: &mut W,
    prefix: &str,
    err: &StreamError,
) -> StreamResult<()> {
    if !prefix.is_empty() {
        stream.write_str(prefix)?;
        stream.write_str(": ")?;
    }
    stream.write_str(err.message())?;
    stream.write_byte(b'\n')?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::errno;
    use crate::stdio::BufMode;

    struct Bytes {
        data: Vec<u8>,
        pos: usize,
    }

    impl ReadableStream for Bytes {
        fn read(&mut self, buf: &mut [u8]) -> StreamResult<usize> {
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<Vec<u8>>>>);

    impl WritableStream for Shared {
        fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
            self.0.borrow_mut().push(buf.to_vec());
            Ok(())
        }
    }

    fn context(input: &[u8]) -> (StdStreams, Shared, Shared) {
        let out = Shared::default();
        let err = Shared::default();
        let ctx = StdStreams::from_parts(
            Box::new(Bytes {
                data: input.to_vec(),
                pos: 0,
            }),
            Box::new(out.clone()),
            Box::new(err.clone()),
            &StreamConfig::default(),
        );
        (ctx, out, err)
    }

    #[test]
    fn default_policies() {
        let (ctx, _, _) = context(b"");
        assert_eq!(ctx.output.mode(), BufMode::Line);
        assert_eq!(ctx.error.mode(), BufMode::None);
    }

    #[test]
    fn echo_lines_through_context() {
        let (mut ctx, out, _) = context(b"hello\nworld\n");
        loop {
            let line = ctx.input.read_line().unwrap();
            if line.is_empty() {
                break;
            }
            ctx.output.write(&line).unwrap();
            ctx.output.write_byte(b'\n').unwrap();
        }
        assert_eq!(out.0.borrow().concat(), b"hello\nworld\n");
    }

    #[test]
    fn perror_formats_prefix_and_message() {
        let (mut ctx, _, err) = context(b"");
        perror(&mut ctx.error, "/missing", &StreamError::io(errno::ENOENT)).unwrap();
        assert_eq!(
            err.0.borrow().concat(),
            b"/missing: No such file or directory\n"
        );
    }

    #[test]
    fn perror_without_prefix() {
        let (mut ctx, _, err) = context(b"");
        perror(&mut ctx.error, "", &StreamError::BrokenPipe).unwrap();
        assert_eq!(err.0.borrow().concat(), b"Broken pipe\n");
    }

    #[test]
    fn dropping_context_flushes_output() {
        let out = Shared::default();
        let config = StreamConfig {
            stdout_mode: BufMode::Full,
            ..StreamConfig::default()
        };
        let mut ctx = StdStreams::from_parts(
            Box::new(Bytes {
                data: Vec::new(),
                pos: 0,
            }),
            Box::new(out.clone()),
            Box::new(Shared::default()),
            &config,
        );
        ctx.output.write(b"no newline").unwrap();
        assert!(out.0.borrow().is_empty());
        drop(ctx);
        assert_eq!(out.0.borrow().concat(), b"no newline");
    }
}
