//! Stream-to-stream copy and line counting.
//!
//! These are the routines behind `fio cat`, `fio copy` and `fio line-count`.
//! Errors from file-level helpers carry the path that failed so the CLI can
//! report them the way `perror` does.

use std::path::{Path, PathBuf};

use thiserror::Error;

use frankenio_core::{
    BUFSIZ, BufMode, BufferedReader, BufferedWriter, OpenMode, ReadableStream, StreamError,
    StreamResult, WritableStream, open_for_reading, open_for_writing,
};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{path}: open failed: {source}")]
    Open { path: PathBuf, source: StreamError },
    #[error("{path}: read failed: {source}")]
    Read { path: PathBuf, source: StreamError },
    #[error("{path}: write failed: {source}")]
    Write { path: PathBuf, source: StreamError },
}

impl HarnessError {
    /// Path the failing operation was applied to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }

    #[must_use]
    pub fn stream_error(&self) -> StreamError {
        match self {
            Self::Open { source, .. } | Self::Read { source, .. } | Self::Write { source, .. } => {
                *source
            }
        }
    }
}

/// Which end of a copy failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Read,
    Write,
}

fn pump<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, (Side, StreamError)>
where
    R: ReadableStream + ?Sized,
    W: WritableStream + ?Sized,
{
    let mut chunk = [0u8; BUFSIZ];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut chunk).map_err(|e| (Side::Read, e))?;
        if n == 0 {
            return Ok(total);
        }
        writer.write(&chunk[..n]).map_err(|e| (Side::Write, e))?;
        total += n as u64;
    }
}

/// Copy everything from `reader` to `writer` until end-of-stream.
///
/// Returns the number of bytes copied. The writer is not flushed.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W) -> StreamResult<u64>
where
    R: ReadableStream + ?Sized,
    W: WritableStream + ?Sized,
{
    pump(reader, writer).map_err(|(_, e)| e)
}

/// Count lines: every `\n`, plus a final line that lacks one.
pub fn count_lines<R: ReadableStream + ?Sized>(reader: &mut R) -> StreamResult<u64> {
    let mut lines = 0u64;
    let mut mid_line = false;
    while let Some(byte) = reader.read_byte()? {
        if byte == b'\n' {
            lines += 1;
            mid_line = false;
        } else {
            mid_line = true;
        }
    }
    Ok(lines + u64::from(mid_line))
}

/// Destination settings for [`copy_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    pub mode: OpenMode,
    pub buffering: BufMode,
    pub bufsiz: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::Write,
            buffering: BufMode::Full,
            bufsiz: BUFSIZ,
        }
    }
}

/// Copy the file at `from` to `to`, closing the destination before returning.
pub fn copy_file(from: &Path, to: &Path, options: &CopyOptions) -> Result<u64, HarnessError> {
    let source = open_for_reading(from).map_err(|source| HarnessError::Open {
        path: from.to_path_buf(),
        source,
    })?;
    let sink = open_for_writing(to, options.mode).map_err(|source| HarnessError::Open {
        path: to.to_path_buf(),
        source,
    })?;

    let mut reader = BufferedReader::with_capacity(options.bufsiz, source);
    let mut writer = BufferedWriter::with_capacity(options.bufsiz, sink, options.buffering);

    let copied = pump(&mut reader, &mut writer).map_err(|(side, source)| match side {
        Side::Read => HarnessError::Read {
            path: from.to_path_buf(),
            source,
        },
        Side::Write => HarnessError::Write {
            path: to.to_path_buf(),
            source,
        },
    })?;
    writer.close().map_err(|source| HarnessError::Write {
        path: to.to_path_buf(),
        source,
    })?;
    Ok(copied)
}

/// Append the contents of the file at `path` to `writer`.
pub fn cat_file<W: WritableStream + ?Sized>(
    path: &Path,
    writer: &mut W,
) -> Result<u64, HarnessError> {
    let source = open_for_reading(path).map_err(|source| HarnessError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufferedReader::new(source);
    pump(&mut reader, writer).map_err(|(side, source)| match side {
        Side::Read => HarnessError::Read {
            path: path.to_path_buf(),
            source,
        },
        Side::Write => HarnessError::Write {
            path: PathBuf::from("<stdout>"),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frankenio_core::errno;

    struct FailAfter {
        remaining: usize,
    }

    impl WritableStream for FailAfter {
        fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
            if buf.len() > self.remaining {
                return Err(StreamError::io(errno::ENOSPC));
            }
            self.remaining -= buf.len();
            Ok(())
        }
    }

    #[test]
    fn copy_stream_moves_every_byte() {
        let data: Vec<u8> = (0..3 * BUFSIZ + 17).map(|i| (i % 256) as u8).collect();
        let mut src: &[u8] = &data;
        let mut sink: Vec<u8> = Vec::new();
        let n = copy_stream(&mut src, &mut sink).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(sink, data);
    }

    #[test]
    fn copy_stream_propagates_write_errors() {
        let mut src: &[u8] = &[7u8; 100];
        let mut sink = FailAfter { remaining: 10 };
        assert_eq!(
            copy_stream(&mut src, &mut sink),
            Err(StreamError::io(errno::ENOSPC))
        );
    }

    #[test]
    fn count_lines_counts_unterminated_tail() {
        let mut src: &[u8] = b"a\n\nb\nc";
        assert_eq!(count_lines(&mut src).unwrap(), 4);
        let mut src: &[u8] = b"a\nb\n";
        assert_eq!(count_lines(&mut src).unwrap(), 2);
        let mut src: &[u8] = b"";
        assert_eq!(count_lines(&mut src).unwrap(), 0);
    }

    #[test]
    fn harness_error_exposes_path_and_errno() {
        let err = HarnessError::Open {
            path: PathBuf::from("/nope"),
            source: StreamError::io(errno::ENOENT),
        };
        assert_eq!(err.path(), Path::new("/nope"));
        assert_eq!(err.stream_error().errno(), errno::ENOENT);
        assert_eq!(
            err.to_string(),
            "/nope: open failed: No such file or directory (errno 2)"
        );
    }

    #[test]
    fn copy_file_reports_missing_source() {
        let missing = std::env::temp_dir().join(format!(
            "frankenio-missing-{}-src",
            std::process::id()
        ));
        let dest = std::env::temp_dir().join(format!(
            "frankenio-missing-{}-dst",
            std::process::id()
        ));
        let err = copy_file(&missing, &dest, &CopyOptions::default()).unwrap_err();
        assert!(matches!(err, HarnessError::Open { .. }));
        assert_eq!(err.path(), missing.as_path());
        assert!(!dest.exists());
    }
}
