//! Shared fixtures for the frankenio benchmarks.

use frankenio_core::{StreamResult, WritableStream};

/// Sink that discards bytes and counts forwarded writes.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub writes: u64,
    pub bytes: u64,
}

impl WritableStream for CountingSink {
    fn write(&mut self, buf: &[u8]) -> StreamResult<()> {
        self.writes += 1;
        self.bytes += buf.len() as u64;
        Ok(())
    }
}

/// `lines` newline-terminated lines of `width` bytes each (newline included).
#[must_use]
pub fn line_corpus(lines: usize, width: usize) -> Vec<u8> {
    let width = width.max(1);
    let mut out = Vec::with_capacity(lines * width);
    for i in 0..lines {
        out.extend((0..width - 1).map(|j| b'a' + ((i + j) % 26) as u8));
        out.push(b'\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use frankenio_core::{BufMode, BufferedWriter};

    #[test]
    fn corpus_shape() {
        let corpus = line_corpus(3, 4);
        assert_eq!(corpus.len(), 12);
        assert_eq!(corpus.iter().filter(|&&b| b == b'\n').count(), 3);
    }

    #[test]
    fn counting_sink_sees_line_flushes() {
        let corpus = line_corpus(10, 8);
        let mut w = BufferedWriter::new(CountingSink::default(), BufMode::Line);
        w.write(&corpus).unwrap();
        assert_eq!(w.get_ref().writes, 10);
        assert_eq!(w.get_ref().bytes, 80);
    }
}
