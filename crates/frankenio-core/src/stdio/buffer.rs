//! Buffering policy.
//!
//! Three modes following POSIX `setvbuf`: fully-buffered (`_IOFBF`),
//! line-buffered (`_IOLBF`) and unbuffered (`_IONBF`).
//!
//! Reference: POSIX.1-2024 setvbuf, ISO C11 7.21.3

/// Default buffer size (POSIX BUFSIZ).
pub const BUFSIZ: usize = 8192;

/// Buffering mode of a writer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufMode {
    /// Fully buffered: flush when the buffer fills, or on flush/close.
    #[default]
    Full,
    /// Line buffered: also flush as soon as a newline is staged.
    Line,
    /// Unbuffered: every write goes straight to the wrapped stream.
    None,
}

/// POSIX constant values for setvbuf mode argument.
pub const IOFBF: i32 = 0;
pub const IOLBF: i32 = 1;
pub const IONBF: i32 = 2;

impl BufMode {
    /// Convert from POSIX integer constant.
    #[must_use]
    pub fn from_posix(mode: i32) -> Option<BufMode> {
        match mode {
            IOFBF => Some(BufMode::Full),
            IOLBF => Some(BufMode::Line),
            IONBF => Some(BufMode::None),
            _ => Option::None,
        }
    }

    /// Parse a mode name (case-insensitive). Unknown names yield `None`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Option<BufMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "fbf" | "iofbf" | "block" => Some(BufMode::Full),
            "line" | "lbf" | "iolbf" => Some(BufMode::Line),
            "none" | "nbf" | "ionbf" | "unbuffered" => Some(BufMode::None),
            _ => Option::None,
        }
    }

    /// Whether this mode stages bytes at all.
    #[must_use]
    pub const fn is_buffered(self) -> bool {
        !matches!(self, BufMode::None)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BufMode::Full => "full",
            BufMode::Line => "line",
            BufMode::None => "none",
        }
    }
}

/// Capacity actually allocated for `mode` when `requested` bytes are asked for.
pub(crate) fn effective_capacity(mode: BufMode, requested: usize) -> usize {
    if mode.is_buffered() {
        requested.max(1)
    } else {
        0
    }
}
