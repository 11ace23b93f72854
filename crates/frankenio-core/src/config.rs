//! Stream configuration.
//!
//! Buffer size and standard-stream policies can be set through the
//! environment:
//! - `FRANKENIO_BUFSIZ`: buffer capacity in bytes (default [`BUFSIZ`]).
//! - `FRANKENIO_STDOUT_MODE`: `full`, `line` (default) or `none`.
//! - `FRANKENIO_STDERR_MODE`: `full`, `line` or `none` (default).
//!
//! Values that do not parse fall back to the default for that key.

use crate::stdio::{BUFSIZ, BufMode};

pub const ENV_BUFSIZ: &str = "FRANKENIO_BUFSIZ";
pub const ENV_STDOUT_MODE: &str = "FRANKENIO_STDOUT_MODE";
pub const ENV_STDERR_MODE: &str = "FRANKENIO_STDERR_MODE";

/// Upper bound accepted from the environment (16 MiB).
pub const MAX_BUFSIZ: usize = 16 * 1024 * 1024;

/// Capacities and policies used when building standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub buffer_size: usize,
    pub stdout_mode: BufMode,
    pub stderr_mode: BufMode,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: BUFSIZ,
            stdout_mode: BufMode::Line,
            stderr_mode: BufMode::None,
        }
    }
}

impl StreamConfig {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            buffer_size: lookup(ENV_BUFSIZ)
                .and_then(|v| parse_bufsiz(&v))
                .unwrap_or(defaults.buffer_size),
            stdout_mode: lookup(ENV_STDOUT_MODE)
                .and_then(|v| BufMode::from_str_loose(&v))
                .unwrap_or(defaults.stdout_mode),
            stderr_mode: lookup(ENV_STDERR_MODE)
                .and_then(|v| BufMode::from_str_loose(&v))
                .unwrap_or(defaults.stderr_mode),
        }
    }
}

/// Parse a capacity in bytes; accepts an optional `k`/`K` suffix (KiB).
fn parse_bufsiz(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let (digits, scale) = match raw.strip_suffix(['k', 'K']) {
        Some(d) => (d, 1024),
        None => (raw, 1),
    };
    let size = digits.parse::<usize>().ok()?.checked_mul(scale)?;
    (1..=MAX_BUFSIZ).contains(&size).then_some(size)
}
