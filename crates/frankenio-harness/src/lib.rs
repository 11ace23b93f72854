//! Tooling built on frankenio-core.
//!
//! This crate provides:
//! - Copy and line-count routines used by the `fio` binary
//! - Structured JSONL logging for tool runs

#![forbid(unsafe_code)]

pub mod copy;
pub mod structured_log;

pub use copy::{CopyOptions, HarnessError, cat_file, copy_file, copy_stream, count_lines};
pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, validate_log_line};
