//! CLI entrypoint for the frankenio stream tools.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

use frankenio_core::stdio::perror;
use frankenio_core::{
    BUFSIZ, BufMode, BufferedWriter, OpenMode, RawByteSink, StdStreams, StreamConfig,
    StreamError, WritableStream, parse_mode,
};
use frankenio_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use frankenio_harness::{CopyOptions, HarnessError, cat_file, copy_file, copy_stream, count_lines};

const COMPONENT: &str = "fio";

/// Buffered stream tools over raw descriptors.
#[derive(Debug, Parser)]
#[command(name = "fio")]
#[command(about = "Copy, concatenate and count through frankenio buffered streams")]
struct Cli {
    /// Append a structured JSONL record per operation to this file.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Concatenate files (or standard input when none are given) to standard output.
    Cat {
        paths: Vec<PathBuf>,
    },
    /// Copy one file to another.
    Copy {
        #[arg(long)]
        from: PathBuf,
        #[arg(long)]
        to: PathBuf,
        /// Destination open mode: w (truncate), a (append) or r+.
        #[arg(long, default_value = "w", value_parser = parse_open_mode)]
        mode: OpenMode,
        /// Destination buffering: full, line or none.
        #[arg(long, default_value = "full", value_parser = parse_buf_mode)]
        buffering: BufMode,
        /// Buffer capacity in bytes.
        #[arg(long, default_value_t = BUFSIZ)]
        bufsiz: usize,
    },
    /// Count lines in a file (or standard input).
    LineCount {
        path: Option<PathBuf>,
    },
}

fn parse_open_mode(raw: &str) -> Result<OpenMode, String> {
    match parse_mode(raw.as_bytes()) {
        Some(OpenMode::Read) => Err("destination must be writable".to_string()),
        Some(mode) => Ok(mode),
        None => Err(format!("invalid open mode '{raw}'")),
    }
}

fn parse_buf_mode(raw: &str) -> Result<BufMode, String> {
    BufMode::from_str_loose(raw).ok_or_else(|| format!("invalid buffering mode '{raw}'"))
}

type Emitter = LogEmitter<BufferedWriter<RawByteSink>>;

/// Owns the standard streams and the optional log for one run.
struct Session {
    streams: StdStreams,
    log: Option<Emitter>,
    failed: bool,
}

impl Session {
    fn record(&mut self, entry: LogEntry) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        if let Err(err) = log.emit_entry(entry) {
            let _ = perror(&mut self.streams.error, "fio: log", &err);
            self.log = None;
        }
    }

    fn report(&mut self, prefix: &str, err: &StreamError) {
        self.failed = true;
        let _ = perror(&mut self.streams.error, prefix, err);
    }

    fn report_harness(&mut self, err: &HarnessError) {
        let prefix = err.path().display().to_string();
        self.report(&prefix, &err.stream_error());
    }
}

fn entry(command: &str, event: &str, started: Instant) -> LogEntry {
    LogEntry::new("", LogLevel::Info, event)
        .with_command(command)
        .with_duration_ms(started.elapsed().as_millis() as u64)
}

fn finish(entry: LogEntry, result: Result<u64, StreamError>) -> LogEntry {
    match result {
        Ok(bytes) => entry.with_bytes(bytes).with_outcome(Outcome::Pass),
        Err(err) => LogEntry {
            level: LogLevel::Error,
            ..entry.with_error(&err)
        },
    }
}

fn run_cat(session: &mut Session, paths: &[PathBuf]) {
    if paths.is_empty() {
        let started = Instant::now();
        let streams = &mut session.streams;
        let result = copy_stream(&mut streams.input, &mut streams.output);
        if let Err(err) = &result {
            session.report("fio: cat", err);
        }
        let record = finish(entry("cat", "cat_stdin", started), result);
        session.record(record);
        return;
    }

    for path in paths {
        let started = Instant::now();
        let result = cat_file(path, &mut session.streams.output);
        if let Err(err) = &result {
            session.report_harness(err);
        }
        let record = finish(
            entry("cat", "cat_file", started).with_path(path.display().to_string()),
            result.map_err(|e| e.stream_error()),
        );
        session.record(record);
    }
}

fn run_copy(session: &mut Session, from: &Path, to: &Path, options: &CopyOptions) {
    let started = Instant::now();
    let result = copy_file(from, to, options);
    if let Err(err) = &result {
        session.report_harness(err);
    }
    let record = finish(
        entry("copy", "copy_file", started)
            .with_path(to.display().to_string())
            .with_buffering(options.buffering)
            .with_details(serde_json::json!({
                "from": from.display().to_string(),
                "bufsiz": options.bufsiz,
            })),
        result.map_err(|e| e.stream_error()),
    );
    session.record(record);
}

fn run_line_count(session: &mut Session, path: Option<&Path>) {
    let started = Instant::now();
    let result = match path {
        None => count_lines(&mut session.streams.input),
        Some(path) => frankenio_core::open_for_reading(path).and_then(|source| {
            let mut reader = frankenio_core::BufferedReader::new(source);
            count_lines(&mut reader)
        }),
    };

    let result = match result {
        Ok(lines) => {
            let line = match path {
                Some(path) => format!("{lines} {}\n", path.display()),
                None => format!("{lines}\n"),
            };
            session.streams.output.write_str(&line).map(|()| lines)
        }
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        let prefix = path.map_or_else(|| "fio: line-count".to_string(), |p| p.display().to_string());
        session.report(&prefix, err);
    }

    let mut record = entry("line-count", "line_count", started);
    if let Some(path) = path {
        record = record.with_path(path.display().to_string());
    }
    let record = match result {
        Ok(lines) => record
            .with_outcome(Outcome::Pass)
            .with_details(serde_json::json!({ "lines": lines })),
        Err(err) => finish(record, Err(err)),
    };
    session.record(record);
}

fn run_id() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("{secs}-{}", std::process::id())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = StreamConfig::from_env();
    let mut session = Session {
        streams: StdStreams::open(&config),
        log: None,
        failed: false,
    };

    if let Some(path) = &cli.log {
        match LogEmitter::to_file(path, COMPONENT, &run_id()) {
            Ok(emitter) => session.log = Some(emitter),
            Err(err) => {
                session.report(&path.display().to_string(), &err);
                return ExitCode::FAILURE;
            }
        }
    }

    match &cli.command {
        Command::Cat { paths } => run_cat(&mut session, paths),
        Command::Copy {
            from,
            to,
            mode,
            buffering,
            bufsiz,
        } => {
            let options = CopyOptions {
                mode: *mode,
                buffering: *buffering,
                bufsiz: *bufsiz,
            };
            run_copy(&mut session, from, to, &options);
        }
        Command::LineCount { path } => run_line_count(&mut session, path.as_deref()),
    }

    if let Some(log) = session.log.as_mut()
        && let Err(err) = log.flush()
    {
        session.report("fio: log", &err);
    }
    if let Err(err) = session.streams.flush() {
        session.report("fio", &err);
    }

    if session.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
