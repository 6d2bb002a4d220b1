use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use spend_core::settings::ViewKind;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Text shown when no CSV path was given on the command line.
pub const PATH_PROMPT: &str = "Enter the path to your CSV file: ";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `DEBUG`/`INFO`/`WARNING`/`ERROR` level name to a tracing directive.
/// Unrecognised names fall back to `"warn"`.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so that stdout stays reserved for the prompt, the
/// reported messages and the JSON view.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))?;

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── CSV path ───────────────────────────────────────────────────────────────────

/// Ask for the CSV path on `output` and read one line from `input`.
///
/// Surrounding whitespace is trimmed; no other validation is done here.
pub fn prompt_for_path<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<PathBuf> {
    write!(output, "{PATH_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}

/// `true` when the path prompt must stay off stdout because `view` writes
/// its report there.
pub fn prompt_on_stderr(view: ViewKind) -> bool {
    view == ViewKind::Json
}

/// Use `given` when present, otherwise prompt on stdin. The prompt goes to
/// stdout, or to stderr for the JSON view.
pub fn resolve_csv_path(given: Option<PathBuf>, view: ViewKind) -> io::Result<PathBuf> {
    match given {
        Some(path) => Ok(path),
        None if prompt_on_stderr(view) => {
            prompt_for_path(io::stdin().lock(), io::stderr().lock())
        }
        None => prompt_for_path(io::stdin().lock(), io::stdout().lock()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
