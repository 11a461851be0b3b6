//! Run log - per-pass accumulation of timings and errors.
//!
//! Workers append whole lines through a mutex; the caller reads the log after
//! the pass has joined. A line is never split or merged with another.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const TIMING_MARKER: &str = ": elapsed: ";

/// Whether a log line is a timing line rather than an error line
pub fn is_timing_line(line: &str) -> bool {
    line.contains(TIMING_MARKER) && line.ends_with("ms")
}

/// Shared, append-only log for one pass
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Mutex<Vec<String>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line
    pub fn append(&self, line: impl Into<String>) {
        self.lock().push(line.into());
    }

    /// Append a timing line: `<repo>-<step>: elapsed: <ms>ms`
    pub fn timing(&self, repo: &str, step: &str, elapsed: Duration) {
        let line = format!("{repo}-{step}{TIMING_MARKER}{}ms", elapsed.as_millis());
        log::debug!("{line}");
        self.append(line);
    }

    /// Append an error line
    pub fn error(&self, err: &dyn std::error::Error) {
        let line = err.to_string();
        log::warn!("{line}");
        self.append(line);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the lines appended so far
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Consume the log after the pass has joined
    pub fn into_lines(self) -> Vec<String> {
        match self.lines.into_inner() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Whole log as newline-terminated text
    pub fn to_text(&self) -> String {
        self.lock().iter().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }

    // A worker panicking mid-pass must not hide the lines already collected
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
