//! GitHub Actions workflow commands.
//!
//! These lines go to stdout, where the runner turns them into annotations
//! and collapsible log groups. Internal detail goes through `tracing`
//! instead, which writes to stderr. When stdout carries machine-readable
//! output, [`route_to_stderr`] moves the commands over to stderr, which the
//! runner scans as well.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Write every subsequent workflow command to stderr instead of stdout.
pub fn route_to_stderr() {
    TO_STDERR.store(true, Ordering::Relaxed);
}

fn emit(line: &str) {
    if TO_STDERR.load(Ordering::Relaxed) {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Notice,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        f.write_str(s)
    }
}

/// Escape message data so the runner reads it as a single command.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn format_command(level: Level, message: &str) -> String {
    format!("::{level}::{}", escape_data(message))
}

pub fn echo(message: &str) {
    emit(message);
}

pub fn notice(message: &str) {
    emit(&format_command(Level::Notice, message));
}

pub fn warning(message: &str) {
    tracing::debug!(%message, "warning annotation");
    emit(&format_command(Level::Warning, message));
}

pub fn error(message: &str) {
    tracing::debug!(%message, "error annotation");
    emit(&format_command(Level::Error, message));
}

/// A collapsible log group, closed when dropped.
#[must_use = "the group closes as soon as the guard is dropped"]
pub struct Group(());

pub fn group(title: &str) -> Group {
    emit(&format!("::group::{}", escape_data(title)));
    Group(())
}

impl Drop for Group {
    fn drop(&mut self) {
        emit("::endgroup::");
    }
}
