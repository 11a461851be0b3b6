use colored::Colorize;
use fleetkit::is_timing_line;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a pass log: error lines always, timing lines only when verbose
pub fn run_log(lines: &[String], verbose: bool) {
    for line in lines {
        if is_timing_line(line) {
            if verbose {
                dim(line);
            }
        } else {
            error(line);
        }
    }
}

/// Placeholder for a value that has not been collected
pub fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Pad to `width` display columns
pub fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

// ============================================================================
// Tests
// ============================================================================
