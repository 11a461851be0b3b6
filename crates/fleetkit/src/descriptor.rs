//! Descriptor (pom.xml) line search and line patching.
//!
//! The descriptor is treated as line-addressable text, never parsed as XML.
//! Reading reproduces `grep -n -A 5 '<anchor>' pom.xml | grep '<version>'`:
//! each surviving line is reported as `"<n>-<content>"` (or `"<n>:<content>"`
//! for the anchor line itself) and split back at the separator that follows
//! the line number.
//!
//! Writing replaces exactly one line, keeping its leading whitespace and line
//! terminator, after checking that the line still holds the declaration that
//! was collected.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Default descriptor file name
pub const DEFAULT_FILE_NAME: &str = "pom.xml";

/// Lines of context searched after an anchor
pub const CONTEXT_LINES: usize = 5;

const VERSION_TAG: &str = "<version>";
const PARENT_ANCHOR: &str = "<parent>";

/// A version declaration and the 1-based line it sits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub line: usize,
    pub value: String,
}

/// Project and parent version declarations of one descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub version: Option<Declaration>,
    pub parent_version: Option<Declaration>,
}

/// Why a line patch did not happen
#[derive(Debug)]
pub enum PatchError {
    Io(io::Error),
    /// The addressed line no longer holds the expected declaration
    Stale { found: String },
}

impl From<io::Error> for PatchError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Line-numbered search with trailing context, grep style.
///
/// Lines containing `anchor` are reported as `"n:line"`; up to `after`
/// following lines as `"n-line"`. A match inside the context window restarts
/// the window.
pub fn numbered_search(content: &str, anchor: &str, after: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut remaining = 0;

    for (idx, line) in content.lines().enumerate() {
        let number = idx + 1;
        if line.contains(anchor) {
            out.push(format!("{number}:{line}"));
            remaining = after;
        } else if remaining > 0 {
            out.push(format!("{number}-{line}"));
            remaining -= 1;
        }
    }

    out
}

/// Split a numbered search entry into line number and content.
///
/// The separator is the first character after the leading digits, so a `-`
/// inside the content (as in `1.0.0-SNAPSHOT`) is never taken for it.
pub fn split_numbered(entry: &str) -> Option<(usize, &str)> {
    let digits = entry.bytes().take_while(u8::is_ascii_digit).count();
    let (number, rest) = entry.split_at(digits);
    let content = rest.strip_prefix('-').or_else(|| rest.strip_prefix(':'))?;
    let line = number.parse().ok()?;
    Some((line, content))
}

/// Remove every `<...>` tag and trim surrounding whitespace
pub fn strip_tags(content: &str) -> String {
    tag_regex().replace_all(content, "").trim().to_string()
}

/// First `<version>` line within the context window of `anchor`
pub fn find_declaration(content: &str, anchor: &str) -> Option<Declaration> {
    let entry = numbered_search(content, anchor, CONTEXT_LINES)
        .into_iter()
        .find(|entry| entry.contains(VERSION_TAG))?;
    let (line, text) = split_numbered(&entry)?;
    Some(Declaration {
        line,
        value: strip_tags(text),
    })
}

/// Anchor that opens the project's own coordinates
pub fn artifact_anchor(artifact_id: &str) -> String {
    format!("<artifactId>{artifact_id}</artifactId>")
}

/// Extract both declarations from descriptor text
pub fn parse_declarations(content: &str, artifact_id: &str) -> Declarations {
    Declarations {
        version: find_declaration(content, &artifact_anchor(artifact_id)),
        parent_version: find_declaration(content, PARENT_ANCHOR),
    }
}

/// Read a descriptor file and extract both declarations
pub fn read_declarations(path: &Path, artifact_id: &str) -> io::Result<Declarations> {
    let content = fs::read_to_string(path)?;
    Ok(parse_declarations(&content, artifact_id))
}

/// Replacement text for one version line: indentation kept, content replaced
pub fn version_line(original: &str, version: &str) -> String {
    let indent_len = original
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    format!("{}<version>{version}</version>", &original[..indent_len])
}

/// Check that `line` still declares `expected`
fn line_matches(line: &str, expected: &str) -> bool {
    !expected.is_empty() && line.contains(VERSION_TAG) && strip_tags(line) == expected
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Rewrite line `line_no` of `content` as a version element carrying `version`.
///
/// Fails with [`PatchError::Stale`] when the line does not exist or no longer
/// declares `expected`. Every other byte of `content` is preserved.
pub fn patch_content(
    content: &str,
    line_no: usize,
    expected: &str,
    version: &str,
) -> Result<String, PatchError> {
    let mut patched = String::with_capacity(content.len() + version.len());
    let mut hit = false;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        if idx + 1 != line_no {
            patched.push_str(line);
            continue;
        }
        let (body, terminator) = split_terminator(line);
        if !line_matches(body, expected) {
            return Err(PatchError::Stale {
                found: body.to_string(),
            });
        }
        patched.push_str(&version_line(body, version));
        patched.push_str(terminator);
        hit = true;
    }

    if !hit {
        return Err(PatchError::Stale {
            found: String::new(),
        });
    }
    Ok(patched)
}

/// Two-phase in-place patch of one descriptor line.
///
/// Re-reads the file, validates the addressed line against the collected
/// value, then writes the file back with only that line changed.
pub fn patch_file(
    path: &Path,
    line_no: usize,
    expected: &str,
    version: &str,
) -> Result<(), PatchError> {
    let content = fs::read_to_string(path)?;
    let patched = patch_content(&content, line_no, expected, version)?;
    fs::write(path, patched)?;
    log::debug!(
        "patched {}:{} {} -> {}",
        path.display(),
        line_no,
        expected,
        version
    );
    Ok(())
}
