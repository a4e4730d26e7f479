//! File-Backed Document Source
//!
//! Hands out the raw text of a source range the way the host editor hands
//! out buffer contents. Large files are memory-mapped instead of read into
//! a buffer first.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::domain::symbol::{SourceLocation, SourceRange};
use crate::error::{Result, TrackError};
use crate::ports::DocumentSource;

pub struct FileDocumentSource {
    mmap_threshold: u64,
}

impl FileDocumentSource {
    pub const DEFAULT_MMAP_THRESHOLD: u64 = 1024 * 1024;

    pub fn new() -> Self {
        Self {
            mmap_threshold: Self::DEFAULT_MMAP_THRESHOLD,
        }
    }

    pub fn with_mmap_threshold(threshold: u64) -> Self {
        Self {
            mmap_threshold: threshold,
        }
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() >= self.mmap_threshold {
            let file = File::open(path)?;
            // SAFETY: read-only mapping, dropped before this call returns;
            // concurrent truncation would be a host contract violation.
            let mmap = unsafe { Mmap::map(&file)? };
            let text = std::str::from_utf8(&mmap).map_err(|err| {
                TrackError::Lookup(format!("{} is not valid UTF-8: {err}", path.display()))
            })?;
            Ok(text.to_string())
        } else {
            Ok(std::fs::read_to_string(path)?)
        }
    }
}

impl Default for FileDocumentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for FileDocumentSource {
    fn text_in_range(&self, location: &SourceLocation) -> Result<String> {
        let text = self.read_file(&location.file)?;
        slice_range(&text, location.range)
    }
}

/// Cut `range` out of `text`. Columns are character offsets; the end column
/// is exclusive. Columns past the end of a line clamp to the line.
fn slice_range(text: &str, range: SourceRange) -> Result<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = range.start;
    let end = range.end;

    if start.line >= lines.len() {
        return Err(TrackError::Lookup(format!(
            "range starts past the end of the document (line {})",
            start.line
        )));
    }

    let end_line = end.line.min(lines.len() - 1);
    if start.line == end_line {
        return Ok(slice_columns(lines[start.line], start.column, Some(end.column)));
    }

    let mut out = String::new();
    out.push_str(&slice_columns(lines[start.line], start.column, None));
    for line in &lines[start.line + 1..end_line] {
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out.push_str(&slice_columns(lines[end_line], 0, Some(end.column)));
    Ok(out)
}

fn slice_columns(line: &str, from: usize, to: Option<usize>) -> String {
    let chars: Vec<char> = line.chars().collect();
    let from = from.min(chars.len());
    let to = to.map(|t| t.clamp(from, chars.len())).unwrap_or(chars.len());
    chars[from..to].iter().collect()
}
