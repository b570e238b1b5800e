//! Problem-list loading.

use std::fs;
use std::io;
use std::path::Path;

/// Load problems from a text file, one problem per line.
///
/// Blank lines are skipped; surrounding whitespace is trimmed. A missing
/// file is an error, an empty file yields an empty list.
pub fn load_problems<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
