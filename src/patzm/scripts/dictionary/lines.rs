use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::patzm::scripts::error::Result;

/// Unions `local` and `remote`, dropping empty lines and duplicates.
///
/// With `sort` the result is in ascending byte order. Otherwise local lines
/// keep their order and remote lines not already present follow in theirs.
pub fn merge_lines<L, R>(local: L, remote: R, sort: bool) -> Vec<String>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    let lines = local
        .into_iter()
        .map(|line| line.as_ref().to_string())
        .chain(remote.into_iter().map(|line| line.as_ref().to_string()));
    for line in lines {
        if line.is_empty() || seen.contains(&line) {
            continue;
        }
        seen.insert(line.clone());
        merged.push(line);
    }

    if sort {
        merged.sort();
    }
    merged
}

/// Splits document text into lines, accepting `\n` and `\r\n` endings.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Serialises entries one per line with a trailing newline. An empty list
/// yields an empty document.
pub fn render_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text
}

/// Creates `path` when missing without truncating an existing file.
pub fn touch(path: &Path) -> Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

/// Reads the document at `path`, creating an empty one first if needed.
pub fn read_document(path: &Path) -> Result<String> {
    touch(path)?;
    Ok(fs::read_to_string(path)?)
}

/// Reads the lines of the document at `path`, creating it if needed.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(split_lines(&read_document(path)?))
}

/// Replaces the document at `path` with `lines`.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    fs::write(path, render_lines(lines))?;
    Ok(())
}
