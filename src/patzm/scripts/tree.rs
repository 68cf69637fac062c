use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::patzm::scripts::error::Result;

/// A directory and the number of regular files below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirCount {
    pub name: String,
    /// Files in this directory and all of its descendants.
    pub files: usize,
    pub children: Vec<DirCount>,
}

/// Order of sibling directories in the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

/// Counts the files below `path`. Symlinks are neither counted nor followed.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn count_files(path: &Path) -> Result<DirCount> {
    count_dir(path, path.display().to_string())
}

fn count_dir(path: &Path, name: String) -> Result<DirCount> {
    let mut files = 0;
    let mut children = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            let child_name = entry.file_name().to_string_lossy().into_owned();
            let child = count_dir(&entry.path(), child_name)?;
            files += child.files;
            children.push(child);
        } else if file_type.is_file() {
            files += 1;
        }
    }

    debug!(path = %path.display(), files, "counted directory");
    Ok(DirCount {
        name,
        files,
        children,
    })
}

/// Orders the children of every directory by file count, ties by name.
pub fn sort_tree(tree: &mut DirCount, order: SortOrder) {
    tree.children.sort_by(|a, b| {
        let by_count = match order {
            SortOrder::Descending => b.files.cmp(&a.files),
            SortOrder::Ascending => a.files.cmp(&b.files),
        };
        match by_count {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        }
    });
    for child in &mut tree.children {
        sort_tree(child, order);
    }
}

/// Draws the tree, one `name: count` line per directory.
pub fn render(tree: &DirCount) -> String {
    let mut out = format!("{}: {}\n", tree.name, tree.files);
    render_children(&tree.children, "", &mut out);
    out
}

fn render_children(children: &[DirCount], prefix: &str, out: &mut String) {
    for (index, child) in children.iter().enumerate() {
        let last = index + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!("{prefix}{branch}{}: {}\n", child.name, child.files));
        render_children(&child.children, &format!("{prefix}{indent}"), out);
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
