use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::patzm::scripts::dictionary::lines::{
    merge_lines, read_document, read_lines, render_lines, split_lines, write_lines,
};
use crate::patzm::scripts::error::{Result, ToolError};
use crate::patzm::scripts::firefox::DICTIONARY_FILE;
use crate::patzm::scripts::gist::{FileContents, GistInfo, GistStore};

/// Description attached to gists created by the syncer.
pub const GIST_DESCRIPTION: &str = "Synced with patzm-scripts.";

/// Settings of a single file sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Gist to sync with. Without one, the gist is looked up by file name.
    pub gist_id: Option<String>,
    /// Sort merged entries instead of keeping file order.
    pub sort: bool,
    /// Visibility of a gist created on first sync.
    pub public: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            gist_id: None,
            sort: true,
            public: false,
        }
    }
}

/// What a sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No gist held the file yet; one was created from the local content.
    Created { gist: GistInfo },
    /// Local and remote lines were merged into `entries` lines.
    Merged {
        gist_id: String,
        entries: usize,
        local_updated: bool,
        remote_updated: bool,
    },
}

/// Synchronises the line set in `path` with its gist.
///
/// The local file is always rewritten with the merged lines; the gist is only
/// patched when its line set differs from the merge.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), gist_id = options.gist_id.as_deref().unwrap_or("-"))
)]
pub fn sync_file<S: GistStore + ?Sized>(
    store: &S,
    path: &Path,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    let file_name = gist_file_name(path)?;
    let gists = store.list()?;
    debug!(gist_count = gists.len(), "listed gists");

    let target = match &options.gist_id {
        Some(id) => gists
            .into_iter()
            .find(|gist| &gist.id == id)
            .ok_or_else(|| ToolError::GistNotFound(id.clone()))?,
        None => match gists.into_iter().find(|gist| gist.has_file(&file_name)) {
            Some(gist) => {
                info!(gist_id = %gist.id, "using existing gist");
                gist
            }
            None => {
                info!(file = %file_name, "no gist contains the file, creating a new gist");
                return upload(store, path, &file_name, options.public);
            }
        },
    };

    merge_with_remote(store, path, &file_name, &target.id, options.sort)
}

fn gist_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidFileName(path.to_path_buf()))
}

fn upload<S: GistStore + ?Sized>(
    store: &S,
    path: &Path,
    file_name: &str,
    public: bool,
) -> Result<SyncOutcome> {
    let content = read_document(path)?;
    if split_lines(&content).iter().all(String::is_empty) {
        return Err(ToolError::EmptySource(path.to_path_buf()));
    }

    let files = FileContents::from([(file_name.to_string(), content)]);
    let gist = store.create(GIST_DESCRIPTION, &files, public)?;
    info!(url = %gist.url, "local file uploaded");
    Ok(SyncOutcome::Created { gist })
}

fn merge_with_remote<S: GistStore + ?Sized>(
    store: &S,
    path: &Path,
    file_name: &str,
    gist_id: &str,
    sort: bool,
) -> Result<SyncOutcome> {
    let contents = store.content(gist_id)?;
    let remote_lines = match contents.get(file_name) {
        Some(text) => split_lines(text),
        None => {
            warn!(file = %file_name, "gist holds no such file, it will be added");
            Vec::new()
        }
    };
    let local_lines = read_lines(path)?;
    let merged = merge_lines(&local_lines, &remote_lines, sort);

    let merged_set: HashSet<&str> = merged.iter().map(String::as_str).collect();
    let remote_set: HashSet<&str> = remote_lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .collect();
    let local_set: HashSet<&str> = local_lines.iter().map(String::as_str).collect();
    let remote_up_to_date = merged_set == remote_set;
    let local_up_to_date = merged_set == local_set;

    if remote_up_to_date {
        info!("remote content is up to date");
    }
    if local_up_to_date {
        info!("local content is up to date");
    }
    if !remote_up_to_date || !local_up_to_date {
        info!(entries = merged.len(), "new content merged");
    }

    write_lines(path, &merged)?;

    if !remote_up_to_date {
        let files = FileContents::from([(file_name.to_string(), render_lines(&merged))]);
        store.patch(gist_id, &files)?;
        debug!("remote content replaced");
    }

    Ok(SyncOutcome::Merged {
        gist_id: gist_id.to_string(),
        entries: merged.len(),
        local_updated: !local_up_to_date,
        remote_updated: !remote_up_to_date,
    })
}

/// Settings of a batch sync over all profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Passed on to every profile's [`SyncOptions::sort`].
    pub sort: bool,
    /// Abort on the first failing profile instead of continuing.
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            sort: true,
            fail_fast: false,
        }
    }
}

/// Per-profile results of [`sync_all`].
#[derive(Debug, Default)]
pub struct BatchReport {
    pub synced: Vec<(PathBuf, SyncOutcome)>,
    pub failed: Vec<(PathBuf, ToolError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.synced.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Turns a report with failures into [`ToolError::BatchFailed`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ToolError::BatchFailed {
                failed: self.failed.len(),
                total: self.total(),
            })
        }
    }
}

/// Dictionary paths of every profile directory below `root`, in name order.
pub fn profile_dictionaries(root: &Path) -> Result<Vec<PathBuf>> {
    let mut profiles = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            profiles.push(entry.path().join(DICTIONARY_FILE));
        }
    }
    profiles.sort();
    Ok(profiles)
}

/// Syncs the dictionary of every profile under `root`, looking gists up by
/// file name.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn sync_all<S: GistStore + ?Sized>(
    store: &S,
    root: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let sync_options = SyncOptions {
        gist_id: None,
        sort: options.sort,
        public: false,
    };

    let mut report = BatchReport::default();
    for dictionary in profile_dictionaries(root)? {
        info!(path = %dictionary.display(), "syncing");
        match sync_file(store, &dictionary, &sync_options) {
            Ok(outcome) => report.synced.push((dictionary, outcome)),
            Err(err) if options.fail_fast => return Err(err),
            Err(err) => {
                error!(path = %dictionary.display(), error = %err, "profile sync failed");
                report.failed.push((dictionary, err));
            }
        }
    }

    info!(
        synced = report.synced.len(),
        failed = report.failed.len(),
        "batch sync finished"
    );
    Ok(report)
}
