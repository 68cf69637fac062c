//! Keeps a local one-entry-per-line file and its gist mirror in sync.

pub mod lines;
pub mod sync;

pub use lines::{merge_lines, read_lines, render_lines, split_lines, write_lines};
pub use sync::{
    BatchOptions, BatchReport, GIST_DESCRIPTION, SyncOptions, SyncOutcome, profile_dictionaries,
    sync_all, sync_file,
};
