//! Remote document store backed by GitHub gists.
//!
//! [`GistStore`] is the capability the dictionary syncer depends on;
//! [`client::GistClient`] implements it over HTTP.

pub mod client;
pub mod model;

use std::collections::BTreeMap;

use crate::patzm::scripts::error::Result;

pub use client::GistClient;
pub use model::{GistFile, GistInfo};

/// File name to file content, the payload of create and patch requests.
pub type FileContents = BTreeMap<String, String>;

/// Operations the syncer needs from the remote store.
pub trait GistStore {
    /// All gists accessible to the caller.
    fn list(&self) -> Result<Vec<GistInfo>>;

    /// Files of the gist `id`, including their full content.
    fn files(&self, id: &str) -> Result<Vec<GistFile>>;

    /// Content of the gist `id` keyed by file name.
    fn content(&self, id: &str) -> Result<FileContents> {
        Ok(self
            .files(id)?
            .into_iter()
            .map(|file| {
                let content = file.content.unwrap_or_default();
                (file.filename, content)
            })
            .collect())
    }

    /// Creates a gist holding `files` and returns it.
    fn create(&self, description: &str, files: &FileContents, public: bool) -> Result<GistInfo>;

    /// Replaces the content of the named files in the gist `id`.
    fn patch(&self, id: &str, files: &FileContents) -> Result<()>;
}
