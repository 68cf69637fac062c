use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary of a gist as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistInfo {
    pub id: String,
    /// Browser URL of the gist.
    pub url: String,
    pub description: Option<String>,
    pub public: bool,
    /// Names of the files the gist holds.
    pub files: Vec<String>,
}

impl GistInfo {
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|file| file == name)
    }
}

/// One file of a gist.
///
/// `content` is absent in list responses. GitHub truncates large contents and
/// sets `truncated`; the full text is then available under `raw_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistFile {
    pub filename: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub raw_url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub content: Option<String>,
}

/// Wire representation of a gist shared by the list, get and create endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GistRecord {
    pub id: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
}

impl GistRecord {
    /// Drops per-file details, keeping the names.
    pub fn into_info(self) -> GistInfo {
        GistInfo {
            id: self.id,
            url: self.html_url,
            description: self.description,
            public: self.public,
            files: self.files.into_keys().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FileBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a> {
    pub description: &'a str,
    pub public: bool,
    pub files: BTreeMap<&'a str, FileBody<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PatchBody<'a> {
    pub files: BTreeMap<&'a str, FileBody<'a>>,
}

/// Error document GitHub returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
