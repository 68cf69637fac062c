use std::collections::BTreeMap;

use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::patzm::scripts::config::{CredentialProvider, DEFAULT_API_URL};
use crate::patzm::scripts::error::{Result, ToolError};
use crate::patzm::scripts::gist::model::{
    ApiErrorBody, CreateBody, FileBody, GistFile, GistInfo, GistRecord, PatchBody,
};
use crate::patzm::scripts::gist::{FileContents, GistStore};

const USER_AGENT: &str = concat!("patzm-scripts/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const PER_PAGE: usize = 100;

/// HTTP client builder carrying the user agent and media type GitHub expects.
pub fn http_builder() -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
}

/// Blocking client for the GitHub gist REST API.
pub struct GistClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GistClient {
    /// Builds a client against the public GitHub API.
    pub fn new(credentials: &dyn CredentialProvider) -> Result<Self> {
        Self::with_api_url(credentials, DEFAULT_API_URL)
    }

    /// Builds a client against `api_url`, resolving the token once.
    pub fn with_api_url(credentials: &dyn CredentialProvider, api_url: &str) -> Result<Self> {
        Self::with_http_client(http_builder().build()?, credentials, api_url)
    }

    /// Uses a preconfigured HTTP client, e.g. one from [`http_builder`] with
    /// custom proxy or timeout settings.
    pub fn with_http_client(
        http: Client,
        credentials: &dyn CredentialProvider,
        api_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: credentials.token()?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(&self.token).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|error| error.message)
            .unwrap_or(body);
        Err(ToolError::Api {
            status: status.as_u16(),
            message,
        })
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn fetch_gist(&self, id: &str) -> Result<GistRecord> {
        let request = self.http.get(self.endpoint(&format!("gists/{id}")));
        match self.send_json(request) {
            Err(ToolError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ToolError::GistNotFound(id.to_string()))
            }
            other => other,
        }
    }

    fn fetch_raw(&self, raw_url: &str) -> Result<String> {
        Ok(self.send(self.http.get(raw_url))?.text()?)
    }
}

fn file_bodies(files: &FileContents) -> BTreeMap<&str, FileBody<'_>> {
    files
        .iter()
        .map(|(name, content)| (name.as_str(), FileBody { content: content.as_str() }))
        .collect()
}

impl GistStore for GistClient {
    #[instrument(level = "debug", skip_all)]
    fn list(&self) -> Result<Vec<GistInfo>> {
        let mut gists = Vec::new();
        let mut page = 1usize;
        loop {
            let request = self.http.get(self.endpoint("gists")).query(&[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
            let records: Vec<GistRecord> = self.send_json(request)?;
            let fetched = records.len();
            gists.extend(records.into_iter().map(GistRecord::into_info));
            debug!(page, fetched, "listed gists");
            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(gists)
    }

    #[instrument(level = "debug", skip(self))]
    fn files(&self, id: &str) -> Result<Vec<GistFile>> {
        let record = self.fetch_gist(id)?;
        let mut files = Vec::with_capacity(record.files.len());
        for mut file in record.files.into_values() {
            if file.truncated || file.content.is_none() {
                debug!(file = %file.filename, "fetching full content from raw URL");
                file.content = Some(self.fetch_raw(&file.raw_url)?);
                file.truncated = false;
            }
            files.push(file);
        }
        Ok(files)
    }

    #[instrument(level = "debug", skip(self, files), fields(file_count = files.len()))]
    fn create(&self, description: &str, files: &FileContents, public: bool) -> Result<GistInfo> {
        let body = CreateBody {
            description,
            public,
            files: file_bodies(files),
        };
        let request = self.http.post(self.endpoint("gists")).json(&body);
        let record: GistRecord = self.send_json(request)?;
        Ok(record.into_info())
    }

    #[instrument(level = "debug", skip(self, files), fields(file_count = files.len()))]
    fn patch(&self, id: &str, files: &FileContents) -> Result<()> {
        let body = PatchBody {
            files: file_bodies(files),
        };
        let request = self
            .http
            .patch(self.endpoint(&format!("gists/{id}")))
            .json(&body);
        self.send(request)?;
        Ok(())
    }
}
