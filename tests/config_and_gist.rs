use std::path::Path;

use patzm_scripts::ToolError;
use patzm_scripts::config::{
    self, Config, ConfigFile, CredentialProvider, DEFAULT_API_URL, StaticToken,
};
use patzm_scripts::firefox::{self, RunningProcess};
use patzm_scripts::gist::model::GistRecord;
use patzm_scripts::gist::{GistFile, GistStore};
use tempfile::tempdir;

#[test]
fn config_reads_gist_table() {
    let config = Config::parse(
        r#"
        [gist]
        token = "ghp_secret"
        api_url = "https://github.example.com/api/v3/"
        "#,
    )
    .expect("config parsed");

    assert_eq!(config.gist.token.as_deref(), Some("ghp_secret"));
    assert_eq!(config.api_url(), "https://github.example.com/api/v3");
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").expect("config parsed");

    assert_eq!(config, Config::default());
    assert_eq!(config.api_url(), DEFAULT_API_URL);
}

#[test]
fn malformed_config_is_reported() {
    let error = Config::parse("[gist\ntoken = 1").expect_err("parse fails");
    assert!(matches!(error, ToolError::ConfigParse(_)));
}

#[test]
fn missing_config_file_yields_default() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = Config::load(&temp_dir.path().join("config.toml")).expect("config loaded");
    assert_eq!(config, Config::default());
}

#[test]
fn config_file_is_loaded_from_disk() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[gist]\ntoken = \"from-file\"\n").expect("config written");

    let config = Config::load(&path).expect("config loaded");

    assert_eq!(ConfigFile::new(config).token().expect("token"), "from-file");
}

#[test]
fn explicit_token_wins_over_config() {
    let config = Config::parse("[gist]\ntoken = \"from-file\"").expect("config parsed");

    let explicit = config::credentials(Some("from-flag".to_string()), &config);
    let fallback = config::credentials(Some("  ".to_string()), &config);

    assert_eq!(explicit.token().expect("token"), "from-flag");
    assert_eq!(fallback.token().expect("token"), "from-file");
}

#[test]
fn missing_token_is_reported() {
    let provider = ConfigFile::new(Config::default());
    assert!(matches!(provider.token(), Err(ToolError::MissingCredentials)));
    assert!(matches!(
        StaticToken(String::new()).token(),
        Err(ToolError::MissingCredentials)
    ));
}

#[test]
fn gist_records_deserialize_from_api_json() {
    let json = serde_json::json!({
        "id": "aa5a315d61ae9438b18d",
        "html_url": "https://gist.github.com/aa5a315d61ae9438b18d",
        "description": null,
        "public": false,
        "files": {
            "persdict.dat": {
                "filename": "persdict.dat",
                "type": "text/plain",
                "language": null,
                "raw_url": "https://gist.githubusercontent.com/raw/persdict.dat",
                "size": 12
            },
            "notes.md": {
                "filename": "notes.md",
                "type": "text/markdown",
                "language": "Markdown",
                "raw_url": "https://gist.githubusercontent.com/raw/notes.md",
                "size": 3,
                "truncated": true,
                "content": "# n"
            }
        }
    });

    let record: GistRecord = serde_json::from_value(json).expect("record parsed");
    let notes: &GistFile = &record.files["notes.md"];
    assert!(notes.truncated);
    assert_eq!(notes.media_type.as_deref(), Some("text/markdown"));
    assert_eq!(record.files["persdict.dat"].content, None);

    let info = record.into_info();
    assert_eq!(info.id, "aa5a315d61ae9438b18d");
    assert_eq!(info.url, "https://gist.github.com/aa5a315d61ae9438b18d");
    assert_eq!(info.description, None);
    assert!(info.has_file("persdict.dat"));
    assert!(!info.has_file("persdict"));
}

struct SingleFileStore;

impl GistStore for SingleFileStore {
    fn list(&self) -> patzm_scripts::Result<Vec<patzm_scripts::gist::GistInfo>> {
        Ok(Vec::new())
    }

    fn files(&self, _id: &str) -> patzm_scripts::Result<Vec<GistFile>> {
        Ok(vec![GistFile {
            filename: "words.txt".to_string(),
            media_type: None,
            language: None,
            raw_url: String::new(),
            size: 0,
            truncated: false,
            content: None,
        }])
    }

    fn create(
        &self,
        _description: &str,
        _files: &patzm_scripts::gist::FileContents,
        _public: bool,
    ) -> patzm_scripts::Result<patzm_scripts::gist::GistInfo> {
        Err(ToolError::Api {
            status: 403,
            message: "read only".to_string(),
        })
    }

    fn patch(
        &self,
        _id: &str,
        _files: &patzm_scripts::gist::FileContents,
    ) -> patzm_scripts::Result<()> {
        Err(ToolError::Api {
            status: 403,
            message: "read only".to_string(),
        })
    }
}

#[test]
fn content_maps_file_names_to_text() {
    let content = SingleFileStore.content("any").expect("content fetched");
    assert_eq!(content.get("words.txt").map(String::as_str), Some(""));
}

#[test]
fn firefox_process_names_match_case_insensitively() {
    assert!(firefox::is_firefox("firefox"));
    assert!(firefox::is_firefox("Firefox Nightly"));
    assert!(firefox::is_firefox("firefox-bin"));
    assert!(!firefox::is_firefox("thunderbird"));
}

#[test]
fn conflicting_processes_fail_the_check() {
    let processes = vec![
        RunningProcess {
            pid: 42,
            name: "firefox".to_string(),
        },
        RunningProcess {
            pid: 43,
            name: "firefox-bin".to_string(),
        },
    ];

    assert!(firefox::check_conflicts(&[]).is_ok());
    assert!(matches!(
        firefox::check_conflicts(&processes),
        Err(ToolError::ProcessConflict { count: 2 })
    ));
}

#[test]
fn profile_root_depends_on_platform() {
    let home = Path::new("/home/user");

    assert_eq!(
        firefox::profiles_dir_for(home, "macos"),
        Path::new("/home/user/Library/Application Support/Firefox/Profiles")
    );
    assert_eq!(
        firefox::profiles_dir_for(home, "linux"),
        Path::new("/home/user/.mozilla/firefox")
    );
}
