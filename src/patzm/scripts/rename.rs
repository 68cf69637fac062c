use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{info, instrument, warn};

use crate::patzm::scripts::error::{Result, ToolError};

/// Pattern used for both directions unless overridden.
pub const DEFAULT_FORMAT: &str = "%Y%m%d_%H%M%S";

/// How file stems are parsed and re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    pub format_in: String,
    pub format_out: String,
    /// Log the renames without performing them.
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            format_in: DEFAULT_FORMAT.to_string(),
            format_out: DEFAULT_FORMAT.to_string(),
            dry_run: false,
        }
    }
}

/// A rename performed, or planned in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Rejects strftime patterns with unknown specifiers.
pub fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ToolError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

/// Parses `stem` as a date-time, accepting date-only patterns at midnight.
pub fn parse_stem(stem: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stem, format).ok().or_else(|| {
        NaiveDate::parse_from_str(stem, format)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

fn format_datetime(datetime: &NaiveDateTime, format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", datetime.format(format))
        .map_err(|_| ToolError::InvalidDateFormat(format.to_string()))?;
    Ok(rendered)
}

/// New path for `path`, or `None` when its stem does not match `format_in`.
pub fn target_path(path: &Path, format_in: &str, format_out: &str) -> Result<Option<PathBuf>> {
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        return Ok(None);
    };
    let Some(datetime) = parse_stem(stem, format_in) else {
        return Ok(None);
    };

    let mut file_name = format_datetime(&datetime, format_out)?;
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        file_name.push('.');
        file_name.push_str(extension);
    }
    Ok(Some(path.with_file_name(file_name)))
}

/// Renames every file in `paths` whose stem carries a timestamp.
///
/// Paths that are not files, stems that do not parse and targets that
/// already exist are skipped with a warning.
#[instrument(
    level = "info",
    skip_all,
    fields(format_in = %options.format_in, format_out = %options.format_out)
)]
pub fn rename_files<P: AsRef<Path>>(paths: &[P], options: &RenameOptions) -> Result<Vec<Rename>> {
    validate_format(&options.format_in)?;
    validate_format(&options.format_out)?;

    let mut renames = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            warn!(path = %path.display(), "not a file, skipping");
            continue;
        }

        let Some(target) = target_path(path, &options.format_in, &options.format_out)? else {
            warn!(path = %path.display(), "could not parse a datetime from the file name");
            continue;
        };
        if target == path {
            continue;
        }
        if target.exists() {
            warn!(path = %path.display(), target = %target.display(), "target exists, skipping");
            continue;
        }

        info!(from = %path.display(), to = %target.display(), "renaming");
        if !options.dry_run {
            fs::rename(path, &target)?;
        }
        renames.push(Rename {
            from: path.to_path_buf(),
            to: target,
        });
    }
    Ok(renames)
}
