use std::path::{Path, PathBuf};

use sysinfo::{ProcessesToUpdate, System};
use tracing::error;

use crate::patzm::scripts::error::{Result, ToolError};

/// Name of the personal spell-check dictionary inside a profile.
pub const DICTIONARY_FILE: &str = "persdict.dat";

const PROCESS_NAME: &str = "firefox";

/// A running process that holds Firefox profile files open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub pid: u32,
    pub name: String,
}

/// Profile root below `home` for the operating system `os` (as in
/// `std::env::consts::OS`).
pub fn profiles_dir_for(home: &Path, os: &str) -> PathBuf {
    match os {
        "macos" => home.join("Library/Application Support/Firefox/Profiles"),
        _ => home.join(".mozilla/firefox"),
    }
}

/// Profile root of the current user on this platform.
pub fn profiles_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ToolError::MissingHomeDirectory)?;
    Ok(profiles_dir_for(&home, std::env::consts::OS))
}

pub fn is_firefox(process_name: &str) -> bool {
    process_name.to_lowercase().contains(PROCESS_NAME)
}

/// All running processes whose name contains "firefox", ignoring case.
pub fn running_processes() -> Vec<RunningProcess> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut processes: Vec<RunningProcess> = system
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let name = process.name().to_string_lossy().into_owned();
            is_firefox(&name).then(|| RunningProcess {
                pid: pid.as_u32(),
                name,
            })
        })
        .collect();
    processes.sort_by_key(|process| process.pid);
    processes
}

/// Fails with [`ToolError::ProcessConflict`] while Firefox is running.
pub fn ensure_not_running() -> Result<()> {
    check_conflicts(&running_processes())
}

/// Logs every process in `processes` and fails if there is any.
pub fn check_conflicts(processes: &[RunningProcess]) -> Result<()> {
    if processes.is_empty() {
        return Ok(());
    }
    error!(count = processes.len(), "found running Firefox processes");
    for process in processes {
        error!(pid = process.pid, name = %process.name, "Firefox process");
    }
    Err(ToolError::ProcessConflict {
        count: processes.len(),
    })
}
