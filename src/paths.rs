use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the bundled content directory: `<exe_dir>/content/`
pub fn get_default_content_dir() -> PathBuf {
    get_exe_dir().join("content")
}

/// Returns the per-user local state file.
///
/// `<data_local_dir>/human-ocr/local_state.json`, or next to the executable
/// when the platform has no local data directory.
pub fn get_default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("human-ocr"))
        .unwrap_or_else(|| get_exe_dir().clone())
        .join("local_state.json")
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    if let Some(parent) = get_default_state_file().parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
