//! Data directory layout.

use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "ladle.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LADLE_DATA_DIR` environment variable
/// 2. `~/.ladle`
/// 3. `.ladle` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LADLE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".ladle");
    }

    PathBuf::from(".ladle")
}

/// `{data_dir}/ladle.toml`
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// `{data_dir}/ladle-chat-session.json`
pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{}.json", ladle_core::chat::store::SESSION_STORAGE_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_paths() {
        let data_dir = PathBuf::from("/home/user/.ladle");
        assert_eq!(config_path(&data_dir), PathBuf::from("/home/user/.ladle/ladle.toml"));
        assert_eq!(
            session_path(&data_dir),
            PathBuf::from("/home/user/.ladle/ladle-chat-session.json")
        );
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is the only one touching LADLE_DATA_DIR and restores it immediately.
        unsafe {
            std::env::set_var("LADLE_DATA_DIR", "/tmp/test-ladle");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-ladle"));
        unsafe {
            std::env::remove_var("LADLE_DATA_DIR");
        }
    }
}
