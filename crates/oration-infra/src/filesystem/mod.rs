//! Data directory layout for Oration.
//!
//! Everything Oration keeps on disk (`config.toml`, `oration.db`) lives in a
//! single data directory.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "ORATION_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ORATION_DATA_DIR` environment variable
/// 2. `~/.oration`
/// 3. `.oration` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    resolve_data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn resolve_data_dir_from(env_value: Option<String>) -> PathBuf {
    if let Some(dir) = env_value.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".oration");
    }

    PathBuf::from(".oration")
}

/// Create the data directory (and parents) if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_data_dir_from_env() {
        let dir = resolve_data_dir_from(Some("/tmp/test-oration".to_string()));
        assert_eq!(dir, PathBuf::from("/tmp/test-oration"));
    }

    #[test]
    fn test_resolve_data_dir_default_ends_with_dot_oration() {
        let dir = resolve_data_dir_from(None);
        assert!(dir.ends_with(".oration"));

        let dir = resolve_data_dir_from(Some(String::new()));
        assert!(dir.ends_with(".oration"));
    }

    #[tokio::test]
    async fn test_ensure_data_dir_creates_nested() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_data_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Idempotent.
        ensure_data_dir(&nested).await.unwrap();
    }
}
