//! Storage configuration.
//!
//! The storage root is resolved exactly once at process start and is
//! read-only afterwards. Resolution order:
//!
//! 1. an explicit path (command-line flag),
//! 2. the `GALLERY_STORAGE_ROOT` environment variable,
//! 3. `public/uploads` under the current working directory.
//!
//! Relative paths are anchored at the working directory during resolution,
//! so a later `chdir` cannot move the store.

use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit root is given.
pub const STORAGE_ROOT_ENV: &str = "GALLERY_STORAGE_ROOT";

/// Default root, relative to the working directory.
pub const DEFAULT_STORAGE_ROOT: &str = "public/uploads";

/// Resolved storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Absolute directory holding every stored object.
    pub storage_root: PathBuf,
}

impl StorageConfig {
    /// Use `storage_root` as given, without consulting the environment.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    /// Resolve the storage root from an optional explicit path, the
    /// environment, and the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkingDirectory`] when a relative path must be
    /// anchored and the working directory cannot be determined.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let from_env = std::env::var(STORAGE_ROOT_ENV).ok();
        let needs_cwd = match (&explicit, &from_env) {
            (Some(p), _) => p.is_relative(),
            (None, Some(v)) if !v.trim().is_empty() => Path::new(v).is_relative(),
            _ => true,
        };
        let cwd = if needs_cwd {
            std::env::current_dir().map_err(ConfigError::WorkingDirectory)?
        } else {
            PathBuf::new()
        };
        Ok(resolve_with(explicit, from_env, &cwd))
    }
}

/// Pure resolution step, separated from process state for testing.
fn resolve_with(explicit: Option<PathBuf>, from_env: Option<String>, cwd: &Path) -> StorageConfig {
    let chosen = explicit
        .or_else(|| {
            from_env
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT));

    let storage_root = if chosen.is_absolute() {
        chosen
    } else {
        cwd.join(chosen)
    };
    StorageConfig { storage_root }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The working directory is needed to anchor a relative root.
    #[error("cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> PathBuf {
        PathBuf::from("/srv/gallery")
    }

    #[test]
    fn explicit_path_wins() {
        let cfg = resolve_with(
            Some(PathBuf::from("/data/images")),
            Some("/ignored".to_string()),
            &cwd(),
        );
        assert_eq!(cfg.storage_root, PathBuf::from("/data/images"));
    }

    #[test]
    fn env_used_when_no_explicit_path() {
        let cfg = resolve_with(None, Some("/var/lib/gallery".to_string()), &cwd());
        assert_eq!(cfg.storage_root, PathBuf::from("/var/lib/gallery"));
    }

    #[test]
    fn blank_env_is_ignored() {
        let cfg = resolve_with(None, Some("  ".to_string()), &cwd());
        assert_eq!(cfg.storage_root, PathBuf::from("/srv/gallery/public/uploads"));
    }

    #[test]
    fn default_is_anchored_at_working_directory() {
        let cfg = resolve_with(None, None, &cwd());
        assert_eq!(cfg.storage_root, PathBuf::from("/srv/gallery/public/uploads"));
    }

    #[test]
    fn relative_explicit_path_is_anchored() {
        let cfg = resolve_with(Some(PathBuf::from("media")), None, &cwd());
        assert_eq!(cfg.storage_root, PathBuf::from("/srv/gallery/media"));
    }

    #[test]
    fn resolve_with_absolute_explicit_skips_environment() {
        let cfg = StorageConfig::resolve(Some(PathBuf::from("/abs/root"))).unwrap();
        assert_eq!(cfg.storage_root, PathBuf::from("/abs/root"));
    }
}
