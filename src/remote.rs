//! Remote storage through rclone: name-based video fetches and output uploads.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::ToolCommand;
use crate::config::RemoteConfig;
use crate::error::{HardsubError, Result};
use crate::setup::{self, Dependency};

/// Marker rclone prints when the requested object does not exist
const SOURCE_NOT_FOUND: &str = "Source not found";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Check that the sync tool is installed and runnable
    async fn check_availability(&self) -> Result<()>;

    /// Copy the remote object `name` into `directory` and return the local path
    async fn fetch_by_name(&self, name: &str, directory: &Path) -> Result<PathBuf>;

    /// Copy a local file to the configured upload destination
    async fn upload(&self, path: &Path) -> Result<()>;
}

pub struct RcloneStorage {
    config: RemoteConfig,
}

impl RcloneStorage {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    pub fn version_check(&self) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Version check").arg("version")
    }

    pub fn fetch_command(&self, name: &str, directory: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Remote download")
            .on_failure(HardsubError::Remote)
            .arg("copy")
            .arg(format!("{}:{}", self.config.source_remote, name))
            .path(directory)
            .arg("--progress")
    }

    pub fn upload_command(&self, path: &Path) -> ToolCommand {
        ToolCommand::new(&self.config.binary_path, "Upload")
            .on_failure(HardsubError::Remote)
            .arg("copy")
            .path(path)
            .arg(&self.config.upload_destination)
            .arg("--progress")
    }
}

/// Map a failed copy's stderr to a not-found or generic remote error
pub fn classify_copy_failure(name: &str, stderr: &str) -> HardsubError {
    if stderr.contains(SOURCE_NOT_FOUND) {
        HardsubError::RemoteNotFound(name.to_string())
    } else {
        HardsubError::Remote(stderr.trim().to_string())
    }
}

/// Where `rclone copy remote:<name> <directory>` leaves the file
pub fn fetched_path(name: &str, directory: &Path) -> PathBuf {
    let file_name = Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(name));
    directory.join(file_name)
}

#[async_trait]
impl RemoteStorage for RcloneStorage {
    async fn check_availability(&self) -> Result<()> {
        setup::require(Dependency::rclone(), self.version_check()).await
    }

    async fn fetch_by_name(&self, name: &str, directory: &Path) -> Result<PathBuf> {
        // An empty path after the remote prefix copies the whole remote.
        if name.trim().is_empty() {
            return Err(HardsubError::Remote("no remote file name given".to_string()));
        }

        let command = self.fetch_command(name, directory);
        println!("Running: {}", command.command_line());

        let output = command.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_copy_failure(name, &stderr));
        }

        let local = fetched_path(name, directory);
        if !local.exists() {
            return Err(HardsubError::Remote(format!(
                "copy finished but '{}' was not found locally",
                local.display()
            )));
        }

        info!("Fetched {} to {}", name, local.display());
        Ok(local)
    }

    async fn upload(&self, path: &Path) -> Result<()> {
        self.upload_command(path).execute_inherited().await?;
        info!("Uploaded {} to {}", path.display(), self.config.upload_destination);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        let storage = RcloneStorage::new(RemoteConfig::default());

        assert_eq!(
            storage.fetch_command("Movies/film.mkv", Path::new("/tmp/job")).command_line(),
            "rclone copy gdrive:Movies/film.mkv /tmp/job --progress"
        );
        assert_eq!(
            storage.upload_command(Path::new("out.mp4")).command_line(),
            "rclone copy out.mp4 file:file/ --progress"
        );
        assert_eq!(storage.version_check().command_line(), "rclone version");
    }

    #[test]
    fn test_classify_copy_failure() {
        let stderr = "2024/01/01 ERROR : Attempt 1/3 failed with 1 errors and: directory not found\n\
                      Failed to copy: Source not found: gdrive:film.mkv";
        assert!(matches!(
            classify_copy_failure("film.mkv", stderr),
            HardsubError::RemoteNotFound(name) if name == "film.mkv"
        ));
        assert!(matches!(
            classify_copy_failure("film.mkv", "couldn't find section in config file\n"),
            HardsubError::Remote(msg) if msg == "couldn't find section in config file"
        ));
    }

    #[test]
    fn test_fetched_path_uses_basename() {
        assert_eq!(
            fetched_path("Movies/film.mkv", Path::new("/tmp/job")),
            PathBuf::from("/tmp/job/film.mkv")
        );
        assert_eq!(fetched_path("film.mkv", Path::new(".")), PathBuf::from("./film.mkv"));
    }

    #[tokio::test]
    async fn test_missing_rclone_is_missing_dependency() {
        let storage = RcloneStorage::new(RemoteConfig {
            binary_path: "hardsub-no-such-rclone".to_string(),
            ..RemoteConfig::default()
        });
        assert!(matches!(
            storage.check_availability().await,
            Err(HardsubError::MissingDependency { tool, .. }) if tool == "Rclone"
        ));
    }

    #[tokio::test]
    async fn test_fetch_with_missing_binary_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RcloneStorage::new(RemoteConfig {
            binary_path: "hardsub-no-such-rclone".to_string(),
            ..RemoteConfig::default()
        });
        assert!(matches!(
            storage.fetch_by_name("film.mkv", dir.path()).await,
            Err(HardsubError::ToolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_name_is_refused_before_copy() {
        let dir = tempfile::tempdir().unwrap();
        // Missing binary: reaching the copy would yield ToolNotFound instead.
        let storage = RcloneStorage::new(RemoteConfig {
            binary_path: "hardsub-no-such-rclone".to_string(),
            ..RemoteConfig::default()
        });

        assert!(matches!(
            storage.fetch_by_name("", dir.path()).await,
            Err(HardsubError::Remote(_))
        ));
        assert!(matches!(
            storage.fetch_by_name("  ", dir.path()).await,
            Err(HardsubError::Remote(_))
        ));
    }
}
