use tracing::{info, warn};

use crate::command::ToolCommand;
use crate::error::{HardsubError, Result};
use crate::media::MediaProcessorTrait;
use crate::remote::RemoteStorage;

/// An external tool the workflow cannot run without
#[derive(Debug, Clone)]
pub struct Dependency {
    pub name: String,
    pub install_hint: String,
}

impl Dependency {
    pub fn ffmpeg() -> Self {
        Self {
            name: "FFmpeg".to_string(),
            install_hint: "https://ffmpeg.org/download.html".to_string(),
        }
    }

    pub fn rclone() -> Self {
        Self {
            name: "Rclone".to_string(),
            install_hint: "https://rclone.org/downloads/".to_string(),
        }
    }

    fn missing(&self) -> HardsubError {
        HardsubError::MissingDependency {
            tool: self.name.clone(),
            hint: self.install_hint.clone(),
        }
    }
}

/// Run a version invocation; anything but a zero exit means the tool is missing
pub async fn require(dependency: Dependency, probe: ToolCommand) -> Result<()> {
    match probe.execute_quiet().await {
        Ok(()) => {
            info!("{} is available", dependency.name);
            Ok(())
        }
        Err(e) => {
            warn!("{} probe failed: {}", dependency.name, e);
            Err(dependency.missing())
        }
    }
}

/// Verify the transcoder and the sync tool, in that order, before any work
pub async fn check_dependencies(
    media: &dyn MediaProcessorTrait,
    remote: &dyn RemoteStorage,
) -> Result<()> {
    media.check_availability().await?;
    remote.check_availability().await?;

    println!("All dependencies (FFmpeg, Rclone) found.");
    Ok(())
}
