use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

/// Eight hex characters for naming scratch files
pub fn short_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Files written during a run, removed at the end if still present.
///
/// Inputs supplied by the user are never tracked here.
#[derive(Debug, Default)]
pub struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track<P: Into<PathBuf>>(&mut self, path: P) {
        self.paths.push(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete every tracked file that exists and return the ones removed
    pub fn cleanup(&mut self) -> Vec<PathBuf> {
        let mut removed = Vec::new();

        for path in self.paths.drain(..) {
            if !path.exists() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
            }
        }

        removed
    }
}
