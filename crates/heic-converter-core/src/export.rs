//! The host "save/download" capability.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Makes a finished buffer available to the user under a suggested name.
///
/// Export is fire-and-forget: failures are the host's to report and never
/// flow back into the batch.
pub trait HostExporter {
    fn export(&mut self, bytes: &[u8], suggested_name: &str);
}

impl<F> HostExporter for F
where
    F: FnMut(&[u8], &str),
{
    fn export(&mut self, bytes: &[u8], suggested_name: &str) {
        self(bytes, suggested_name)
    }
}

/// Writes each export into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl HostExporter for DirectoryExporter {
    fn export(&mut self, bytes: &[u8], suggested_name: &str) {
        // Only the final component is honoured so names cannot escape `dir`.
        let Some(file_name) = Path::new(suggested_name).file_name() else {
            warn!("Refusing to export to unusable name {:?}", suggested_name);
            return;
        };
        let path = self.dir.join(file_name);

        match fs::write(&path, bytes) {
            Ok(()) => debug!("Exported {} bytes to {}", bytes.len(), path.display()),
            Err(e) => warn!("Failed to export {}: {}", path.display(), e),
        }
    }
}
