//! Migration file content loading

use crate::error::{MigrateError, MigrateResult};
use std::path::Path;

/// Loads migration file content. Overridable for testing or alternate
/// storage.
pub trait ContentLoader: Send + Sync {
    /// Read the file at `path` as text.
    fn load(&self, path: &Path) -> MigrateResult<String>;
}

/// Default loader: reads from disk.
#[derive(Debug, Default)]
pub struct FsContentLoader;

impl ContentLoader for FsContentLoader {
    fn load(&self, path: &Path) -> MigrateResult<String> {
        std::fs::read_to_string(path).map_err(|e| MigrateError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })
    }
}
