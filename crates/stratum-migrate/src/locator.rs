//! Migration file discovery

use crate::error::MigrateResult;
use std::path::{Path, PathBuf};

/// A candidate migration file and the location/suffix that matched it.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    pub filepath: PathBuf,
    pub location: String,
    pub suffix: String,
}

/// Enumerates candidate migration files under the configured root
/// locations. Overridable for testing.
pub trait FileLister: Send + Sync {
    /// List files under `locations` whose names end in one of
    /// `suffixes`. Missing locations contribute zero files.
    fn list(&self, locations: &[String], suffixes: &[String]) -> MigrateResult<Vec<MigrationFile>>;
}

/// Default lister: a recursive filesystem scan.
#[derive(Debug, Default)]
pub struct FsFileLister;

impl FileLister for FsFileLister {
    fn list(&self, locations: &[String], suffixes: &[String]) -> MigrateResult<Vec<MigrationFile>> {
        let mut files = Vec::new();
        for location in locations {
            for suffix in suffixes {
                let root = Path::new(location);
                if !root.exists() {
                    continue;
                }
                collect_recursive(root, location, suffix, &mut files)?;
            }
        }
        Ok(files)
    }
}

/// Recursively collect files ending in `suffix` under `dir`.
fn collect_recursive(
    dir: &Path,
    location: &str,
    suffix: &str,
    files: &mut Vec<MigrationFile>,
) -> MigrateResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_recursive(&path, location, suffix, files)?;
        } else if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(suffix))
        {
            files.push(MigrationFile {
                filepath: path,
                location: location.to_string(),
                suffix: suffix.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod tests;
