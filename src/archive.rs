//! Packaging of the Chef `cookbooks/` and `roles/` trees.
//!
//! The archive is a gzip-compressed tar written to a fixed name in the
//! temporary directory. Entry names are computed by stripping the config root
//! from each path, so no absolute path ever reaches the archive and the
//! process working directory is never touched.

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::environment::{COOKBOOKS_DIRECTORY, ROLES_DIRECTORY};
use crate::error::{ArchiveError, Result};

/// Name of the Maestro Chef assets archive.
pub const CHEF_ARCHIVE_NAME: &str = "maestro_chef_assets.tar.gz";

/// Subtrees of the config root packed into the archive, in order.
const ARCHIVED_SUBTREES: &[&str] = &[COOKBOOKS_DIRECTORY, ROLES_DIRECTORY];

/// Serializes builds, which all share one output file name.
static ARCHIVE_LOCK: Mutex<()> = Mutex::new(());

/// Builds the Chef assets archive.
#[derive(Debug, Default, Clone)]
pub struct ChefArchiveBuilder {
    /// Directory the archive is written to, the system temp dir if unset.
    output_dir: Option<PathBuf>,
}

impl ChefArchiveBuilder {
    /// Creates a builder writing to the system temporary directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { output_dir: None }
    }

    /// Writes the archive into `dir` instead of the temporary directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Where the archive will be written.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .join(CHEF_ARCHIVE_NAME)
    }

    /// Packs `cookbooks/` and then `roles/` under `config_root` into a
    /// `.tar.gz` and returns its path.
    ///
    /// Any archive left by a previous build is removed first. A missing
    /// subtree contributes no entries.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] if `config_root` does not exist or an entry
    /// cannot be read or written. A partially written archive may remain.
    pub fn build(&self, config_root: &Path) -> Result<PathBuf> {
        let _guard = ARCHIVE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        if !config_root.is_dir() {
            return Err(ArchiveError::RootMissing {
                path: config_root.to_path_buf(),
            }
            .into());
        }

        let archive_path = self.archive_path();
        if archive_path.exists() {
            debug!("Removing stale archive: {}", archive_path.display());
            fs::remove_file(&archive_path).map_err(|e| ArchiveError::io(&archive_path, e))?;
        }

        info!("Packing Chef assets into {}", archive_path.display());

        let file = File::create(&archive_path).map_err(|e| ArchiveError::io(&archive_path, e))?;
        let mut tar = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        let mut entries = 0;
        for subtree in ARCHIVED_SUBTREES {
            entries += append_subtree(&mut tar, config_root, subtree)?;
        }

        let encoder = tar
            .into_inner()
            .map_err(|e| ArchiveError::io(&archive_path, e))?;
        encoder
            .finish()
            .map_err(|e| ArchiveError::io(&archive_path, e))?;

        info!("Packed {entries} entries into {}", archive_path.display());
        Ok(archive_path)
    }
}

/// Appends every file and directory below `config_root/subtree`, returning
/// how many entries were written.
fn append_subtree<W: Write>(
    tar: &mut tar::Builder<W>,
    config_root: &Path,
    subtree: &str,
) -> std::result::Result<usize, ArchiveError> {
    let dir = config_root.join(subtree);
    if !dir.exists() {
        warn!("Nothing to archive, directory missing: {}", dir.display());
        return Ok(0);
    }

    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    let mut count = 0;
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| dir.clone(), Path::to_path_buf);
            ArchiveError::io(path, io::Error::from(e))
        })?;

        let path = entry.path();
        let Ok(name) = path.strip_prefix(config_root) else {
            continue;
        };

        let appended = if path.is_dir() {
            tar.append_dir(name, path)
        } else if path.is_file() {
            tar.append_path_with_name(path, name)
        } else {
            debug!("Skipping special file: {}", path.display());
            continue;
        };
        appended.map_err(|e| ArchiveError::io(path, e))?;

        debug!("Archived {}", name.display());
        count += 1;
    }

    Ok(count)
}

/// Dot entries are left out, as a shell glob would.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Computes the hex SHA-256 digest of a built archive.
///
/// # Errors
///
/// Returns an error if the archive cannot be read.
pub fn archive_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| ArchiveError::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MaestroError;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("no parent")).expect("Failed to create parent");
        fs::write(path, content).expect("Failed to write file");
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = File::open(archive).expect("Failed to open archive");
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        tar.entries()
            .expect("Failed to read entries")
            .map(|entry| {
                let entry = entry.expect("Failed to read entry");
                let path = entry.path().expect("Bad entry path");
                path.to_string_lossy().trim_end_matches('/').to_string()
            })
            .collect()
    }

    #[test]
    fn test_archive_contains_only_relative_chef_entries() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(root.path(), "cookbooks/x.txt", "x");
        write(root.path(), "roles/y.txt", "y");
        write(root.path(), "clouds/prod.yml", "provider: aws\n");

        let archive = ChefArchiveBuilder::new()
            .with_output_dir(out.path())
            .build(root.path())
            .expect("Failed to build archive");

        assert_eq!(archive, out.path().join(CHEF_ARCHIVE_NAME));
        assert_eq!(entry_names(&archive), vec!["cookbooks/x.txt", "roles/y.txt"]);
    }

    #[test]
    fn test_directories_included_cookbooks_first() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(root.path(), "roles/web.json", "{}");
        write(root.path(), "cookbooks/nginx/recipes/default.rb", "package 'nginx'");
        write(root.path(), "cookbooks/.git/HEAD", "ref");

        let archive = ChefArchiveBuilder::new()
            .with_output_dir(out.path())
            .build(root.path())
            .expect("Failed to build archive");

        assert_eq!(
            entry_names(&archive),
            vec![
                "cookbooks/nginx",
                "cookbooks/nginx/recipes",
                "cookbooks/nginx/recipes/default.rb",
                "roles/web.json",
            ]
        );
    }

    #[test]
    fn test_rebuild_reflects_current_tree() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(root.path(), "cookbooks/x.txt", "x");
        write(root.path(), "roles/y.txt", "y");
        let builder = ChefArchiveBuilder::new().with_output_dir(out.path());

        builder.build(root.path()).expect("first build failed");
        fs::remove_file(root.path().join("roles/y.txt")).expect("Failed to remove");
        write(root.path(), "roles/z.txt", "z");
        let archive = builder.build(root.path()).expect("second build failed");

        assert_eq!(entry_names(&archive), vec!["cookbooks/x.txt", "roles/z.txt"]);
    }

    #[test]
    fn test_stale_file_replaced() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(root.path(), "cookbooks/x.txt", "x");
        fs::write(out.path().join(CHEF_ARCHIVE_NAME), "not an archive").expect("Failed to write");

        let archive = ChefArchiveBuilder::new()
            .with_output_dir(out.path())
            .build(root.path())
            .expect("Failed to build archive");

        assert_eq!(entry_names(&archive), vec!["cookbooks/x.txt"]);
    }

    #[test]
    fn test_missing_subtrees_yield_empty_archive() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");

        let archive = ChefArchiveBuilder::new()
            .with_output_dir(out.path())
            .build(root.path())
            .expect("Failed to build archive");

        assert!(entry_names(&archive).is_empty());
    }

    #[test]
    fn test_missing_root_rejected() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let result = ChefArchiveBuilder::new()
            .with_output_dir(temp.path())
            .build(&temp.path().join("missing"));

        assert!(matches!(
            result,
            Err(MaestroError::Archive(ArchiveError::RootMissing { .. }))
        ));
    }

    #[test]
    fn test_concurrent_builds_serialized() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let out = TempDir::new().expect("Failed to create temp dir");
        write(root.path(), "cookbooks/x.txt", "x");
        write(root.path(), "roles/y.txt", "y");
        let builder = ChefArchiveBuilder::new().with_output_dir(out.path());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| builder.build(root.path()).expect("build failed"));
            }
        });

        let archive = builder.archive_path();
        assert_eq!(entry_names(&archive), vec!["cookbooks/x.txt", "roles/y.txt"]);
    }

    #[test]
    fn test_default_path_in_temp_dir() {
        assert_eq!(
            ChefArchiveBuilder::new().archive_path(),
            std::env::temp_dir().join(CHEF_ARCHIVE_NAME)
        );
    }

    #[test]
    fn test_archive_digest() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("data");
        fs::write(&path, "abc").expect("Failed to write");

        assert_eq!(
            archive_digest(&path).expect("Failed to hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
