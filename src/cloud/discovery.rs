//! Recursive discovery of cloud configuration files.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::entity::Cloud;
use super::loader::{has_cloud_extension, CloudLoader, YamlCloudLoader};

/// Discovers the clouds defined under a clouds directory.
#[derive(Debug, Default, Clone)]
pub struct CloudDiscovery<L = YamlCloudLoader> {
    /// Loader used for each discovered file.
    loader: L,
}

impl CloudDiscovery {
    /// Creates a discovery engine that loads YAML definitions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loader: YamlCloudLoader::new(),
        }
    }
}

impl<L: CloudLoader> CloudDiscovery<L> {
    /// Creates a discovery engine with a custom loader.
    #[must_use]
    pub const fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    /// Returns the clouds found under `clouds_dir`, keyed by name.
    ///
    /// A cloud's name is its path relative to `clouds_dir` without the
    /// extension, so `sub/b.yml` is named `sub/b`. When two files derive the
    /// same name the one visited last wins. A missing directory yields no
    /// clouds.
    #[must_use]
    pub fn discover(&self, clouds_dir: &Path) -> BTreeMap<String, Cloud> {
        let mut clouds = BTreeMap::new();

        if !clouds_dir.exists() {
            debug!("Clouds directory does not exist: {}", clouds_dir.display());
            return clouds;
        }

        let entries = WalkDir::new(clouds_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {e}", clouds_dir.display());
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !has_cloud_extension(path) {
                continue;
            }

            let Some(name) = cloud_name(clouds_dir, path) else {
                warn!("Skipping cloud file with a non UTF-8 name: {}", path.display());
                continue;
            };

            debug!("Discovered cloud '{name}' at {}", path.display());
            let cloud = Cloud::new(name.clone(), path, self.loader.load(path));
            if clouds.insert(name.clone(), cloud).is_some() {
                debug!("Cloud '{name}' redefined by {}", path.display());
            }
        }

        clouds
    }
}

/// Derives a cloud name from its path relative to the clouds directory.
fn cloud_name(clouds_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(clouds_dir).ok()?;
    let name = relative.with_extension("");
    name.to_str().map(str::to_string)
}
