use crate::common::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Conventional variable pointing at a cf-deployment checkout.
pub const HOME_ENV_VAR: &str = "CF_DEPLOYMENT_HOME";

/// Read-only fixture tree the harness interpolates against.
#[derive(Debug, Clone)]
pub struct FixtureLayout {
    pub home: PathBuf,
    pub manifest_path: PathBuf,
    pub operations_dir: PathBuf,
}

impl FixtureLayout {
    /// `home` is canonicalized so paths stay valid from the overlays
    /// directory the tool runs in.
    pub fn new<P: AsRef<Path>>(home: P, manifest_file: &str, operations_dir: &str) -> Result<Self> {
        let home = std::fs::canonicalize(home.as_ref()).map_err(|e| {
            HarnessError::Setup(format!(
                "fixture root {} is not accessible: {}",
                home.as_ref().display(),
                e
            ))
        })?;
        let manifest_path = home.join(manifest_file);
        let operations_dir = home.join(operations_dir);

        if !manifest_path.is_file() {
            return Err(HarnessError::Setup(format!(
                "base manifest not found at {}",
                manifest_path.display()
            )));
        }
        if !operations_dir.is_dir() {
            return Err(HarnessError::Setup(format!(
                "operations directory not found at {}",
                operations_dir.display()
            )));
        }

        Ok(Self {
            home,
            manifest_path,
            operations_dir,
        })
    }

    /// Resolves the fixture root from settings, then `CF_DEPLOYMENT_HOME`,
    /// then the nearest ancestor of `start` holding the base manifest.
    pub fn resolve(settings: &HarnessSettings, start: &Path) -> Result<Self> {
        let home = settings
            .cf_deployment_home
            .clone()
            .or_else(|| std::env::var_os(HOME_ENV_VAR).map(PathBuf::from))
            .or_else(|| Self::find_home_from(start, &settings.manifest_file))
            .ok_or_else(|| {
                HarnessError::Setup(format!(
                    "could not locate {}: pass --home, set {} or run from inside the checkout",
                    settings.manifest_file, HOME_ENV_VAR
                ))
            })?;

        log::debug!("Using fixture root {}", home.display());
        Self::new(home, &settings.manifest_file, &settings.operations_dir)
    }

    fn find_home_from(start: &Path, manifest_file: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(manifest_file).is_file())
            .map(Path::to_path_buf)
    }

    /// Every overlay file under the operations directory, relative to it.
    pub fn overlay_index(&self) -> BTreeSet<String> {
        WalkDir::new(&self.operations_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yml" || ext == "yaml")
                    .unwrap_or(false)
            })
            .filter_map(|e| self.relative_overlay(e.path()))
            .collect()
    }

    /// Overlays named by a scenario that are not present in the fixture tree.
    pub fn missing_overlays<'a>(&self, overlays: &[&'a str]) -> Vec<&'a str> {
        let index = self.overlay_index();
        overlays
            .iter()
            .copied()
            .filter(|overlay| !index.contains(*overlay))
            .collect()
    }

    fn relative_overlay(&self, path: &Path) -> Option<String> {
        pathdiff::diff_paths(path, &self.operations_dir).map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/")
        })
    }
}
