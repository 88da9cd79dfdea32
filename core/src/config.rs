use crate::error::{CoreError, CoreResult};
use crate::loader::CatalogPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the data files live and the default merge policy.
///
/// File names are resolved against `data_dir`; absolute names are used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
    pub citations_file: PathBuf,
    pub breaches_file: PathBuf,
    pub merged_output_file: PathBuf,
    pub allow_updates: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            citations_file: PathBuf::from("citations.json"),
            breaches_file: PathBuf::from("breaches.json"),
            merged_output_file: PathBuf::from("citations.merged.json"),
            allow_updates: false,
        }
    }
}

impl CatalogConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path).map_err(|source| CoreError::LoadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| {
            CoreError::InvalidInput(format!("config {}: {}", path.display(), e))
        })
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    pub fn citations_path(&self) -> PathBuf {
        self.resolve(&self.citations_file)
    }

    pub fn breaches_path(&self) -> PathBuf {
        self.resolve(&self.breaches_file)
    }

    pub fn merged_output_path(&self) -> PathBuf {
        self.resolve(&self.merged_output_file)
    }

    pub fn catalog_paths(&self) -> CatalogPaths {
        CatalogPaths {
            citations: self.citations_path(),
            breaches: self.breaches_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casebook.json");
        std::fs::write(&path, r#"{"data_dir": "/srv/site/data", "allow_updates": true}"#).unwrap();
        let cfg = CatalogConfig::from_json_file(&path).unwrap();
        assert!(cfg.allow_updates);
        assert_eq!(cfg.citations_path(), PathBuf::from("/srv/site/data/citations.json"));
        assert_eq!(cfg.breaches_file, PathBuf::from("breaches.json"));
    }

    #[test]
    fn unknown_config_shape_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("casebook.json");
        std::fs::write(&path, r#"{"allow_updates": "yes"}"#).unwrap();
        assert!(matches!(
            CatalogConfig::from_json_file(&path),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
