use crate::catalog::model::{BreachTag, CitationRecord};
use crate::error::{CoreError, CoreResult};
use crate::reconcile::import::parse_json_records;
use std::fs;
use std::path::{Path, PathBuf};

fn read_data_file(path: &Path) -> CoreResult<String> {
    fs::read_to_string(path).map_err(|source| CoreError::LoadFailure {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_citations(path: impl AsRef<Path>) -> CoreResult<Vec<CitationRecord>> {
    let path = path.as_ref();
    let body = read_data_file(path)?;
    let records = parse_json_records(&body).map_err(|e| match e {
        CoreError::ParseFailure(msg) => {
            CoreError::ParseFailure(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "loaded citations");
    Ok(records)
}

pub fn load_breaches(path: impl AsRef<Path>) -> CoreResult<Vec<BreachTag>> {
    let path = path.as_ref();
    let body = read_data_file(path)?;
    let tags: Vec<BreachTag> = serde_json::from_str(&body)
        .map_err(|e| CoreError::ParseFailure(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), tags = tags.len(), "loaded breach tags");
    Ok(tags)
}

/// Outcome of loading both data files. Each side fails independently.
#[derive(Debug)]
pub struct CatalogLoad {
    pub citations: CoreResult<Vec<CitationRecord>>,
    pub breaches: CoreResult<Vec<BreachTag>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPaths {
    pub citations: PathBuf,
    pub breaches: PathBuf,
}

/// Reads both files in parallel and waits for both.
pub fn load_catalog(paths: &CatalogPaths) -> CatalogLoad {
    std::thread::scope(|s| {
        let breaches = s.spawn(|| load_breaches(&paths.breaches));
        let citations = load_citations(&paths.citations);
        let breaches = match breaches.join() {
            Ok(result) => result,
            Err(_) => Err(CoreError::InvalidInput(
                "breach loader thread panicked".to_string(),
            )),
        };
        CatalogLoad {
            citations,
            breaches,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_citations(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CoreError::LoadFailure { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_breaches_are_a_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breaches.json");
        std::fs::write(&path, r#"[{"aliases": []}]"#).unwrap();
        assert!(matches!(
            load_breaches(&path),
            Err(CoreError::ParseFailure(_))
        ));
    }

    #[test]
    fn both_files_load_independently() {
        let dir = tempfile::tempdir().unwrap();
        let citations = dir.path().join("citations.json");
        std::fs::write(&citations, r#"[{"id":"1"}]"#).unwrap();
        let load = load_catalog(&CatalogPaths {
            citations,
            breaches: dir.path().join("missing.json"),
        });
        assert_eq!(load.citations.unwrap().len(), 1);
        assert!(load.breaches.is_err());
    }
}
