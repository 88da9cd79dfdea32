use crate::catalog::model::CitationRecord;
use crate::error::CoreResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// What was written, so the maintainer can confirm it before committing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub path: PathBuf,
    pub record_count: usize,
    pub bytes: u64,
    pub sha256: String,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Pretty-printed JSON array with a trailing newline.
pub fn to_pretty_json(records: &[CitationRecord]) -> CoreResult<String> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

pub fn write_merged_file(path: impl AsRef<Path>, records: &[CitationRecord]) -> CoreResult<MergeReport> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = to_pretty_json(records)?;
    fs::write(path, body.as_bytes())?;

    let report = MergeReport {
        path: path.to_path_buf(),
        record_count: records.len(),
        bytes: body.len() as u64,
        sha256: sha256_hex(body.as_bytes()),
    };
    tracing::info!(
        path = %report.path.display(),
        records = report.record_count,
        sha256 = %report.sha256,
        "wrote merged citations"
    );
    Ok(report)
}
