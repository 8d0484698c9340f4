//! JSON export of analysis results.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::FishboneError;
use crate::models::AnalysisResult;

/// File name for a result: `fishbone_analysis_<YYYYMMDD_HHMMSS>.json`,
/// derived from the result's generation time.
pub fn file_name(result: &AnalysisResult) -> String {
    format!(
        "fishbone_analysis_{}.json",
        result.generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Upper bound on same-second suffixes tried before giving up.
const MAX_SUFFIX: u32 = 100;

fn numbered_file_name(result: &AnalysisResult, n: u32) -> String {
    let name = file_name(result);
    match n {
        1 => name,
        n => format!("{}_{}.json", name.trim_end_matches(".json"), n),
    }
}

/// Write `result` as pretty-printed JSON into `dir`.
///
/// The file is written to a temporary sibling and linked into place without
/// replacing anything. If a run from the same second already saved there,
/// the name gets a `_2`, `_3`, ... suffix.
pub fn export(result: &AnalysisResult, dir: &Path) -> Result<PathBuf, FishboneError> {
    result.validate()?;

    let first = dir.join(file_name(result));
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| FishboneError::MalformedResult(e.to_string()))?;

    std::fs::create_dir_all(dir).map_err(|e| FishboneError::write_failure(&first, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FishboneError::write_failure(&first, e))?;
    write_synced(&mut tmp, json.as_bytes()).map_err(|e| FishboneError::write_failure(&first, e))?;

    let mut n = 1;
    loop {
        let path = dir.join(numbered_file_name(result, n));
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                info!(path = %path.display(), "analysis saved");
                return Ok(path);
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists && n < MAX_SUFFIX => {
                tmp = e.file;
                n += 1;
            }
            Err(e) => return Err(FishboneError::write_failure(&path, e.error)),
        }
    }
}

fn write_synced(tmp: &mut NamedTempFile, bytes: &[u8]) -> std::io::Result<()> {
    tmp.write_all(bytes)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()
}

/// Read a previously exported result back from disk.
pub fn load(path: &Path) -> Result<AnalysisResult, FishboneError> {
    let content = std::fs::read_to_string(path).map_err(|e| FishboneError::ReadFailure {
        path: path.to_path_buf(),
        source: e,
    })?;
    let result: AnalysisResult = serde_json::from_str(&content)
        .map_err(|e| FishboneError::MalformedResult(format!("{}: {}", path.display(), e)))?;
    result.validate()?;
    Ok(result)
}
