//! Saving downloaded skill archives.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use skillsmith_contracts::SkillId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::normalize::normalize_skill_name;

/// `{name}.zip`, or `skill-{id}.zip` when no usable name is known.
pub fn archive_file_name(id: SkillId, name: Option<&str>) -> String {
    let stem = name.map(normalize_skill_name).unwrap_or_default();
    if stem.is_empty() {
        format!("skill-{id}.zip")
    } else {
        format!("{stem}.zip")
    }
}

/// Write `bytes` to `dir/file_name`, creating `dir` if needed.
///
/// The archive is staged in a temporary file inside `dir` and renamed into place, so a
/// failed write never leaves a truncated archive behind.
pub fn save_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name);

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(&target).map_err(|e| e.error)?;

    debug!(path = %target.display(), size = bytes.len(), "Saved skill archive");
    Ok(target)
}
