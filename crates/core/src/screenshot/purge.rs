//! Removal of previous screenshots before a new capture.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::{Error, Result};

/// Outcome of one purge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Whether the directory could be listed at all.
    pub listed: bool,
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Whether `path` ends in one of `extensions`, compared case-insensitively.
///
/// Extensions may be given with or without a leading dot.
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Delete every image file in `dir`.
///
/// Best effort: a listing failure or a failed deletion is logged and
/// recorded in the report, never returned.
pub async fn purge_images(dir: &Path, extensions: &[String]) -> PurgeReport {
    let mut report = PurgeReport::default();

    let images = match list_images(dir, extensions).await {
        Ok(images) => images,
        Err(e) => {
            error!(error = %e, "skipping purge of old screenshots");
            return report;
        }
    };
    report.listed = true;

    if images.is_empty() {
        debug!(dir = %dir.display(), "no existing screenshots to delete");
        return report;
    }

    for path in images {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => report.deleted.push(path),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to delete old screenshot");
                report.failed.push(path);
            }
        }
    }

    info!(
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        "finished deleting old screenshots"
    );
    report
}

async fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let list_err = |source| Error::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
        let path = entry.path();
        if has_image_extension(&path, extensions) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
