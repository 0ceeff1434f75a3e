//! Locating and downloading structures from the RCSB PDB.

use crate::error::{Result, SimbaError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base URL for PDB-format downloads
pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";

/// A structure file on disk and whether this run downloaded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedStructure {
    /// Location of the structure file
    pub path: PathBuf,
    /// The file was downloaded in this run and may be removed afterwards
    pub downloaded: bool,
}

/// Path where a downloaded PDB entry is stored, and whether it exists.
///
/// Files are named `pdb<id>.ent` with a lowercase ID, as on the PDB FTP mirror.
pub fn exists_pdb(name: &str, pdb_dir: &Path) -> (PathBuf, bool) {
    let pdb_path = pdb_dir.join(format!("pdb{}.ent", name.to_lowercase()));
    let exists = pdb_path.exists();
    (pdb_path, exists)
}

fn unavailable(name: &str, reason: impl Into<String>) -> SimbaError {
    SimbaError::ResourceUnavailable {
        name: name.to_uppercase(),
        reason: reason.into(),
    }
}

/// Download a PDB entry into `pdb_dir`.
pub fn download_pdb(name: &str, pdb_dir: &Path) -> Result<PathBuf> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(unavailable(name, "not a valid PDB identifier"));
    }

    let url = format!("{RCSB_DOWNLOAD_URL}/{}.pdb", name.to_uppercase());
    info!("Downloading {url}");
    let response = reqwest::blocking::get(&url)
        .map_err(|e| unavailable(name, format!("download failed: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(name, format!("download returned HTTP {status}")));
    }
    let content = response.text()?;

    std::fs::create_dir_all(pdb_dir)?;
    let (pdb_path, _) = exists_pdb(name, pdb_dir);
    std::fs::write(&pdb_path, content)?;

    match exists_pdb(name, pdb_dir) {
        (path, true) => Ok(path),
        (_, false) => Err(unavailable(name, "not downloaded")),
    }
}

/// Use the local copy of a PDB entry if present, otherwise download it.
pub fn retrieve_pdb(name: &str, pdb_dir: &Path) -> Result<RetrievedStructure> {
    let (path, exists) = exists_pdb(name, pdb_dir);
    if exists {
        debug!("Using existing file {}", path.display());
        return Ok(RetrievedStructure {
            path,
            downloaded: false,
        });
    }

    Ok(RetrievedStructure {
        path: download_pdb(name, pdb_dir)?,
        downloaded: true,
    })
}
