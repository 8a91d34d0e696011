//! Icon archive extraction.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Not a readable zip archive: {0}")]
    Open(#[source] ZipError),

    #[error("Cannot read archive entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: ZipError,
    },

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes every `.svg` entry of a zip archive into `dest`.
///
/// Entries land directly in `dest` whatever their folder inside the archive;
/// a later entry with the same file name replaces an earlier one. Other
/// files, and entries whose path would leave the archive root, are skipped.
/// Returns the number of icons written.
pub fn extract_svgs(bytes: &[u8], dest: &Path) -> Result<usize, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::Open)?;
    fs::create_dir_all(dest).map_err(|source| ArchiveError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ArchiveError::Entry { index, source })?;
        if entry.is_dir() {
            continue;
        }

        let file_name = entry
            .enclosed_name()
            .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()));
        let Some(file_name) = file_name else {
            log::warn!("skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        if !is_svg(&file_name) {
            log::debug!("skipping non-svg entry {}", entry.name());
            continue;
        }

        let target = dest.join(&file_name);
        let io_err = |source| ArchiveError::Io {
            path: target.clone(),
            source,
        };
        let mut out = File::create(&target).map_err(io_err)?;
        io::copy(&mut entry, &mut out).map_err(io_err)?;
        written += 1;
    }

    log::info!("extracted {} icons into {}", written, dest.display());
    Ok(written)
}

fn is_svg(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
