//! Writing generated regions into user-owned files.
//!
//! A target file is shared: everything between the sentinels belongs to the
//! generator, everything else to the user. [`write_region`] honours that
//! split with three outcomes:
//!
//! | File state | Action | Outcome |
//! |------------|--------|---------|
//! | missing | parent dirs created, region written as the whole file | [`MergeOutcome::Created`] |
//! | has both sentinels | span from the first start sentinel to the last end sentinel replaced | [`MergeOutcome::Updated`] |
//! | has neither sentinel | left untouched | [`MergeOutcome::SkippedNoMarkers`] |
//!
//! A file holding only one of the two sentinels is an error: replacing
//! anything there would eat user content. So is a file that exists but
//! cannot be read.
//!
//! Sentinels match case-insensitively. Rewriting a region with identical
//! content leaves the file byte-identical.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::emit::{REGION_END, REGION_START};
use crate::error::MergeError;

/// The span ends right after this text; the `///` in front of it is part of
/// the region body.
const END_MATCH: &str = "END DSM VARIABLES";

/// What [`write_region`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
    SkippedNoMarkers,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Created => write!(f, "created"),
            MergeOutcome::Updated => write!(f, "updated"),
            MergeOutcome::SkippedNoMarkers => write!(f, "skipped (no markers)"),
        }
    }
}

/// Writes `region` into the file at `path`.
///
/// Only a missing file is created. Any other read failure is an error, and
/// existing content is spliced as bytes, so text outside the sentinels
/// survives even when it is not valid UTF-8.
pub fn write_region(path: &Path, region: &str) -> Result<MergeOutcome, MergeError> {
    let io_err = |source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let existing = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::debug!("{} does not exist, creating it", path.display());
            create_file(path, region)?;
            return Ok(MergeOutcome::Created);
        }
        Err(err) => return Err(io_err(err)),
    };

    let spliced = splice_region(&existing, region).map_err(|found| MergeError::MalformedRegion {
        path: path.to_path_buf(),
        found,
    })?;
    let Some(merged) = spliced else {
        log::debug!("{} has no generated region", path.display());
        return Ok(MergeOutcome::SkippedNoMarkers);
    };

    if merged != existing {
        fs::write(path, merged).map_err(io_err)?;
    } else {
        log::debug!("{} already up to date", path.display());
    }
    Ok(MergeOutcome::Updated)
}

/// Replaces the generated span of `content` with `region`.
///
/// Returns `Ok(None)` when `content` has no sentinels at all and
/// `Err(sentinel)` when only one of them is present.
pub fn splice_region(content: &[u8], region: &str) -> Result<Option<Vec<u8>>, &'static str> {
    // ASCII lowercasing keeps byte offsets valid for `content`.
    let folded = content.to_ascii_lowercase();
    let start = find(&folded, REGION_START.to_ascii_lowercase().as_bytes());
    let end = rfind(&folded, END_MATCH.to_ascii_lowercase().as_bytes())
        .filter(|&end| start.map_or(true, |start| end > start));

    match (start, end) {
        (Some(start), Some(end)) => {
            let end = end + END_MATCH.len();
            let mut merged = Vec::with_capacity(content.len() + region.len());
            merged.extend_from_slice(&content[..start]);
            merged.extend_from_slice(region.as_bytes());
            merged.extend_from_slice(&content[end..]);
            Ok(Some(merged))
        }
        (Some(_), None) => Err(REGION_START),
        (None, Some(_)) => Err(REGION_END),
        (None, None) => Ok(None),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

fn create_file(path: &Path, content: &str) -> Result<(), MergeError> {
    let io_err = |source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
