use crate::prelude::{PrepError, PrepResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve a descriptor's source reference to a concrete file list.
///
/// A `.fil` path names a single filterbank file. A `.fits`/`.sf` path names a
/// file group: the last five characters of the stem (a part-number suffix)
/// are dropped and every sibling matching `<prefix>*fits` is collected, in
/// name order. Any other extension is fatal for the candidate. Resolution
/// inspects names only; a missing `.fil` file surfaces later as an I/O error
/// from the loader.
pub fn resolve_source_files(path: &Path) -> PrepResult<Vec<PathBuf>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "fil" => Ok(vec![path.to_path_buf()]),
        "fits" | "sf" => resolve_fits_group(path),
        other => Err(PrepError::UnsupportedFormat(format!(
            "can only work with fits file groups or filterbanks, got .{other}",
        ))),
    }
}

fn resolve_fits_group(path: &Path) -> PrepResult<Vec<PathBuf>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PrepError::InvalidInput(format!("unreadable file name: {path:?}")))?;
    let cut = stem.char_indices().count().saturating_sub(5);
    let prefix: String = stem.chars().take(cut).collect();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut matches = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(name) => name,
            None => continue,
        };
        if name.starts_with(&prefix) && name.ends_with("fits") {
            matches.push(entry.path());
        }
    }
    matches.sort();

    if matches.is_empty() {
        return Err(PrepError::InvalidInput(format!(
            "no FITS files matching {prefix}*fits in {}",
            dir.display()
        )));
    }
    Ok(matches)
}
