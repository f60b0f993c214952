//! Filename derivation and collision handling.
//!
//! Collision resolution assumes a single writer to the target directory;
//! a concurrent writer creating the candidate name between the existence
//! check and the actual file creation is not defended against here.

use std::path::Path;

use url::Url;

/// Name used when a URL carries no usable path segment.
pub const FALLBACK_FILENAME: &str = "video.mp4";

/// Derives a filename from the last path segment of `url`.
///
/// Returns [`FALLBACK_FILENAME`] when the URL does not parse or its path has
/// no final segment (`http://host/`, `http://host`). Pure, no I/O.
pub fn filename_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_FILENAME.to_string();
    };
    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

/// Returns `filename` if it is free in `dir`, otherwise the first
/// `stem_1.ext`, `stem_2.ext`, … candidate that is.
///
/// Deterministic for an unmodified directory; terminates after at most
/// one probe per existing entry.
pub fn unique_filename(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }

    let (stem, ext) = split_extension(filename);
    let mut counter = 1u32;
    loop {
        let candidate = if ext.is_empty() {
            format!("{stem}_{counter}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits `name.ext` into `("name", "ext")`; dotfiles and extension-less
/// names keep the whole string as the stem.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (filename, ""),
    }
}
