//! Playlist files that may appear in a drop: `.m3u`, `.m3u8` and `.pls`.
//!
//! Parsers only list the entries a playlist references. Whether those entries
//! exist or are playable is decided later by validation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use url::Url;

use super::reference::DropReference;

/// Playlist flavours recognised by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaylistFormat {
    M3u,
    Pls,
}

impl PlaylistFormat {
    /// Classify a path by its extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("m3u") || ext.eq_ignore_ascii_case("m3u8") {
            Some(Self::M3u)
        } else if ext.eq_ignore_ascii_case("pls") {
            Some(Self::Pls)
        } else {
            None
        }
    }
}

/// Errors raised while reading a playlist file.
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Failed to read playlist {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Lists the entries of one playlist format, in playlist order.
pub trait PlaylistParser {
    fn parse(&self, path: &Path) -> Result<Vec<PathBuf>, PlaylistError>;
}

/// Extended M3U / plain M3U: one entry per line, `#` lines are directives.
#[derive(Clone, Copy, Debug, Default)]
pub struct M3uParser;

impl PlaylistParser for M3uParser {
    fn parse(&self, path: &Path) -> Result<Vec<PathBuf>, PlaylistError> {
        let text = read_text(path)?;
        let base = playlist_dir(path);
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|entry| resolve_entry(base, entry))
            .collect())
    }
}

/// INI-style PLS: `FileN=<location>` keys inside `[playlist]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlsParser;

impl PlaylistParser for PlsParser {
    fn parse(&self, path: &Path) -> Result<Vec<PathBuf>, PlaylistError> {
        let text = read_text(path)?;
        let base = playlist_dir(path);
        Ok(text
            .lines()
            .filter_map(|line| line.trim().split_once('='))
            .filter(|(key, _)| is_pls_file_key(key.trim()))
            .filter_map(|(_, value)| resolve_entry(base, value.trim()))
            .collect())
    }
}

/// Parser lookup by format. Defaults to the built-in parsers.
pub struct PlaylistParsers {
    m3u: Box<dyn PlaylistParser>,
    pls: Box<dyn PlaylistParser>,
}

impl PlaylistParsers {
    pub fn new(m3u: Box<dyn PlaylistParser>, pls: Box<dyn PlaylistParser>) -> Self {
        Self { m3u, pls }
    }

    pub fn parser_for(&self, format: PlaylistFormat) -> &dyn PlaylistParser {
        match format {
            PlaylistFormat::M3u => self.m3u.as_ref(),
            PlaylistFormat::Pls => self.pls.as_ref(),
        }
    }
}

impl Default for PlaylistParsers {
    fn default() -> Self {
        Self::new(Box::new(M3uParser), Box::new(PlsParser))
    }
}

impl std::fmt::Debug for PlaylistParsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistParsers").finish_non_exhaustive()
    }
}

fn read_text(path: &Path) -> Result<String, PlaylistError> {
    let bytes = std::fs::read(path).map_err(|source| PlaylistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) if is_legacy_m3u(path) => {
            debug!("Reading {} as Latin-1", path.display());
            err.into_bytes().into_iter().map(char::from).collect()
        }
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };
    Ok(text.trim_start_matches('\u{feff}').to_owned())
}

/// Plain `.m3u` predates the UTF-8 `.m3u8` variant and is often Latin-1.
fn is_legacy_m3u(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("m3u"))
}

fn playlist_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

fn is_pls_file_key(key: &str) -> bool {
    let (Some(prefix), Some(index)) = (key.get(..4), key.get(4..)) else {
        return false;
    };
    prefix.eq_ignore_ascii_case("file")
        && !index.is_empty()
        && index.bytes().all(|b| b.is_ascii_digit())
}

/// Turn one playlist entry into a path.
///
/// `file://` entries are decoded, other URLs (streams, shares) are kept as-is
/// and relative paths are anchored at the playlist's folder.
fn resolve_entry(base: &Path, entry: &str) -> Option<PathBuf> {
    if entry.is_empty() {
        return None;
    }
    let reference = DropReference::new(entry);
    if let Some(path) = reference.local_file() {
        return Some(path);
    }
    if has_url_scheme(entry) {
        return Some(PathBuf::from(entry));
    }
    let path = PathBuf::from(entry);
    if path.is_absolute() {
        Some(path)
    } else {
        Some(base.join(path))
    }
}

/// Single-letter schemes are Windows drive letters, not URLs.
fn has_url_scheme(entry: &str) -> bool {
    Url::parse(entry).is_ok_and(|url| url.scheme().len() > 1)
}
