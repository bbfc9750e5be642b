use std::path::PathBuf;

use url::Url;

/// Single entry of a drag payload as delivered by the windowing system.
///
/// Either a URL (`file:///music/a.mp3`, `smb://host/a.mp3`), a plain path or
/// arbitrary text. Nothing is checked until the reference is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DropReference(String);

impl DropReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Reference a local path directly, as egui hands over dropped files.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into().to_string_lossy().into_owned())
    }

    /// Reference a URL, keeping its serialized form.
    pub fn from_url(url: &Url) -> Self {
        Self(url.as_str().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the reference as a `file://` URL.
    ///
    /// Returns `None` for anything that is not a file URL, including plain paths.
    pub fn local_file(&self) -> Option<PathBuf> {
        let url = Url::parse(self.0.trim()).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        if let Ok(path) = url.to_file_path() {
            return Some(path);
        }
        network_share_path(&url)
    }

    /// Resolve to a filesystem path, preferring the local-file reading.
    ///
    /// Falls back to the raw text so shares and plain paths still resolve.
    /// Empty references resolve to `None`.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(path) = self.local_file().filter(|path| !path.as_os_str().is_empty()) {
            return Some(path);
        }
        let raw = self.0.trim();
        if raw.is_empty() {
            None
        } else {
            Some(PathBuf::from(raw))
        }
    }
}

impl From<&str> for DropReference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DropReference {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<Url> for DropReference {
    fn from(url: Url) -> Self {
        Self::from_url(&url)
    }
}

impl std::fmt::Display for DropReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `file://server/share/a.mp3` maps to the UNC-style `//server/share/a.mp3`.
fn network_share_path(url: &Url) -> Option<PathBuf> {
    let host = url.host_str().filter(|host| !host.is_empty())?;
    let local = Url::parse(&format!("file://{}", url.path())).ok()?;
    let path = local.to_file_path().ok()?;
    Some(PathBuf::from(format!("//{host}{}", path.to_string_lossy())))
}
