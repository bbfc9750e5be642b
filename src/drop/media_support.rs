//! Media-support oracles deciding whether a dropped file is playable.

use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::config::MediaSettings;

/// Extensions accepted out of the box (lowercase, without dots).
pub const DEFAULT_MEDIA_EXTENSIONS: [&str; 7] = ["wav", "aif", "aiff", "flac", "mp3", "ogg", "m4a"];

/// Answers "can the player load this file?".
pub trait MediaSupport {
    fn is_supported(&self, path: &Path) -> bool;
}

/// Accepts files whose extension is on a list, ignoring ASCII case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionSupport {
    extensions: Vec<String>,
}

impl ExtensionSupport {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for ExtensionSupport {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_EXTENSIONS)
    }
}

impl MediaSupport for ExtensionSupport {
    fn is_supported(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|supported| ext.eq_ignore_ascii_case(supported))
    }
}

/// Extension check followed by a container probe of the file contents.
///
/// Catches files that carry an audio extension but hold something else.
#[derive(Clone, Debug, Default)]
pub struct ProbeSupport {
    extensions: ExtensionSupport,
}

impl ProbeSupport {
    pub fn new(extensions: ExtensionSupport) -> Self {
        Self { extensions }
    }
}

impl MediaSupport for ProbeSupport {
    fn is_supported(&self, path: &Path) -> bool {
        self.extensions.is_supported(path) && probe_has_audio_track(path)
    }
}

/// Pick the oracle described by the user's media settings.
pub fn media_support_for(settings: &MediaSettings) -> Box<dyn MediaSupport> {
    let extensions = ExtensionSupport::new(settings.extensions.iter().cloned());
    if settings.probe_content {
        Box::new(ProbeSupport::new(extensions))
    } else {
        Box::new(extensions)
    }
}

fn probe_has_audio_track(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!("Probe skipped for {}: {err}", path.display());
            return false;
        }
    };
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }
    match symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed
            .format
            .default_track()
            .is_some_and(|track| track.codec_params.codec != CODEC_TYPE_NULL),
        Err(err) => {
            debug!("Probe rejected {}: {err}", path.display());
            false
        }
    }
}
