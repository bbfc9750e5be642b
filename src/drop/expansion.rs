//! Turns dropped references into candidate and accepted track files.

use tracing::{debug, warn};

use super::playlist::{PlaylistFormat, PlaylistParsers};
use super::reference::DropReference;
use super::validation::{AcceptedFile, CandidateFile, FileValidator};

/// How a reference list is resolved into tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Stop once one file has been accepted.
    pub first_only: bool,
    /// Substitute `.m3u`/`.m3u8`/`.pls` files with their entries.
    pub accept_playlists: bool,
}

impl ResolveOptions {
    /// Options used when a drop loads a single track onto a player.
    pub const PLAYER_LOAD: Self = Self {
        first_only: true,
        accept_playlists: false,
    };
}

/// Expands drop references (and playlists) and filters them through validation.
#[derive(Clone, Copy, Debug)]
pub struct TrackResolver<'a> {
    playlists: &'a PlaylistParsers,
    validator: FileValidator<'a>,
}

impl<'a> TrackResolver<'a> {
    pub fn new(playlists: &'a PlaylistParsers, validator: FileValidator<'a>) -> Self {
        Self {
            playlists,
            validator,
        }
    }

    /// Candidates in drop order, playlist entries substituted in place.
    ///
    /// Nothing is validated; this is the raw expansion.
    pub fn expand(&self, references: &[DropReference], accept_playlists: bool) -> Vec<CandidateFile> {
        references
            .iter()
            .flat_map(|reference| self.expand_reference(reference, accept_playlists))
            .collect()
    }

    /// Accepted files in drop order.
    ///
    /// Expansion is lazy per reference, so with `first_only` nothing after the
    /// first accepted file is parsed, granted or checked.
    pub fn supported_tracks(
        &self,
        references: &[DropReference],
        options: ResolveOptions,
    ) -> Vec<AcceptedFile> {
        let accepted = references
            .iter()
            .flat_map(|reference| self.expand_reference(reference, options.accept_playlists))
            .filter_map(|candidate| self.validator.accept(&candidate));
        if options.first_only {
            accepted.take(1).collect()
        } else {
            accepted.collect()
        }
    }

    fn expand_reference(
        &self,
        reference: &DropReference,
        accept_playlists: bool,
    ) -> Vec<CandidateFile> {
        let Some(path) = reference.resolve() else {
            debug!("Skipping empty drop reference");
            return Vec::new();
        };
        if accept_playlists && let Some(format) = PlaylistFormat::from_path(&path) {
            return match self.playlists.parser_for(format).parse(&path) {
                Ok(entries) => entries.into_iter().map(CandidateFile::new).collect(),
                Err(err) => {
                    warn!("Ignoring dropped playlist: {err}");
                    Vec::new()
                }
            };
        }
        vec![CandidateFile::new(path)]
    }
}
