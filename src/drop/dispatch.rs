//! Deciding what a drop onto a player slot does, and doing it.

use std::path::Path;

use tracing::{debug, info};

use crate::config::ControlSettings;

use super::eligibility::{TargetState, allow_load};
use super::expansion::{ResolveOptions, TrackResolver};
use super::players::PlayerRegistry;
use super::reference::DropReference;
use super::validation::AcceptedFile;

/// Keyboard state captured when the drop happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropModifiers {
    pub shift: bool,
}

/// Everything a drop delivers: references, an optional text tag, modifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropPayload {
    pub urls: Vec<DropReference>,
    pub text: Option<String>,
    pub modifiers: DropModifiers,
}

impl DropPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_urls<I, R>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<DropReference>,
    {
        self.urls.extend(urls.into_iter().map(Into::into));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.modifiers.shift = shift;
        self
    }

    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Why a drop was left unhandled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Target is playing and loads onto playing decks are disabled.
    TargetBusy,
    NoUrls,
    /// The payload's text tag names the target itself.
    SameOrigin,
    NoSupportedFile,
}

/// Pure result of evaluating a drop; nothing has happened yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropDecision {
    Clone { source: String },
    Load { file: AcceptedFile },
    Reject(RejectReason),
}

/// Terminal state of a dispatched drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    CloneAccepted,
    LoadAccepted,
    Rejected(RejectReason),
}

impl DropOutcome {
    /// Whether the drop event should be marked as handled.
    pub fn is_accepted(self) -> bool {
        !matches!(self, DropOutcome::Rejected(_))
    }
}

/// Side effects a drop can trigger on the application.
pub trait DropActions {
    fn clone_deck(&mut self, source: &str, target: &str);
    fn file_dropped(&mut self, path: &Path, target: &str);
}

/// Evaluates drops against the player registry and user controls.
#[derive(Clone, Copy)]
pub struct DropResolver<'a> {
    tracks: TrackResolver<'a>,
    players: &'a dyn PlayerRegistry,
    controls: &'a ControlSettings,
}

impl<'a> DropResolver<'a> {
    pub fn new(
        tracks: TrackResolver<'a>,
        players: &'a dyn PlayerRegistry,
        controls: &'a ControlSettings,
    ) -> Self {
        Self {
            tracks,
            players,
            controls,
        }
    }

    pub fn tracks(&self) -> &TrackResolver<'a> {
        &self.tracks
    }

    /// Load eligibility of `target`, with play state read now.
    pub fn allow_load(&self, target: &str) -> bool {
        allow_load(&TargetState::snapshot(self.players, target), self.controls)
    }

    /// True when the drop should clone the deck named by the payload's text tag.
    pub fn allow_clone_attempt(&self, payload: &DropPayload, target: &str) -> bool {
        if !self.players.is_deck(target) || payload.modifiers.shift {
            return false;
        }
        payload
            .text()
            .is_some_and(|source| source != target && self.players.is_deck(source))
    }

    /// Accepted files carried by `payload`, unless it has no references or
    /// was tagged by `source_identifier` itself.
    pub fn drop_event_files(
        &self,
        payload: &DropPayload,
        source_identifier: &str,
        options: ResolveOptions,
    ) -> Vec<AcceptedFile> {
        self.guarded_files(payload, source_identifier, options)
            .unwrap_or_default()
    }

    /// Hover acceptance: the target takes loads and the drop would load a file.
    pub fn accepts_drag_enter(&self, payload: &DropPayload, target: &str) -> bool {
        self.allow_load(target)
            && !self
                .drop_event_files(payload, target, ResolveOptions::PLAYER_LOAD)
                .is_empty()
    }

    /// Evaluate a drop onto `target` without side effects.
    pub fn decide(&self, payload: &DropPayload, target: &str) -> DropDecision {
        debug!(
            "Evaluating drop onto {target}: {} reference(s), text {:?}, shift {}",
            payload.urls.len(),
            payload.text(),
            payload.modifiers.shift
        );
        if !self.allow_load(target) {
            return DropDecision::Reject(RejectReason::TargetBusy);
        }
        if self.allow_clone_attempt(payload, target)
            && let Some(source) = payload.text()
        {
            return DropDecision::Clone {
                source: source.to_string(),
            };
        }
        match self.guarded_files(payload, target, ResolveOptions::PLAYER_LOAD) {
            Ok(files) => match files.into_iter().next() {
                Some(file) => DropDecision::Load { file },
                None => DropDecision::Reject(RejectReason::NoSupportedFile),
            },
            Err(reason) => DropDecision::Reject(reason),
        }
    }

    /// Decide and dispatch in one step.
    pub fn handle_drop(
        &self,
        payload: &DropPayload,
        target: &str,
        actions: &mut dyn DropActions,
    ) -> DropOutcome {
        dispatch(self.decide(payload, target), target, actions)
    }

    fn guarded_files(
        &self,
        payload: &DropPayload,
        source_identifier: &str,
        options: ResolveOptions,
    ) -> Result<Vec<AcceptedFile>, RejectReason> {
        if !payload.has_urls() {
            return Err(RejectReason::NoUrls);
        }
        if payload.text() == Some(source_identifier) {
            return Err(RejectReason::SameOrigin);
        }
        Ok(self.tracks.supported_tracks(&payload.urls, options))
    }
}

impl std::fmt::Debug for DropResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropResolver")
            .field("tracks", &self.tracks)
            .field("controls", self.controls)
            .finish_non_exhaustive()
    }
}

/// Perform the single side effect of `decision`.
pub fn dispatch(
    decision: DropDecision,
    target: &str,
    actions: &mut dyn DropActions,
) -> DropOutcome {
    match decision {
        DropDecision::Clone { source } => {
            info!("Cloning {source} onto {target}");
            actions.clone_deck(&source, target);
            DropOutcome::CloneAccepted
        }
        DropDecision::Load { file } => {
            info!("Loading {} onto {target}", file.absolute_path().display());
            actions.file_dropped(file.absolute_path(), target);
            DropOutcome::LoadAccepted
        }
        DropDecision::Reject(reason) => {
            debug!("Drop onto {target} rejected: {reason:?}");
            DropOutcome::Rejected(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop::media_support::ExtensionSupport;
    use crate::drop::permissions::{PermissionError, PermissionStore};
    use crate::drop::players::{DeckTable, SlotKind};
    use crate::drop::playlist::PlaylistParsers;
    use crate::drop::validation::FileValidator;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    struct AllowAll;

    impl PermissionStore for AllowAll {
        fn grant(&self, _path: &Path) -> Result<(), PermissionError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        clones: Vec<(String, String)>,
        loads: Vec<(PathBuf, String)>,
    }

    impl DropActions for Recorder {
        fn clone_deck(&mut self, source: &str, target: &str) {
            self.clones.push((source.to_string(), target.to_string()));
        }

        fn file_dropped(&mut self, path: &Path, target: &str) {
            self.loads.push((path.to_path_buf(), target.to_string()));
        }
    }

    struct Fixture {
        dir: TempDir,
        parsers: PlaylistParsers,
        media: ExtensionSupport,
        store: AllowAll,
        players: DeckTable,
        controls: ControlSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            for name in ["track1.mp3", "track2.mp3"] {
                std::fs::write(dir.path().join(name), b"id3").unwrap();
            }
            let mut players = DeckTable::new();
            players.insert("Deck1", SlotKind::Deck);
            players.insert("Deck2", SlotKind::Deck);
            players.insert("Preview", SlotKind::PreviewDeck);
            players.insert("Sampler", SlotKind::Sampler);
            Self {
                dir,
                parsers: PlaylistParsers::default(),
                media: ExtensionSupport::default(),
                store: AllowAll,
                players,
                controls: ControlSettings::default(),
            }
        }

        fn resolver(&self) -> DropResolver<'_> {
            let tracks = TrackResolver::new(
                &self.parsers,
                FileValidator::new(&self.media, &self.store),
            );
            DropResolver::new(tracks, &self.players, &self.controls)
        }

        fn track(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn tracks_payload(&self) -> DropPayload {
            DropPayload::new().with_urls([
                DropReference::from_path(self.track("track1.mp3")),
                DropReference::from_path(self.track("track2.mp3")),
            ])
        }
    }

    #[test]
    fn two_tracks_onto_idle_deck_load_the_first_once() {
        let fixture = Fixture::new();
        let mut recorder = Recorder::default();

        let outcome =
            fixture
                .resolver()
                .handle_drop(&fixture.tracks_payload(), "Deck1", &mut recorder);

        assert_eq!(outcome, DropOutcome::LoadAccepted);
        assert!(outcome.is_accepted());
        assert!(recorder.clones.is_empty());
        assert_eq!(
            recorder.loads,
            vec![(
                std::path::absolute(fixture.track("track1.mp3")).unwrap(),
                "Deck1".to_string()
            )]
        );
    }

    #[test]
    fn deck_tag_clones_onto_another_deck() {
        let fixture = Fixture::new();
        let mut recorder = Recorder::default();
        let payload = DropPayload::new().with_text("Deck2");

        let outcome = fixture
            .resolver()
            .handle_drop(&payload, "Deck1", &mut recorder);

        assert_eq!(outcome, DropOutcome::CloneAccepted);
        assert_eq!(
            recorder.clones,
            vec![("Deck2".to_string(), "Deck1".to_string())]
        );
        assert!(recorder.loads.is_empty());
    }

    #[test]
    fn shift_without_urls_is_rejected() {
        let fixture = Fixture::new();
        let mut recorder = Recorder::default();
        let payload = DropPayload::new().with_text("Deck2").with_shift(true);

        let outcome = fixture
            .resolver()
            .handle_drop(&payload, "Deck1", &mut recorder);

        assert_eq!(outcome, DropOutcome::Rejected(RejectReason::NoUrls));
        assert!(!outcome.is_accepted());
        assert!(recorder.clones.is_empty());
        assert!(recorder.loads.is_empty());
    }

    #[test]
    fn shift_with_urls_loads_instead_of_cloning() {
        let fixture = Fixture::new();
        let payload = fixture.tracks_payload().with_text("Deck2").with_shift(true);

        let decision = fixture.resolver().decide(&payload, "Deck1");

        assert!(matches!(decision, DropDecision::Load { .. }));
    }

    #[test]
    fn playing_deck_rejects_any_payload_without_override() {
        let mut fixture = Fixture::new();
        fixture.players.set_playing("Deck1", true);
        let resolver = fixture.resolver();

        for payload in [
            fixture.tracks_payload(),
            DropPayload::new().with_text("Deck2"),
        ] {
            assert_eq!(
                resolver.decide(&payload, "Deck1"),
                DropDecision::Reject(RejectReason::TargetBusy)
            );
        }
    }

    #[test]
    fn override_allows_loading_onto_playing_deck() {
        let mut fixture = Fixture::new();
        fixture.players.set_playing("Deck1", true);
        fixture.controls.allow_track_load_to_playing_deck = true;

        let decision = fixture
            .resolver()
            .decide(&fixture.tracks_payload(), "Deck1");

        assert!(matches!(decision, DropDecision::Load { .. }));
    }

    #[test]
    fn playing_preview_deck_still_loads() {
        let mut fixture = Fixture::new();
        fixture.players.set_playing("Preview", true);

        let decision = fixture
            .resolver()
            .decide(&fixture.tracks_payload(), "Preview");

        assert!(matches!(decision, DropDecision::Load { .. }));
    }

    #[test]
    fn clone_requires_every_condition() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let clone = DropPayload::new().with_text("Deck2");
        assert!(resolver.allow_clone_attempt(&clone, "Deck1"));

        // Target is not a deck.
        assert!(!resolver.allow_clone_attempt(&clone, "Preview"));
        // Shift held.
        assert!(!resolver.allow_clone_attempt(&clone.clone().with_shift(true), "Deck1"));
        // No text tag.
        assert!(!resolver.allow_clone_attempt(&DropPayload::new(), "Deck1"));
        // Tag names the target.
        assert!(!resolver.allow_clone_attempt(&DropPayload::new().with_text("Deck1"), "Deck1"));
        // Tag is not a deck.
        assert!(!resolver.allow_clone_attempt(&DropPayload::new().with_text("Sampler"), "Deck1"));
    }

    #[test]
    fn self_tagged_payload_never_loads_or_clones() {
        let fixture = Fixture::new();
        let mut recorder = Recorder::default();
        let payload = fixture.tracks_payload().with_text("Deck1");

        let outcome = fixture
            .resolver()
            .handle_drop(&payload, "Deck1", &mut recorder);

        assert_eq!(outcome, DropOutcome::Rejected(RejectReason::SameOrigin));
        assert!(recorder.clones.is_empty());
        assert!(recorder.loads.is_empty());
    }

    #[test]
    fn payload_without_playable_files_is_rejected() {
        let fixture = Fixture::new();
        std::fs::write(fixture.track("notes.txt"), "hi").unwrap();
        let payload = DropPayload::new()
            .with_urls([DropReference::from_path(fixture.track("notes.txt"))]);

        assert_eq!(
            fixture.resolver().decide(&payload, "Sampler"),
            DropDecision::Reject(RejectReason::NoSupportedFile)
        );
    }

    #[test]
    fn drag_enter_follows_eligibility_and_load_path() {
        let mut fixture = Fixture::new();
        {
            let resolver = fixture.resolver();
            assert!(resolver.accepts_drag_enter(&fixture.tracks_payload(), "Deck1"));
            assert!(!resolver.accepts_drag_enter(&DropPayload::new().with_text("Deck2"), "Deck1"));
            assert!(
                !resolver.accepts_drag_enter(&fixture.tracks_payload().with_text("Deck1"), "Deck1")
            );
        }
        fixture.players.set_playing("Deck1", true);
        assert!(
            !fixture
                .resolver()
                .accepts_drag_enter(&fixture.tracks_payload(), "Deck1")
        );
    }

    #[test]
    fn drop_event_files_honours_caller_options() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let all = ResolveOptions::default();

        assert_eq!(
            resolver
                .drop_event_files(&fixture.tracks_payload(), "Library", all)
                .len(),
            2
        );
        assert!(
            resolver
                .drop_event_files(&fixture.tracks_payload().with_text("Library"), "Library", all)
                .is_empty()
        );
    }
}
