use crate::config::ControlSettings;

use super::players::PlayerRegistry;

/// What the registry reported about a drop target at decision time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetState {
    pub is_deck: bool,
    pub is_preview_deck: bool,
    pub is_playing: bool,
}

impl TargetState {
    pub fn snapshot(players: &dyn PlayerRegistry, group: &str) -> Self {
        Self {
            is_deck: players.is_deck(group),
            is_preview_deck: players.is_preview_deck(group),
            is_playing: players.is_playing(group),
        }
    }
}

/// Preview decks always take loads; other players only when stopped, unless
/// the user allows interrupting playback.
pub fn allow_load(state: &TargetState, controls: &ControlSettings) -> bool {
    if state.is_preview_deck {
        return true;
    }
    !state.is_playing || controls.allow_track_load_to_playing_deck
}

/// [`allow_load`] with the play state supplied by the caller.
pub fn allow_load_to_player_with_state(
    players: &dyn PlayerRegistry,
    group: &str,
    is_playing: bool,
    controls: &ControlSettings,
) -> bool {
    let state = TargetState {
        is_playing,
        ..TargetState::snapshot(players, group)
    };
    allow_load(&state, controls)
}

/// [`allow_load`] with the play state read from the registry.
pub fn allow_load_to_player(
    players: &dyn PlayerRegistry,
    group: &str,
    controls: &ControlSettings,
) -> bool {
    allow_load(&TargetState::snapshot(players, group), controls)
}
