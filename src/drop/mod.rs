//! Drag-and-drop core: resolving dropped references into playable tracks and
//! deciding what a drop onto a player slot does.

pub mod dispatch;
pub mod drag_source;
pub mod egui_input;
pub mod eligibility;
pub mod expansion;
pub mod media_support;
pub mod permissions;
pub mod players;
pub mod playlist;
pub mod reference;
pub mod validation;

pub use dispatch::{
    DropActions, DropDecision, DropModifiers, DropOutcome, DropPayload, DropResolver,
    RejectReason, dispatch,
};
pub use drag_source::{DragAction, DragExecutor, DragPayload, DragSession};
pub use eligibility::{TargetState, allow_load_to_player, allow_load_to_player_with_state};
pub use expansion::{ResolveOptions, TrackResolver};
pub use media_support::{ExtensionSupport, MediaSupport, ProbeSupport, media_support_for};
pub use permissions::{PermissionError, PermissionStore, TokenStore};
pub use players::{DeckTable, PlayerRegistry, SlotKind};
pub use playlist::{M3uParser, PlaylistError, PlaylistFormat, PlaylistParser, PlaylistParsers, PlsParser};
pub use reference::DropReference;
pub use validation::{AcceptedFile, CandidateFile, FileValidator};
