//! Player slots a drop can target, and the registry that knows their state.

use std::collections::HashMap;

/// Read-only view of the application's players, queried once per drop.
pub trait PlayerRegistry {
    /// True for a real deck (a clone source or target).
    fn is_deck(&self, group: &str) -> bool;
    /// True for a preview deck, which takes loads while playing.
    fn is_preview_deck(&self, group: &str) -> bool;
    fn is_playing(&self, group: &str) -> bool;
}

/// Kind of player behind a group name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Deck,
    PreviewDeck,
    Sampler,
}

impl SlotKind {
    fn prefix(self) -> &'static str {
        match self {
            SlotKind::Deck => "Channel",
            SlotKind::PreviewDeck => "PreviewDeck",
            SlotKind::Sampler => "Sampler",
        }
    }

    /// Classify `[ChannelN]`, `[PreviewDeckN]` and `[SamplerN]` group names (N >= 1).
    pub fn from_group(group: &str) -> Option<Self> {
        let inner = group.strip_prefix('[')?.strip_suffix(']')?;
        [SlotKind::Deck, SlotKind::PreviewDeck, SlotKind::Sampler]
            .into_iter()
            .find(|kind| {
                inner
                    .strip_prefix(kind.prefix())
                    .filter(|index| index.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|index| index.parse::<u32>().ok())
                    .is_some_and(|index| index >= 1)
            })
    }

    /// Group name of the `index`-th slot of this kind, counting from 1.
    pub fn group(self, index: u32) -> String {
        format!("[{}{index}]", self.prefix())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SlotState {
    kind: SlotKind,
    playing: bool,
}

/// In-memory [`PlayerRegistry`] for applications without their own player table.
#[derive(Clone, Debug, Default)]
pub struct DeckTable {
    slots: HashMap<String, SlotState>,
}

impl DeckTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table populated with conventionally named slots, all stopped.
    pub fn with_standard_groups(decks: u32, preview_decks: u32, samplers: u32) -> Self {
        let mut table = Self::new();
        for (kind, count) in [
            (SlotKind::Deck, decks),
            (SlotKind::PreviewDeck, preview_decks),
            (SlotKind::Sampler, samplers),
        ] {
            for index in 1..=count {
                table.insert(kind.group(index), kind);
            }
        }
        table
    }

    /// Add or reclassify a slot. A new slot starts stopped.
    pub fn insert(&mut self, group: impl Into<String>, kind: SlotKind) {
        self.slots
            .entry(group.into())
            .and_modify(|slot| slot.kind = kind)
            .or_insert(SlotState {
                kind,
                playing: false,
            });
    }

    /// Add a slot whose kind follows from its conventional group name.
    pub fn register(&mut self, group: &str) -> Option<SlotKind> {
        let kind = SlotKind::from_group(group)?;
        self.insert(group, kind);
        Some(kind)
    }

    /// Update play state; returns false for unknown groups.
    pub fn set_playing(&mut self, group: &str, playing: bool) -> bool {
        match self.slots.get_mut(group) {
            Some(slot) => {
                slot.playing = playing;
                true
            }
            None => false,
        }
    }

    pub fn kind(&self, group: &str) -> Option<SlotKind> {
        self.slots.get(group).map(|slot| slot.kind)
    }
}

impl PlayerRegistry for DeckTable {
    fn is_deck(&self, group: &str) -> bool {
        self.kind(group) == Some(SlotKind::Deck)
    }

    fn is_preview_deck(&self, group: &str) -> bool {
        self.kind(group) == Some(SlotKind::PreviewDeck)
    }

    fn is_playing(&self, group: &str) -> bool {
        self.slots.get(group).is_some_and(|slot| slot.playing)
    }
}
