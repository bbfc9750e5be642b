//! Building outbound drags of track files.

use std::path::Path;

use tracing::{debug, warn};
use url::Url;

use super::dispatch::{DropModifiers, DropPayload};
use super::reference::DropReference;

/// Bundle handed to the platform when a drag starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
    locations: Vec<Url>,
    source: String,
}

impl DragPayload {
    /// Payload for `locations` tagged with `source_identifier`.
    ///
    /// Returns `None` when no location converts to a `file://` URL.
    pub fn from_locations<I, P>(locations: I, source_identifier: impl Into<String>) -> Option<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let locations: Vec<Url> = locations
            .into_iter()
            .filter_map(|location| url_from_location(location.as_ref()))
            .collect();
        if locations.is_empty() {
            return None;
        }
        Some(Self {
            locations,
            source: source_identifier.into(),
        })
    }

    pub fn locations(&self) -> &[Url] {
        &self.locations
    }

    /// Tag compared against the identifier of whatever receives the drop.
    pub fn source_identifier(&self) -> &str {
        &self.source
    }

    /// The drop a receiver inside this process sees for this drag.
    pub fn to_drop_payload(&self, modifiers: DropModifiers) -> DropPayload {
        DropPayload {
            urls: self.locations.iter().map(DropReference::from_url).collect(),
            text: Some(self.source.clone()),
            modifiers,
        }
    }
}

/// Absolute `file://` URL for a track location.
pub fn url_from_location(location: &Path) -> Option<Url> {
    let absolute = match std::path::absolute(location) {
        Ok(path) => path,
        Err(err) => {
            warn!("Cannot resolve drag location {}: {err}", location.display());
            return None;
        }
    };
    let url = Url::from_file_path(&absolute).ok();
    if url.is_none() {
        warn!("Cannot express {} as a file URL", absolute.display());
    }
    url
}

/// Effect requested from the drop target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragAction {
    #[default]
    Copy,
}

/// Runs a drag with a prepared payload.
pub trait DragExecutor {
    fn execute(&mut self, payload: &DragPayload, action: DragAction);
}

/// Start a copy drag of a single track.
pub fn drag_track(
    location: &Path,
    source_identifier: &str,
    executor: &mut dyn DragExecutor,
) -> Option<DragPayload> {
    drag_track_locations([location], source_identifier, executor)
}

/// Start a copy drag of several tracks; a no-op for an empty list.
pub fn drag_track_locations<I, P>(
    locations: I,
    source_identifier: &str,
    executor: &mut dyn DragExecutor,
) -> Option<DragPayload>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let Some(payload) = DragPayload::from_locations(locations, source_identifier) else {
        debug!("Nothing to drag from {source_identifier}");
        return None;
    };
    executor.execute(&payload, DragAction::Copy);
    Some(payload)
}

/// In-process drag: keeps the payload until the pointer is released.
#[derive(Clone, Debug, Default)]
pub struct DragSession {
    active: Option<DragPayload>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// End the drag, yielding the drop payload the release delivers.
    pub fn finish(&mut self, modifiers: DropModifiers) -> Option<DropPayload> {
        self.active
            .take()
            .map(|payload| payload.to_drop_payload(modifiers))
    }

    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("Drag cancelled");
        }
    }
}

impl DragExecutor for DragSession {
    fn execute(&mut self, payload: &DragPayload, action: DragAction) {
        debug!(
            "Dragging {} location(s) from {} ({action:?})",
            payload.locations.len(),
            payload.source
        );
        self.active = Some(payload.clone());
    }
}
