//! Reading drops and hovers out of egui frame input.

use std::path::PathBuf;

use super::dispatch::{DropModifiers, DropPayload};
use super::reference::DropReference;

pub fn modifiers_from(modifiers: egui::Modifiers) -> DropModifiers {
    DropModifiers {
        shift: modifiers.shift,
    }
}

/// Files released this frame. Entries without a filesystem path (web drops)
/// are skipped; `None` when nothing with a path was dropped.
pub fn dropped_payload(raw: &egui::RawInput) -> Option<DropPayload> {
    payload_from(
        raw.dropped_files.iter().filter_map(|file| file.path.clone()),
        raw.modifiers,
    )
}

/// Files currently hovering over the window, for drag-enter acceptance.
pub fn hovered_payload(raw: &egui::RawInput) -> Option<DropPayload> {
    payload_from(
        raw.hovered_files.iter().filter_map(|file| file.path.clone()),
        raw.modifiers,
    )
}

fn payload_from(
    paths: impl Iterator<Item = PathBuf>,
    modifiers: egui::Modifiers,
) -> Option<DropPayload> {
    let urls: Vec<DropReference> = paths.map(DropReference::from_path).collect();
    if urls.is_empty() {
        return None;
    }
    Some(DropPayload {
        urls,
        text: None,
        modifiers: modifiers_from(modifiers),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{DroppedFile, HoveredFile, Modifiers, RawInput};

    #[test]
    fn dropped_files_with_paths_become_references() {
        let mut raw = RawInput::default();
        raw.modifiers = Modifiers::SHIFT;
        raw.dropped_files = vec![
            DroppedFile {
                path: Some(PathBuf::from("/music/a.mp3")),
                ..Default::default()
            },
            DroppedFile {
                name: "web.mp3".into(),
                ..Default::default()
            },
            DroppedFile {
                path: Some(PathBuf::from("/music/b.mp3")),
                ..Default::default()
            },
        ];

        let payload = dropped_payload(&raw).unwrap();

        assert_eq!(
            payload.urls,
            vec![
                DropReference::from_path("/music/a.mp3"),
                DropReference::from_path("/music/b.mp3"),
            ]
        );
        assert_eq!(payload.text(), None);
        assert!(payload.modifiers.shift);
    }

    #[test]
    fn nothing_dropped_means_no_payload() {
        let mut raw = RawInput::default();
        assert!(dropped_payload(&raw).is_none());
        raw.hovered_files = vec![HoveredFile::default()];
        assert!(hovered_payload(&raw).is_none());
    }

    #[test]
    fn hovered_files_are_read_without_dropping() {
        let mut raw = RawInput::default();
        raw.hovered_files = vec![HoveredFile {
            path: Some(PathBuf::from("/music/a.flac")),
            ..Default::default()
        }];
        let payload = hovered_payload(&raw).unwrap();
        assert_eq!(payload.urls.len(), 1);
        assert!(!payload.modifiers.shift);
    }
}
