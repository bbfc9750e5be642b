use std::path::{Path, PathBuf};

use dropdeck::drop::DropActions;

/// Side effect seen by the application, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    Clone { source: String, target: String },
    Load { path: PathBuf, target: String },
}

#[derive(Debug, Default)]
pub struct RecordingActions {
    pub calls: Vec<Recorded>,
}

impl DropActions for RecordingActions {
    fn clone_deck(&mut self, source: &str, target: &str) {
        self.calls.push(Recorded::Clone {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    fn file_dropped(&mut self, path: &Path, target: &str) {
        self.calls.push(Recorded::Load {
            path: path.to_path_buf(),
            target: target.to_string(),
        });
    }
}
