/// Session persistence — a single-slot TOML snapshot.
///
/// The snapshot is the minimal externally persisted state: the current
/// chapter (or ending) id and the pad value. One slot, last write wins.
/// Neither `save` nor `load` ever raises to the caller: I/O problems are
/// reported to the diagnostics sink and degrade to a no-op / `None`.
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::attribute;
use crate::core::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::schema::foundation::Foundation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub current_chapter: String,
    pub pad: f64,
}

/// Handle to the snapshot file.
#[derive(Debug, Clone)]
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with `snapshot`. Failures are reported and
    /// swallowed; an unsaved game is not a broken game.
    pub fn save(&self, snapshot: &Snapshot, sink: &mut DiagnosticsSink) {
        let serialized = match toml::to_string(snapshot) {
            Ok(s) => s,
            Err(e) => {
                sink.report(Diagnostic::PersistenceFailed {
                    detail: e.to_string(),
                });
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            sink.report(Diagnostic::PersistenceFailed {
                detail: format!("{}: {}", self.path.display(), e),
            });
        }
    }

    /// Read the slot. `None` means "no usable snapshot" (absent or
    /// unparsable file) and the caller starts from foundation defaults.
    /// A snapshot missing one of its two fields is recovered partially:
    /// only the missing field takes its foundation default.
    pub fn load(&self, foundation: &Foundation, sink: &mut DiagnosticsSink) -> Option<Snapshot> {
        if !self.path.exists() {
            log::info!("no snapshot at {}, starting fresh", self.path.display());
            return None;
        }
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                sink.report(Diagnostic::PersistenceFailed {
                    detail: format!("{}: {}", self.path.display(), e),
                });
                return None;
            }
        };
        let value: toml::Value = match contents.parse() {
            Ok(v) => v,
            Err(e) => {
                sink.report(Diagnostic::PersistenceFailed {
                    detail: format!("{}: {}", self.path.display(), e),
                });
                return None;
            }
        };

        let current_chapter = match value.get("current_chapter").and_then(|v| v.as_str()) {
            Some(s) => s.to_string(),
            None => {
                sink.report(Diagnostic::MissingField {
                    table: "save".to_string(),
                    field: "current_chapter".to_string(),
                });
                foundation.start_chapter.clone()
            }
        };
        let pad = match value.get("pad").and_then(as_number) {
            Some(n) => attribute::clamp(n),
            None => {
                sink.report(Diagnostic::MissingField {
                    table: "save".to_string(),
                    field: "pad".to_string(),
                });
                foundation.start_pad
            }
        };

        Some(Snapshot {
            current_chapter,
            pad,
        })
    }
}

/// TOML stores numbers as either integers or floats; accept both.
pub(crate) fn as_number(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}
