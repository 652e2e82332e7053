/// Story loading — TOML files in, fully populated immutable tables out.
///
/// The only fatal errors in the crate live here: a story source that
/// cannot be read or parsed at all fails startup. Everything below that
/// is decoded with explicit defaults — optional fields take their
/// documented fallbacks (data-quality, corrected with a diagnostic), and
/// structurally broken items are dropped so the state machine degrades to
/// recovery when it reaches them, instead of re-checking for absence on
/// every access.
use std::path::Path;

use rustc_hash::FxHashMap;
use thiserror::Error;
use toml::Value;

use crate::core::attribute;
use crate::core::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::core::predicate::Predicate;
use crate::core::save::as_number;
use crate::schema::chapter::{Chapter, Choice, DialogueVariant};
use crate::schema::ending::Ending;
use crate::schema::foundation::Foundation;

pub const FOUNDATION_FILE: &str = "foundation.toml";
pub const STORY_FILE: &str = "story.toml";
pub const ENDINGS_FILE: &str = "endings.toml";

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Everything the state machine needs, loaded once and read-only after.
#[derive(Debug, Clone)]
pub struct StoryData {
    pub foundation: Foundation,
    pub chapters: FxHashMap<String, Chapter>,
    pub endings: FxHashMap<String, Ending>,
}

impl StoryData {
    /// Load `foundation.toml`, `story.toml`, and `endings.toml` from a
    /// directory. Fatal only if a file is unreadable or not TOML.
    pub fn load_dir(dir: &Path, sink: &mut DiagnosticsSink) -> Result<StoryData, StoryError> {
        let foundation_src = std::fs::read_to_string(dir.join(FOUNDATION_FILE))?;
        let story_src = std::fs::read_to_string(dir.join(STORY_FILE))?;
        let endings_src = std::fs::read_to_string(dir.join(ENDINGS_FILE))?;
        Self::parse(&foundation_src, &story_src, &endings_src, sink)
    }

    /// Parse the three sources directly (used by tests and the linter).
    pub fn parse(
        foundation_src: &str,
        story_src: &str,
        endings_src: &str,
        sink: &mut DiagnosticsSink,
    ) -> Result<StoryData, StoryError> {
        Ok(StoryData {
            foundation: parse_foundation(foundation_src, sink)?,
            chapters: parse_story(story_src, sink)?,
            endings: parse_endings(endings_src, sink)?,
        })
    }
}

/// Decode the foundation file. Each field falls back independently.
pub fn parse_foundation(src: &str, sink: &mut DiagnosticsSink) -> Result<Foundation, StoryError> {
    let value: Value = src.parse()?;
    let mut foundation = Foundation::default();

    match value
        .get("current_state")
        .and_then(|t| t.get("current_chapter"))
        .and_then(|v| v.as_str())
    {
        Some(s) => foundation.start_chapter = s.to_string(),
        None => sink.report(Diagnostic::MissingField {
            table: "current_state".to_string(),
            field: "current_chapter".to_string(),
        }),
    }

    match value
        .get("current_state")
        .and_then(|t| t.get("pad"))
        .and_then(as_number)
    {
        Some(n) => foundation.start_pad = attribute::clamp(n),
        None => sink.report(Diagnostic::MissingField {
            table: "current_state".to_string(),
            field: "pad".to_string(),
        }),
    }

    match value
        .get("character")
        .and_then(|t| t.get("character_name"))
        .and_then(|v| v.as_str())
    {
        Some(s) => foundation.character_name = s.to_string(),
        None => sink.report(Diagnostic::MissingField {
            table: "character".to_string(),
            field: "character_name".to_string(),
        }),
    }

    match value
        .get("intro")
        .and_then(|t| t.get("text"))
        .and_then(|v| v.as_str())
    {
        Some(s) => foundation.intro = s.to_string(),
        None => sink.report(Diagnostic::MissingField {
            table: "intro".to_string(),
            field: "text".to_string(),
        }),
    }

    Ok(foundation)
}

/// Decode the story file: one table per chapter id.
pub fn parse_story(
    src: &str,
    sink: &mut DiagnosticsSink,
) -> Result<FxHashMap<String, Chapter>, StoryError> {
    let value: Value = src.parse()?;
    let mut chapters = FxHashMap::default();

    let Some(table) = value.as_table() else {
        return Ok(chapters);
    };
    for (id, entry) in table {
        // Dropped chapters surface as Recovery if ever entered.
        if let Some(chapter) = decode_chapter(id, entry, sink) {
            chapters.insert(id.clone(), chapter);
        }
    }
    Ok(chapters)
}

fn decode_chapter(id: &str, entry: &Value, sink: &mut DiagnosticsSink) -> Option<Chapter> {
    if !entry.is_table() {
        sink.report(Diagnostic::StructuralFault {
            location: id.to_string(),
            detail: "chapter entry is not a table".to_string(),
        });
        return None;
    }

    let Some(lines) = string_array(entry.get("lines")) else {
        sink.report(Diagnostic::StructuralFault {
            location: id.to_string(),
            detail: "chapter has no line list".to_string(),
        });
        return None;
    };

    let mut variants = Vec::new();
    if let Some(raw_variants) = entry.get("pad_dialogues").and_then(|v| v.as_array()) {
        for (i, raw) in raw_variants.iter().enumerate() {
            let location = format!("{}.pad_dialogues[{}]", id, i);
            let Some(raw_condition) = raw.get("range").and_then(|v| v.as_str()) else {
                sink.report(Diagnostic::StructuralFault {
                    location,
                    detail: "variant has no range condition".to_string(),
                });
                continue;
            };
            let Some(lines) = string_array(raw.get("lines")) else {
                sink.report(Diagnostic::StructuralFault {
                    location,
                    detail: "variant has no line list".to_string(),
                });
                continue;
            };
            variants.push(DialogueVariant {
                condition: Predicate::parse(raw_condition, sink),
                raw_condition: raw_condition.to_string(),
                lines,
            });
        }
    }

    let mut choices = Vec::new();
    if let Some(raw_choices) = entry.get("choices").and_then(|v| v.as_array()) {
        for (i, raw) in raw_choices.iter().enumerate() {
            let Some(text) = raw.get("text").and_then(|v| v.as_str()) else {
                sink.report(Diagnostic::StructuralFault {
                    location: format!("{}.choices[{}]", id, i),
                    detail: "choice has no display text".to_string(),
                });
                continue;
            };
            let delta = match raw.get("pad_change").and_then(as_number) {
                Some(n) => n,
                None => {
                    sink.report(Diagnostic::MalformedDelta {
                        choice: text.to_string(),
                    });
                    0.0
                }
            };
            // A missing target is kept: it only becomes a fault if the
            // player actually selects this choice.
            let target = raw
                .get("next_chapter")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            choices.push(Choice {
                text: text.to_string(),
                delta,
                target,
            });
        }
    }

    Some(Chapter {
        id: id.to_string(),
        lines,
        variants,
        choices,
    })
}

/// Decode the endings file: one table per ending id.
pub fn parse_endings(
    src: &str,
    sink: &mut DiagnosticsSink,
) -> Result<FxHashMap<String, Ending>, StoryError> {
    let value: Value = src.parse()?;
    let mut endings = FxHashMap::default();

    let Some(table) = value.as_table() else {
        return Ok(endings);
    };
    for (id, entry) in table {
        let Some(lines) = string_array(entry.get("lines")) else {
            sink.report(Diagnostic::StructuralFault {
                location: id.to_string(),
                detail: "ending has no line list".to_string(),
            });
            continue;
        };
        endings.insert(
            id.clone(),
            Ending {
                id: id.clone(),
                lines,
            },
        );
    }
    Ok(endings)
}

fn string_array(value: Option<&Value>) -> Option<Vec<String>> {
    let array = value?.as_array()?;
    Some(
        array
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect(),
    )
}
