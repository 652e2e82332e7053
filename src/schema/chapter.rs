/// Chapter — a narrative node with dialogue and outgoing choices.
use crate::core::predicate::Predicate;

/// An alternate dialogue line set, gated by a range condition over pad.
/// Variants are tried in declaration order; the first match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueVariant {
    /// Parsed at load time so resolution never re-parses.
    pub condition: Predicate,
    /// The authored condition string, kept for linting and diagnostics.
    pub raw_condition: String,
    pub lines: Vec<String>,
}

/// A player-facing option. `delta` has already been corrected to 0 if the
/// authored value was missing or malformed; a missing `target` is a
/// structural fault surfaced only when the choice is actually selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub text: String,
    pub delta: f64,
    pub target: Option<String>,
}

/// An immutable story node, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: String,
    /// Base dialogue, shown when no variant's condition matches.
    pub lines: Vec<String>,
    pub variants: Vec<DialogueVariant>,
    pub choices: Vec<Choice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_construction() {
        let chapter = Chapter {
            id: "chapter1".to_string(),
            lines: vec!["A door creaks open.".to_string()],
            variants: Vec::new(),
            choices: vec![Choice {
                text: "Step inside".to_string(),
                delta: 5.0,
                target: Some("chapter2".to_string()),
            }],
        };
        assert_eq!(chapter.choices.len(), 1);
        assert_eq!(chapter.choices[0].target.as_deref(), Some("chapter2"));
    }
}
