/// Dialogue resolution — pick one line set per chapter entry.
use crate::schema::chapter::Chapter;

/// The placeholder token authors write where the character's name goes.
pub const NAME_PLACEHOLDER: &str = "{character_name}";

/// Select the line set to display for a chapter at the given pad value:
/// the first variant (in declaration order) whose condition matches, or
/// the chapter's base lines when none do. Exactly one set is chosen; no
/// merging across variants.
pub fn resolve(chapter: &Chapter, pad: f64) -> &[String] {
    for variant in &chapter.variants {
        if variant.condition.matches(pad) {
            return &variant.lines;
        }
    }
    &chapter.lines
}

/// Substitute the character-name placeholder in each line. Done before
/// lines are handed to the display collaborator.
pub fn render(lines: &[String], character_name: &str) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.replace(NAME_PLACEHOLDER, character_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::DiagnosticsSink;
    use crate::core::predicate::Predicate;
    use crate::schema::chapter::DialogueVariant;

    fn variant(condition: &str, line: &str) -> DialogueVariant {
        let mut sink = DiagnosticsSink::new();
        DialogueVariant {
            condition: Predicate::parse(condition, &mut sink),
            raw_condition: condition.to_string(),
            lines: vec![line.to_string()],
        }
    }

    fn chapter_with_variants(variants: Vec<DialogueVariant>) -> Chapter {
        Chapter {
            id: "test".to_string(),
            lines: vec!["base line".to_string()],
            variants,
            choices: Vec::new(),
        }
    }

    #[test]
    fn base_lines_when_no_variant_matches() {
        let chapter = chapter_with_variants(vec![variant("pad >= 50", "warm line")]);
        assert_eq!(resolve(&chapter, 0.0), &["base line".to_string()]);
    }

    #[test]
    fn first_matching_variant_wins() {
        let chapter = chapter_with_variants(vec![
            variant("pad >= 10", "first"),
            variant("pad >= 0", "second"),
        ]);
        // both match at 20; declaration order decides
        assert_eq!(resolve(&chapter, 20.0), &["first".to_string()]);
        // only the second matches at 5
        assert_eq!(resolve(&chapter, 5.0), &["second".to_string()]);
    }

    #[test]
    fn disabled_variant_never_shadows_later_ones() {
        let chapter = chapter_with_variants(vec![
            variant("garbage", "never shown"),
            variant("[0, 100]", "shown"),
        ]);
        assert_eq!(resolve(&chapter, 0.0), &["shown".to_string()]);
    }

    #[test]
    fn render_substitutes_placeholder() {
        let lines = vec!["Hello, {character_name}!".to_string(), "Bye.".to_string()];
        let rendered = render(&lines, "Ayla");
        assert_eq!(rendered, vec!["Hello, Ayla!".to_string(), "Bye.".to_string()]);
    }
}
