/// Story Linter — validates a story data directory before shipping it.
///
/// Usage: story_linter <story_dir>
///
/// Errors (exit 1): unparsable predicates, broken chapter/choice
/// structure, choice targets that resolve to nothing, non-ending chapters
/// with no choices. Warnings: defaulted optional fields, ending ids that
/// shadow chapter ids, chapters unreachable from the starting chapter.
use std::collections::HashSet;
use std::path::Path;
use std::process;

use storyline_engine::core::diagnostics::{Diagnostic, DiagnosticsSink};
use storyline_engine::core::loader::StoryData;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <story_dir>");
        process::exit(0);
    }

    let dir = Path::new(&args[1]);
    let mut sink = DiagnosticsSink::new();
    let data = match StoryData::load_dir(dir, &mut sink) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("ERROR: failed to load story data: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded {} chapters, {} endings (start: {})",
        data.chapters.len(),
        data.endings.len(),
        data.foundation.start_chapter
    );

    let (errors, warnings) = lint_story(&data, &sink);

    println!("\n=== Story Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_story(data: &StoryData, sink: &DiagnosticsSink) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Loader diagnostics: structural problems and dead predicates are
    // errors for an author; corrected defaults are warnings.
    for diagnostic in sink.records() {
        match diagnostic {
            Diagnostic::UnparsablePredicate { .. } | Diagnostic::StructuralFault { .. } => {
                errors.push(diagnostic.to_string());
            }
            _ => warnings.push(diagnostic.to_string()),
        }
    }

    // Cross-reference pass over the loaded tables.
    for chapter in data.chapters.values() {
        if data.endings.contains_key(&chapter.id) {
            warnings.push(format!(
                "ending '{}' shadows a chapter with the same id; the chapter is unplayable",
                chapter.id
            ));
        }
        if chapter.choices.is_empty() {
            errors.push(format!(
                "chapter '{}' has no choices and is not an ending",
                chapter.id
            ));
        }
        for (i, choice) in chapter.choices.iter().enumerate() {
            match &choice.target {
                None => errors.push(format!(
                    "{}.choices[{}] ('{}') has no next_chapter",
                    chapter.id, i, choice.text
                )),
                Some(target)
                    if !data.chapters.contains_key(target)
                        && !data.endings.contains_key(target) =>
                {
                    errors.push(format!(
                        "{}.choices[{}] targets unknown id '{}'",
                        chapter.id, i, target
                    ));
                }
                Some(_) => {}
            }
        }
    }

    if !data.chapters.contains_key(&data.foundation.start_chapter)
        && !data.endings.contains_key(&data.foundation.start_chapter)
    {
        errors.push(format!(
            "starting chapter '{}' does not exist",
            data.foundation.start_chapter
        ));
    }

    for id in unreachable_chapters(data) {
        warnings.push(format!(
            "chapter '{}' is unreachable from '{}'",
            id, data.foundation.start_chapter
        ));
    }

    errors.sort();
    warnings.sort();
    (errors, warnings)
}

/// Walk the choice graph from the starting chapter.
fn unreachable_chapters(data: &StoryData) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue = vec![data.foundation.start_chapter.as_str()];
    while let Some(id) = queue.pop() {
        if !seen.insert(id) || data.endings.contains_key(id) {
            continue;
        }
        if let Some(chapter) = data.chapters.get(id) {
            for choice in &chapter.choices {
                if let Some(target) = &choice.target {
                    queue.push(target);
                }
            }
        }
    }

    let mut unreachable: Vec<String> = data
        .chapters
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();
    unreachable.sort();
    unreachable
}
