/// The narrative state machine — owns the session and drives play.
///
/// A session is a single synchronous loop: enter chapter, resolve
/// dialogue, present choices, await selection, mutate state, transition.
/// Transitions run through an explicit `step` function instead of
/// recursive re-entry, so authored cycles in the story graph cannot grow
/// the call stack. No fault inside the loop terminates the process: data
/// faults degrade to [`State::Recovery`], and the only exit is the
/// player's negative answer at a restart prompt, returned to the host as
/// [`State::Terminated`].
use crate::core::attribute;
use crate::core::dialogue;
use crate::core::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::core::loader::StoryData;
use crate::core::save::{SaveSlot, Snapshot};

/// Invalid selections tolerated per choice prompt before recovery.
pub const MAX_CHOICE_ATTEMPTS: u32 = 3;

/// Display/input collaborator boundary. The engine hands over plain
/// strings with placeholders already substituted; pacing and formatting
/// belong to the host.
pub trait Host {
    /// Display one line of text.
    fn line(&mut self, text: &str);
    /// Read one line of input. `None` means input is exhausted.
    fn read_line(&mut self) -> Option<String>;
    /// Pacing hook between successive dialogue lines. Presentational
    /// only; has no effect on state.
    fn pause(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Shown once per playthrough, then again after each reset.
    Intro,
    /// About to display a chapter (or the ending that shadows its id).
    Chapter(String),
    /// Awaiting a numbered selection for the given chapter.
    ChoicePrompt(String),
    /// Terminal per playthrough; leads to the restart prompt.
    Ending(String),
    /// Reached through narrative completion.
    RestartPrompt,
    /// Reached through a data fault; otherwise behaves like RestartPrompt.
    Recovery,
    /// End of session. The host decides what happens to the process.
    Terminated,
}

pub struct Session<H: Host> {
    data: StoryData,
    slot: SaveSlot,
    host: H,
    diagnostics: DiagnosticsSink,
    current: String,
    pad: f64,
    state: State,
}

impl<H: Host> Session<H> {
    /// Build a session from loaded story data, resuming from the save
    /// slot when a snapshot exists, else from foundation defaults.
    pub fn new(data: StoryData, slot: SaveSlot, host: H) -> Self {
        let mut diagnostics = DiagnosticsSink::new();
        let (current, pad) = match slot.load(&data.foundation, &mut diagnostics) {
            Some(snapshot) => (snapshot.current_chapter, snapshot.pad),
            None => (
                data.foundation.start_chapter.clone(),
                data.foundation.start_pad,
            ),
        };
        Session {
            data,
            slot,
            host,
            diagnostics,
            current,
            pad,
            state: State::Intro,
        }
    }

    /// Drive the state machine until [`State::Terminated`].
    pub fn run(&mut self) {
        while self.state != State::Terminated {
            let state = std::mem::replace(&mut self.state, State::Terminated);
            self.state = self.step(state);
        }
    }

    fn step(&mut self, state: State) -> State {
        match state {
            State::Intro => {
                let intro = self.data.foundation.intro.clone();
                self.host.line(&intro);
                self.host.line("Press Enter to continue...");
                let _ = self.host.read_line();
                State::Chapter(self.current.clone())
            }
            State::Chapter(id) => self.enter_chapter(id),
            State::ChoicePrompt(id) => self.prompt_choice(id),
            State::Ending(id) => self.show_ending(id),
            State::RestartPrompt => {
                self.host.line("Play again? (y/n)");
                self.prompt_restart()
            }
            State::Recovery => {
                self.host
                    .line("The story data is incomplete here; this playthrough cannot continue.");
                self.host.line("Restart from the beginning? (y/n)");
                self.prompt_restart()
            }
            State::Terminated => State::Terminated,
        }
    }

    fn enter_chapter(&mut self, id: String) -> State {
        // Endings take precedence even when the same id is a chapter.
        if self.data.endings.contains_key(&id) {
            return State::Ending(id);
        }
        let Some(chapter) = self.data.chapters.get(&id) else {
            self.diagnostics.report(Diagnostic::StructuralFault {
                location: id.clone(),
                detail: "no chapter or ending with this id".to_string(),
            });
            return State::Recovery;
        };
        let lines = dialogue::render(
            dialogue::resolve(chapter, self.pad),
            &self.data.foundation.character_name,
        );
        for line in &lines {
            self.host.line(line);
            self.host.pause();
        }
        State::ChoicePrompt(id)
    }

    fn prompt_choice(&mut self, id: String) -> State {
        let Some(chapter) = self.data.chapters.get(&id) else {
            self.diagnostics.report(Diagnostic::StructuralFault {
                location: id.clone(),
                detail: "chapter vanished between display and prompt".to_string(),
            });
            return State::Recovery;
        };
        if chapter.choices.is_empty() {
            self.diagnostics.report(Diagnostic::StructuralFault {
                location: id.clone(),
                detail: "chapter has no choices and is not an ending".to_string(),
            });
            return State::Recovery;
        }
        let choices = chapter.choices.clone();
        for (i, choice) in choices.iter().enumerate() {
            self.host.line(&format!("{}. {}", i + 1, choice.text));
        }

        for _ in 0..MAX_CHOICE_ATTEMPTS {
            self.host.line("Enter a choice number:");
            let selected = self
                .host
                .read_line()
                .as_deref()
                .map(str::trim)
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| (1..=choices.len()).contains(n));
            let Some(n) = selected else {
                self.host.line("Invalid choice number, try again.");
                continue;
            };
            let choice = &choices[n - 1];
            self.pad = attribute::apply_delta(self.pad, choice.delta);
            let Some(target) = &choice.target else {
                self.diagnostics.report(Diagnostic::StructuralFault {
                    location: format!("{}.choices[{}]", id, n - 1),
                    detail: "selected choice has no target chapter".to_string(),
                });
                return State::Recovery;
            };
            self.current = target.clone();
            return State::Chapter(target.clone());
        }
        State::Recovery
    }

    fn show_ending(&mut self, id: String) -> State {
        let Some(ending) = self.data.endings.get(&id) else {
            self.diagnostics.report(Diagnostic::StructuralFault {
                location: id.clone(),
                detail: "ending vanished from the ending table".to_string(),
            });
            return State::Recovery;
        };
        let lines = dialogue::render(&ending.lines, &self.data.foundation.character_name);
        for line in &lines {
            self.host.line(line);
            self.host.pause();
        }
        self.host.line("The end.");
        self.current = id;
        self.persist();
        State::RestartPrompt
    }

    fn prompt_restart(&mut self) -> State {
        // Exhausted input reads as a negative answer.
        let answer = self.host.read_line().unwrap_or_default();
        if is_affirmative(&answer) {
            self.reset();
            State::Intro
        } else {
            self.host.line("Thanks for playing. Goodbye!");
            State::Terminated
        }
    }

    /// Reinitialize to the canonical starting chapter and zero pad, then
    /// replay from the intro. A loop, not a process restart.
    fn reset(&mut self) {
        self.pad = 0.0;
        self.current = self.data.foundation.start_chapter.clone();
        self.persist();
    }

    fn persist(&mut self) {
        let snapshot = Snapshot {
            current_chapter: self.current.clone(),
            pad: self.pad,
        };
        self.slot.save(&snapshot, &mut self.diagnostics);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    pub fn current_chapter(&self) -> &str {
        &self.current
    }

    pub fn diagnostics(&self) -> &DiagnosticsSink {
        &self.diagnostics
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_tokens() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("  Yes \n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yeah"));
    }
}
