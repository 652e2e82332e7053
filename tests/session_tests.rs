/// End-to-end state machine tests over a scripted host.
use storyline_engine::core::diagnostics::{Diagnostic, DiagnosticsSink};
use storyline_engine::core::loader::StoryData;
use storyline_engine::core::save::SaveSlot;
use storyline_engine::core::session::{Host, Session, State};

/// Host that replays a fixed input script and records every displayed line.
struct ScriptedHost {
    inputs: Vec<String>,
    transcript: Vec<String>,
}

impl ScriptedHost {
    fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().rev().map(|s| s.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    fn count(&self, needle: &str) -> usize {
        self.transcript
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl Host for ScriptedHost {
    fn line(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }

    fn read_line(&mut self) -> Option<String> {
        self.inputs.pop()
    }
}

const FOUNDATION: &str = r#"
[current_state]
current_chapter = "start"
pad = 0

[character]
character_name = "Rin"

[intro]
text = "INTRO TEXT"
"#;

const LINEAR_STORY: &str = r#"
[start]
lines = ["At the gate."]

[[start.choices]]
text = "Be kind"
pad_change = 40
next_chapter = "middle"

[[start.choices]]
text = "Be cruel"
pad_change = -40
next_chapter = "middle"

[middle]
lines = ["The hall is cold."]

[[middle.pad_dialogues]]
range = "pad >= 40"
lines = ["The hall feels warm."]

[[middle.choices]]
text = "Open the far door"
pad_change = 90
next_chapter = "finale"
"#;

const LINEAR_ENDINGS: &str = r#"
[finale]
lines = ["It is over, {character_name}."]
"#;

const TWIST_FOUNDATION: &str = r#"
[current_state]
current_chapter = "entry"
pad = 0

[character]
character_name = "Rin"

[intro]
text = "INTRO TEXT"
"#;

// "twist" exists in both tables; the ending must win.
const TWIST_STORY: &str = r#"
[entry]
lines = ["Before the twist."]

[[entry.choices]]
text = "Go"
pad_change = 0
next_chapter = "twist"

[twist]
lines = ["CHAPTER TWIST TEXT"]

[[twist.choices]]
text = "Never shown"
pad_change = 0
next_chapter = "entry"
"#;

const TWIST_ENDINGS: &str = r#"
[twist]
lines = ["ENDING TWIST TEXT"]
"#;

fn story_data(foundation: &str, story: &str, endings: &str) -> StoryData {
    let mut sink = DiagnosticsSink::new();
    StoryData::parse(foundation, story, endings, &mut sink).expect("test story must parse")
}

fn temp_slot(dir: &tempfile::TempDir) -> SaveSlot {
    SaveSlot::new(dir.path().join("save.toml"))
}

#[test]
fn deltas_clamp_across_choices() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    // intro, kind (+40), open door (+90, clamped), decline restart
    let host = ScriptedHost::new(&["", "1", "1", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert_eq!(session.pad(), 100.0);
    assert_eq!(session.state(), &State::Terminated);
    assert!(session.host().saw("It is over, Rin."));
}

#[test]
fn variant_dialogue_reacts_to_accumulated_pad() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    let host = ScriptedHost::new(&["", "1", "1", "n"]);
    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();
    // +40 from "Be kind" puts pad at the variant threshold
    assert!(session.host().saw("The hall feels warm."));
    assert!(!session.host().saw("The hall is cold."));

    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    let host = ScriptedHost::new(&["", "2", "1", "n"]);
    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();
    assert!(session.host().saw("The hall is cold."));
}

#[test]
fn ending_takes_precedence_over_chapter_with_same_id() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(TWIST_FOUNDATION, TWIST_STORY, TWIST_ENDINGS);
    let host = ScriptedHost::new(&["", "1", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert!(session.host().saw("ENDING TWIST TEXT"));
    assert!(!session.host().saw("CHAPTER TWIST TEXT"));
}

#[test]
fn three_invalid_inputs_reach_recovery_not_termination() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    let host = ScriptedHost::new(&["", "x", "99", "zero", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert!(session.host().saw("cannot continue"));
    // recovery wording, not the narrative-completion prompt
    assert!(!session.host().saw("Play again?"));
    assert_eq!(session.state(), &State::Terminated);
    assert_eq!(session.pad(), 0.0);
}

#[test]
fn recovery_restart_replays_from_the_top() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    // burn the attempt bound, accept the recovery restart, then finish
    let host = ScriptedHost::new(&["", "x", "x", "x", "y", "", "1", "1", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert_eq!(session.host().count("INTRO TEXT"), 2);
    assert_eq!(session.pad(), 100.0);
    assert_eq!(session.state(), &State::Terminated);
}

#[test]
fn reset_after_ending_zeroes_pad_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let slot = temp_slot(&dir);
    let data = story_data(TWIST_FOUNDATION, TWIST_STORY, TWIST_ENDINGS);
    // finish once, restart, finish again, quit
    let host = ScriptedHost::new(&["", "1", "y", "", "1", "n"]);

    let mut session = Session::new(data, slot.clone(), host);
    session.run();

    assert_eq!(session.host().count("INTRO TEXT"), 2);
    assert_eq!(session.host().count("ENDING TWIST TEXT"), 2);
    assert!(slot.path().exists());
}

#[test]
fn dangling_choice_target_degrades_to_recovery() {
    let story = r#"
[entry]
lines = ["..."]

[[entry.choices]]
text = "Leap"
pad_change = 5
next_chapter = "nowhere"
"#;
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(TWIST_FOUNDATION, story, "");
    let host = ScriptedHost::new(&["", "1", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert!(session.host().saw("cannot continue"));
    // the delta was applied before the fault surfaced
    assert_eq!(session.pad(), 5.0);
    assert!(session
        .diagnostics()
        .records()
        .iter()
        .any(|d| matches!(d, Diagnostic::StructuralFault { .. })));
}

#[test]
fn choice_without_target_degrades_to_recovery() {
    let story = r#"
[entry]
lines = ["..."]

[[entry.choices]]
text = "Stay forever"
pad_change = 0
"#;
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(TWIST_FOUNDATION, story, "");
    let host = ScriptedHost::new(&["", "1", "n"]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert!(session.host().saw("cannot continue"));
    assert_eq!(session.state(), &State::Terminated);
}

#[test]
fn session_resumes_from_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = temp_slot(&dir);

    let data = story_data(TWIST_FOUNDATION, TWIST_STORY, TWIST_ENDINGS);
    let host = ScriptedHost::new(&["", "1", "n"]);
    let mut session = Session::new(data, slot.clone(), host);
    session.run();

    // a fresh session over the same slot resumes where the last one saved
    let data = story_data(TWIST_FOUNDATION, TWIST_STORY, TWIST_ENDINGS);
    let session = Session::new(data, slot, ScriptedHost::new(&[]));
    assert_eq!(session.current_chapter(), "twist");
    assert_eq!(session.pad(), 0.0);
    assert_eq!(session.state(), &State::Intro);
}

#[test]
fn exhausted_input_drains_to_termination() {
    let dir = tempfile::tempdir().unwrap();
    let data = story_data(FOUNDATION, LINEAR_STORY, LINEAR_ENDINGS);
    // no input at all: intro read fails, prompts fail, recovery declines
    let host = ScriptedHost::new(&[]);

    let mut session = Session::new(data, temp_slot(&dir), host);
    session.run();

    assert_eq!(session.state(), &State::Terminated);
}
