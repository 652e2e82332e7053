/// Play — console host for a storyline-engine story.
///
/// Usage: play [--data-dir <dir>] [--save <file>] [--no-delay]
///
/// Loads the story tables from the data directory, resumes from the save
/// file when one exists, and runs the session loop over stdin/stdout.
use std::io::{self, BufRead};
use std::process;
use std::time::Duration;

use storyline_engine::core::diagnostics::DiagnosticsSink;
use storyline_engine::core::loader::StoryData;
use storyline_engine::core::save::SaveSlot;
use storyline_engine::core::session::{Host, Session};

/// Inter-line pacing of the original game.
const LINE_DELAY: Duration = Duration::from_millis(500);

struct ConsoleHost {
    delay: Option<Duration>,
}

impl Host for ConsoleHost {
    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf),
        }
    }

    fn pause(&mut self) {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
    }
}

fn print_usage() {
    println!("Usage: play [--data-dir <dir>] [--save <file>] [--no-delay]");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut data_dir = "story_data".to_string();
    let mut save_path = "save.toml".to_string();
    let mut delay = Some(LINE_DELAY);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--data-dir" if i + 1 < args.len() => {
                i += 1;
                data_dir = args[i].clone();
            }
            "--save" if i + 1 < args.len() => {
                i += 1;
                save_path = args[i].clone();
            }
            "--no-delay" => {
                delay = None;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut sink = DiagnosticsSink::new();
    let data = match StoryData::load_dir(std::path::Path::new(&data_dir), &mut sink) {
        Ok(data) => data,
        Err(e) => {
            // The one fatal path: an unreadable or unparsable story source.
            eprintln!("ERROR: failed to load story data from '{}': {}", data_dir, e);
            process::exit(1);
        }
    };
    if !sink.is_empty() {
        log::warn!("story data loaded with {} diagnostic(s)", sink.len());
    }

    let mut session = Session::new(data, SaveSlot::new(save_path), ConsoleHost { delay });
    session.run();
}
