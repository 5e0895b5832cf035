//! Light Discs console driver
//!
//! Stands in for the presentation layer: reads mirror activations from stdin,
//! commits them immediately and logs every notification the engine sends.

use std::io::{self, BufRead, Write};

use light_discs::puzzle::{LogListener, SwapCoordinator};
use light_discs::{LevelConfig, Result};

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Activate(usize),
    Commit,
    Play(usize),
    Status,
    Reset,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_lowercase();
        let mirror = words.next().and_then(|w| w.parse().ok());
        match (verb.as_str(), mirror) {
            ("activate" | "a", Some(m)) => Some(Command::Activate(m)),
            ("play" | "p", Some(m)) => Some(Command::Play(m)),
            ("commit" | "c", None) => Some(Command::Commit),
            ("status" | "s", None) => Some(Command::Status),
            ("reset", None) => Some(Command::Reset),
            ("help" | "h" | "?", None) => Some(Command::Help),
            ("quit" | "q" | "exit", None) => Some(Command::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "commands: activate N | commit | play N | status | reset | help | quit";

fn print_status(coordinator: &SwapCoordinator<LogListener>) {
    let registry = coordinator.registry();
    println!("phase: {}", coordinator.phase());
    for slot in registry.slots() {
        let modes: Vec<String> = registry
            .disc(slot.occupant)
            .map(|d| d.triangles.iter().map(|t| format!("{:?}", t.mode)).collect())
            .unwrap_or_default();
        println!("  slot {} <- {} [{}]", slot.index, slot.occupant, modes.join(", "));
    }
    println!("solved: {}", coordinator.is_solved());
}

fn run() -> Result<()> {
    let level = match std::env::args().nth(1) {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::reference(),
    };
    let mut coordinator = SwapCoordinator::from_level(&level, LogListener)?;

    println!("{HELP}");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = Command::parse(&line) else {
            println!("unrecognised: {}", line.trim());
            println!("{HELP}");
            continue;
        };

        // Rejected events are reported and the session carries on
        let outcome = match command {
            Command::Activate(mirror) => coordinator
                .activate(mirror)
                .map(|cycle| println!("rotating slots {cycle:?}")),
            Command::Commit => coordinator
                .commit()
                .map(|report| println!("{} beam changes, solved: {}", report.beam_changes, report.solved)),
            Command::Play(mirror) => coordinator.activate(mirror).and_then(|_| {
                coordinator
                    .commit()
                    .map(|report| println!("{} beam changes, solved: {}", report.beam_changes, report.solved))
            }),
            Command::Status => {
                print_status(&coordinator);
                Ok(())
            }
            Command::Reset => coordinator.reset(),
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
        };

        if let Err(e) = outcome {
            if e.is_fatal() {
                return Err(e);
            }
            println!("rejected: {e}");
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Light Discs starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("activate 3"), Some(Command::Activate(3)));
        assert_eq!(Command::parse("  P 7 "), Some(Command::Play(7)));
        assert_eq!(Command::parse("c"), Some(Command::Commit));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Command::parse("activate"), None);
        assert_eq!(Command::parse("activate x"), None);
        assert_eq!(Command::parse("commit 2"), None);
        assert_eq!(Command::parse("dance"), None);
    }
}
