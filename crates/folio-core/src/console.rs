//! Developer console command table (`window.robot.*`).

use crate::agent::Gesture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleCommand {
    pub name: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: [ConsoleCommand; 4] = [
    ConsoleCommand {
        name: "robot.dance",
        description: "Make the robot perform a dance",
    },
    ConsoleCommand {
        name: "robot.wave",
        description: "Make the robot wave",
    },
    ConsoleCommand {
        name: "robot.stats",
        description: "Show robot personality stats",
    },
    ConsoleCommand {
        name: "help",
        description: "Show available commands",
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Gesture(Gesture),
    Stats,
    Help,
}

/// Accepts `robot.dance`, `robot.dance()` and surrounding whitespace.
pub fn parse_command(input: &str) -> Option<Command> {
    let name = input.trim();
    let name = name.strip_suffix("()").unwrap_or(name).to_lowercase();
    match name.as_str() {
        "robot.stats" => Some(Command::Stats),
        "help" | "robot.help" => Some(Command::Help),
        other => Gesture::from_command(other).map(Command::Gesture),
    }
}

pub fn help_text() -> String {
    let mut out = String::from("Available Robot Commands:");
    for cmd in COMMANDS {
        out.push_str(&format!("\n  {} - {}", cmd.name, cmd.description));
    }
    out
}
