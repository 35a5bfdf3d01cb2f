//! Command handler for REPL built-in commands
//!
//! A line is a command when it starts with `/` followed by a known command
//! name. Everything else, including text like `/usr is a folder`, is
//! practice input for the active mode.

use anyhow::Result;
use colored::*;

use crate::repl::display::{format_turn, DisplayManager};
use crate::repl::session::SessionManager;
use crate::tutor::Mode;

/// Default number of turns shown by `/history`
const DEFAULT_HISTORY: usize = 10;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Mode { mode: Option<Mode> },
    Progress { module: Option<String> },
    History { limit: Option<usize> },
    Status,
    Reset,
    Clear,
    Exit,
    Unknown { input: String },
}

/// Command names recognized after the leading `/`
const COMMAND_NAMES: &[&str] = &[
    "help", "h", "exit", "quit", "q", "mode", "m", "vocabulary", "vocab", "grammar",
    "conversation", "conv", "progress", "p", "history", "status", "reset", "clear", "cls",
];

/// Whether `input` names a known slash command
pub fn is_command(input: &str) -> bool {
    input
        .trim_start()
        .strip_prefix('/')
        .and_then(|body| body.split_whitespace().next())
        .map(|name| COMMAND_NAMES.contains(&name.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Command handler for parsing and executing REPL commands
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown {
                input: input.to_string(),
            };
        };

        let parts: Vec<&str> = body.split_whitespace().collect();
        if parts.is_empty() {
            return Command::Unknown {
                input: input.to_string(),
            };
        }

        match parts[0].to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "mode" | "m" => match parts.get(1) {
                None => Command::Mode { mode: None },
                Some(name) => match Mode::parse(name) {
                    Some(mode) => Command::Mode { mode: Some(mode) },
                    None => Command::Unknown {
                        input: input.to_string(),
                    },
                },
            },
            "vocabulary" | "vocab" => Command::Mode {
                mode: Some(Mode::Vocabulary),
            },
            "grammar" => Command::Mode {
                mode: Some(Mode::Grammar),
            },
            "conversation" | "conv" => Command::Mode {
                mode: Some(Mode::Conversation),
            },
            "progress" | "p" => Command::Progress {
                module: parts.get(1).map(|m| m.to_string()),
            },
            "history" => Command::History {
                limit: parts.get(1).and_then(|s| s.parse().ok()),
            },
            "status" => Command::Status,
            "reset" => Command::Reset,
            "clear" | "cls" => Command::Clear,
            _ => Command::Unknown {
                input: input.to_string(),
            },
        }
    }

    /// Execute a command
    ///
    /// Returns true if REPL should continue, false if should exit
    pub fn execute(
        &mut self,
        command: Command,
        session: &mut SessionManager,
        display: &mut DisplayManager,
    ) -> Result<bool> {
        match command {
            Command::Help => {
                self.show_help();
                Ok(true)
            }
            Command::Exit => {
                println!("{}", "Goodbye!".green());
                Ok(false)
            }
            Command::Mode { mode: None } => {
                println!(
                    "Current mode: {} (available: {})",
                    session.mode().name().green().bold(),
                    Mode::ALL
                        .iter()
                        .map(|m| m.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Ok(true)
            }
            Command::Mode { mode: Some(mode) } => {
                if !session.set_mode(mode) {
                    display.show_info(&format!("Already in {} mode.", mode.name()));
                }
                Ok(true)
            }
            Command::Progress { module } => {
                self.show_progress(session, display, module.as_deref());
                Ok(true)
            }
            Command::History { limit } => {
                self.show_history(session, limit.unwrap_or(DEFAULT_HISTORY));
                Ok(true)
            }
            Command::Status => {
                self.show_status(session);
                Ok(true)
            }
            Command::Reset => {
                session.reset();
                display.show_info("Session reset. Conversation cleared.");
                Ok(true)
            }
            Command::Clear => {
                display.clear_screen()?;
                Ok(true)
            }
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
                Ok(true)
            }
        }
    }

    /// Display help information
    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/mode [name]", "Show or switch mode (vocabulary, grammar, conversation)"),
            ("/vocab /grammar /conv", "Shortcuts for /mode"),
            ("/progress [module]", "Show saved vocabulary and grammar progress"),
            ("/history [n]", "Show last n conversation turns (default: 10)"),
            ("/status", "Show session status"),
            ("/reset", "Clear the conversation and session counters"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<24} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Vocabulary mode: type a word to get its definition");
        println!("  - Grammar mode: type a sentence to have it corrected");
        println!("  - Conversation mode: chat freely with your tutor");
        println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
        println!();
    }

    fn show_progress(&self, session: &SessionManager, display: &DisplayManager, module: Option<&str>) {
        let log = match session.store().load() {
            Ok(log) => log,
            Err(e) => {
                display.show_warning(&e.to_string());
                return;
            }
        };

        let records: Vec<_> = match module {
            Some(name) => log.record(name).into_iter().collect(),
            None => log.records(),
        };

        display.show_records(&records);
    }

    /// Display conversation history
    fn show_history(&self, session: &SessionManager, limit: usize) {
        let turns = session.conversation().history(limit);

        if turns.is_empty() {
            println!("{}", "No conversation yet.".yellow());
            return;
        }

        println!(
            "\n{}",
            format!("Conversation (last {} turns):", turns.len()).bold().cyan()
        );
        println!("{}", "=".repeat(60).cyan());
        for turn in turns {
            println!("  {}", format_turn(turn));
        }
        println!();
    }

    /// Display session status
    fn show_status(&self, session: &SessionManager) {
        println!("\n{}", "Session Status:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let duration = session.session_duration();
        let hours = duration / 3600;
        let minutes = (duration % 3600) / 60;
        let seconds = duration % 60;

        let duration_str = if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        };

        println!("  Mode:            {}", session.mode().title().green());
        println!(
            "  Started:         {} ({})",
            session.session_start().format("%H:%M:%S"),
            duration_str
        );
        println!("  Words defined:   {}", session.answered(Mode::Vocabulary));
        println!("  Sentences fixed: {}", session.answered(Mode::Grammar));
        println!("  Exchanges:       {}", session.conversation().exchanges());
        println!("  Progress file:   {}", session.store().path().display());
        println!();
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
