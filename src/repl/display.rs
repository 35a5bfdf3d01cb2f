//! Display manager for REPL terminal UI
//!
//! Owns the waiting spinner and all colored output of the tutor.

use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::conversation::{ConversationTurn, Role};
use crate::errors::TutorError;
use crate::progress::ProgressRecord;
use crate::tutor::Mode;

/// Display manager for REPL UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    tick_interval: Duration,
    spinner_enabled: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            tick_interval: Duration::from_millis(100),
            spinner_enabled: true,
        }
    }

    /// Disable the waiting spinner (quiet mode, piped output)
    pub fn without_spinner(mut self) -> Self {
        self.spinner_enabled = false;
        self
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  tutorbuddy {} - Interactive English Tutor", version);
        let info = format!("  Model: {}", model);

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Modes: {} | {} | {}  (switch with {}, {} for commands, {} to quit)\n",
            "vocabulary".green(),
            "grammar".green(),
            "conversation".green(),
            "/mode <name>".cyan(),
            "/help".cyan(),
            "/exit".cyan()
        );
    }

    /// Header shown when a mode becomes active
    pub fn show_mode(&self, mode: Mode) {
        println!("\n{}", mode.title().bold().cyan());
        println!("{}", mode.subtitle().bold());
        println!("{}\n", format!("{}:", mode.input_hint()).dimmed());
    }

    /// Start the spinner shown while a request is pending
    pub fn start_waiting(&mut self, message: &str) -> Option<ProgressBar> {
        self.finish_current();
        if !self.spinner_enabled {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.tick_interval);

        self.current_bar = Some(pb.clone());
        Some(pb)
    }

    /// Stop and clear the spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a tutor answer
    pub fn show_response(&mut self, response: &str) {
        self.finish_current();
        println!("\n{}\n", response);
    }

    /// Print the visible conversation window
    pub fn show_turns(&mut self, turns: &[ConversationTurn]) {
        self.finish_current();
        println!();
        for turn in turns {
            println!("{}", format_turn(turn));
        }
        println!();
    }

    /// Print an error as warning or error depending on its kind
    pub fn show_tutor_error(&mut self, error: &TutorError) {
        self.finish_current();
        if error.is_warning() {
            self.show_warning(&error.to_string());
        } else {
            self.show_error(&error.to_string());
        }
    }

    /// Print saved progress for each record
    pub fn show_records(&self, records: &[ProgressRecord]) {
        if records.is_empty() {
            println!("{}", "No progress saved yet.".yellow());
            return;
        }

        for record in records {
            println!(
                "\n{} {}",
                record.module.bold().cyan(),
                format!("({} entries)", record.entries.len()).dimmed()
            );
            println!("{}", "-".repeat(60).cyan());
            for (i, entry) in record.entries.iter().enumerate() {
                let mut fields = entry.iter();
                if let Some((key, value)) = fields.next() {
                    println!("  {}. {}: {}", (i + 1).to_string().cyan(), key.bold(), value);
                }
                for (key, value) in fields {
                    println!("     {}: {}", key.dimmed(), first_line(value));
                }
            }
        }
        println!();
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Colored `Role: content` line for a turn
pub fn format_turn(turn: &ConversationTurn) -> String {
    let label = format!("{}:", turn.role.label());
    let label = match turn.role {
        Role::User => label.bold().green(),
        Role::Assistant => label.bold().cyan(),
    };
    format!("{} {}", label, turn.content)
}

fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{} ...", first)
    } else {
        first.to_string()
    }
}
