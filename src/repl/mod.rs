//! REPL (Read-Eval-Print Loop) module for interactive tutoring
//!
//! Slash commands are handled locally; any other line is practice input
//! for the active mode and is sent to the tutor.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;

use anyhow::Result;
use std::path::PathBuf;

use crate::conversation::ConversationSession;
use crate::progress::ProgressStore;
use crate::repl::commands::{is_command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::InputHandler;
pub use crate::repl::session::SessionManager;
use crate::tutor::{Mode, Tutor};

/// REPL session coordinator
///
/// Ties together input handling (rustyline), command processing, session
/// state and display.
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    session_manager: SessionManager,
    display_manager: DisplayManager,
}

impl ReplSession {
    /// Create new REPL session
    pub fn new(
        config: ReplConfig,
        conversation: ConversationSession,
        store: ProgressStore,
    ) -> Result<Self> {
        let mut input_handler = match config.history_file {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };
        input_handler.set_mode(config.mode);

        let display_manager = if config.show_progress {
            DisplayManager::new()
        } else {
            DisplayManager::new().without_spinner()
        };

        Ok(ReplSession {
            input_handler,
            command_handler: CommandHandler::new(),
            session_manager: SessionManager::new(config.mode, conversation, store),
            display_manager,
        })
    }

    /// Show welcome banner and the header of the starting mode
    pub fn show_welcome(&self, version: &str, model: &str) {
        self.display_manager.show_banner(version, model);
        self.display_manager.show_mode(self.session_manager.mode());
    }

    /// Read a line of input from user
    ///
    /// Returns:
    /// - Ok(Some(input)) for normal input
    /// - Ok(None) for EOF/exit
    /// - Err for interrupt
    pub fn read_input(&mut self) -> Result<Option<String>> {
        self.input_handler.read_line()
    }

    /// Handle a slash command
    ///
    /// Returns true if session should continue, false to exit
    pub fn handle_input(&mut self, input: &str) -> Result<bool> {
        let before = self.session_manager.mode();
        let command = self.command_handler.parse(input);
        let keep_going = self.command_handler.execute(
            command,
            &mut self.session_manager,
            &mut self.display_manager,
        )?;

        let after = self.session_manager.mode();
        if after != before {
            self.input_handler.set_mode(after);
            self.display_manager.show_mode(after);
        }

        Ok(keep_going)
    }

    /// Send practice input to the tutor in the active mode
    ///
    /// Results and warnings are printed; returns true when the tutor answered.
    pub async fn submit(&mut self, tutor: &Tutor, input: &str) -> bool {
        let mode = self.session_manager.mode();
        if !input.trim().is_empty() {
            self.display_manager.start_waiting("Asking your tutor...");
        }

        let answered = match mode {
            Mode::Vocabulary | Mode::Grammar => {
                let result = if mode == Mode::Vocabulary {
                    tutor.vocabulary(input).await
                } else {
                    tutor.grammar(input).await
                };

                match result {
                    Ok(lesson) => {
                        self.display_manager.show_response(&lesson.response);
                        if let Some(e) = &lesson.save_error {
                            self.display_manager.show_tutor_error(e);
                        }
                        true
                    }
                    Err(e) => {
                        self.display_manager.show_tutor_error(&e);
                        false
                    }
                }
            }
            Mode::Conversation => {
                match tutor
                    .converse(self.session_manager.conversation_mut(), input)
                    .await
                {
                    Ok(turns) => {
                        self.display_manager.show_turns(turns);
                        true
                    }
                    Err(e) => {
                        self.display_manager.show_tutor_error(&e);
                        false
                    }
                }
            }
        };

        if answered {
            self.session_manager.record_answer(mode);
        }
        answered
    }

    /// Route one line: commands are executed, anything else is submitted
    ///
    /// Returns true if session should continue, false to exit
    pub async fn dispatch_line(&mut self, tutor: &Tutor, input: &str) -> Result<bool> {
        if is_command(input) {
            return self.handle_input(input);
        }
        self.submit(tutor, input).await;
        Ok(true)
    }

    /// Get session manager (immutable)
    pub fn session(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn display(&self) -> &DisplayManager {
        &self.display_manager
    }

    pub fn prompt(&self) -> &str {
        self.input_handler.prompt()
    }

    /// Save session state
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()?;
        Ok(())
    }
}

/// Configuration for REPL mode
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub mode: Mode,
    pub history_file: Option<PathBuf>,
    pub show_progress: bool,
}
