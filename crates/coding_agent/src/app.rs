use std::path::PathBuf;
use std::sync::Arc;

use agent_provider::{ChatBackend, ChatMessage};
use patch_relay::display::numbered_listing;
use session_store::{ProgramSession, SessionStoreError};

use crate::commands::{parse_slash_command, SlashCommand};
use crate::context::{ContextState, ContextSync};
use crate::pipeline::{apply_response, error_note};
use crate::transcript::display_messages;

const HELP_TEXT: &str = "Commands: /help, /clear, /program, /quit. Anything else is sent to the assistant; edits it proposes are written to the file between conflict markers.";
const HISTORY_CLEARED: &str = "History cleared";
pub const SYSTEM_INSTRUCTIONS_ENV_VAR: &str = "CODING_AGENT_SYSTEM_INSTRUCTIONS";
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "\
You are a coding assistant helping the user write one program file. \
You may explain your reasoning in prose. \
To change the file, include one or more fenced blocks tagged json, each holding an object \
or an array of objects with exactly the fields \"code\" (string), \"start\" (integer) and \"end\" (integer). \
Lines start..end-1 (1-based, end exclusive) are replaced by code; start == end inserts before line start. \
Line numbers always refer to the most recent program listing you were shown. \
Edits in one response must not overlap. \
Your changes are written between conflict markers for the user to review, so earlier suggestions may still appear in the file.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppOptions {
    /// Base System prompt; blank or `None` uses [`DEFAULT_SYSTEM_INSTRUCTIONS`].
    pub system_instructions: Option<String>,
    /// Start with an empty history instead of loading the sidecar.
    pub clear_history: bool,
}

pub fn system_instructions_from_env() -> String {
    let from_env = std::env::var(SYSTEM_INSTRUCTIONS_ENV_VAR).ok();
    sanitize_system_instructions(from_env)
}

fn sanitize_system_instructions(raw: Option<String>) -> String {
    let Some(value) = raw else {
        return DEFAULT_SYSTEM_INSTRUCTIONS.to_string();
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        DEFAULT_SYSTEM_INSTRUCTIONS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// One editing session: a program file, its conversation, and the backend.
pub struct App {
    session: ProgramSession,
    backend: Arc<dyn ChatBackend>,
    context: ContextSync,
    history: Vec<ChatMessage>,
    system_instructions: String,
    pub should_exit: bool,
}

impl App {
    /// Opens the program at `path`, creating it if needed, and loads its history.
    pub fn open(
        path: impl Into<PathBuf>,
        backend: Arc<dyn ChatBackend>,
        options: AppOptions,
    ) -> Result<Self, SessionStoreError> {
        let session = ProgramSession::open(path)?;
        let history = if options.clear_history {
            Vec::new()
        } else {
            session.load_history()?
        };

        let profile = backend.profile();
        tracing::info!(
            path = %session.path().display(),
            provider = %profile.provider_id,
            model = %profile.model_id,
            messages = history.len(),
            "session opened"
        );

        Ok(Self {
            session,
            backend,
            context: ContextSync::new(),
            history,
            system_instructions: sanitize_system_instructions(options.system_instructions),
            should_exit: false,
        })
    }

    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    /// Live history, including any context announcement.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn session(&self) -> &ProgramSession {
        &self.session
    }

    pub fn context_state(&self) -> ContextState {
        self.context.state()
    }

    /// Runs one full turn for `text` and returns what it added after the user message,
    /// formatted for display.
    pub fn handle_user_message(&mut self, text: &str) -> Vec<ChatMessage> {
        let sync_error = self
            .context
            .sync(&mut self.session, &mut self.history)
            .err();
        if let Some(error) = &sync_error {
            tracing::warn!(%error, "program context sync failed");
        }

        let reply = self.backend.query(&self.backend_history(), text);

        self.history.push(ChatMessage::user(text));
        let turn_start = self.history.len();
        if let Some(error) = sync_error {
            self.history.push(error_note(error));
        }

        match reply {
            Ok(response) => {
                let outcome = apply_response(&mut self.session, &response);
                self.history.push(ChatMessage::assistant(response));
                self.history.extend(outcome.notes);
                if outcome.applied > 0 {
                    self.context.mark_stale();
                }
            }
            Err(error) => {
                tracing::warn!(%error, "backend query failed");
                self.history
                    .push(error_note(format_args!("backend request failed: {error}")));
            }
        }

        let mut turn = display_messages(&self.history[turn_start..]);
        if let Err(error) = self.session.save_history(&self.history) {
            tracing::error!(%error, "failed to save history");
            let note = error_note(format_args!("history was not saved: {error}"));
            self.history.push(note.clone());
            turn.push(note);
        }
        turn
    }

    /// History as the user should see it, with edit blocks rendered as range annotations.
    pub fn display_history(&self) -> Vec<ChatMessage> {
        display_messages(&self.history)
    }

    /// Handles one line of user input: a slash command or a chat message.
    pub fn on_submit(&mut self, input: &str) -> Vec<ChatMessage> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return Vec::new();
        }

        let Some(command) = parse_slash_command(prompt) else {
            return self.handle_user_message(prompt);
        };

        match command {
            SlashCommand::Help => vec![ChatMessage::system(HELP_TEXT)],
            SlashCommand::Clear => {
                self.history.clear();
                self.context.mark_stale();
                match self.session.clear_history() {
                    Ok(()) => vec![ChatMessage::system(HISTORY_CLEARED)],
                    Err(error) => vec![error_note(error)],
                }
            }
            SlashCommand::Program => match self.session.program() {
                Ok(program) if program.is_empty() => {
                    vec![ChatMessage::system("The program is empty.")]
                }
                Ok(program) => vec![ChatMessage::system(numbered_listing(&program))],
                Err(error) => vec![error_note(error)],
            },
            SlashCommand::Quit => {
                self.should_exit = true;
                Vec::new()
            }
            SlashCommand::Unknown(command) => {
                vec![ChatMessage::system(format!("Unknown command: {command}"))]
            }
        }
    }

    fn backend_history(&self) -> Vec<ChatMessage> {
        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.push(ChatMessage::system(self.system_instructions.clone()));
        history.extend(self.history.iter().cloned());
        history
    }
}
