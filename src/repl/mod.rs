//! REPL (Read-Eval-Print Loop) module for interactive terminal experience
//!
//! The terminal counterpart of the lead dashboard: a creation form, document
//! upload, filterable table, and a chat panel bound to one lead at a time.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::ChatSession;
use crate::cli::Config;
use crate::leads::{DocumentExtractor, DocumentUpload, LeadStore, StatusFilter};
use crate::repl::commands::{is_command, Command, LeadField};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::InputHandler;
use crate::streaming::ChatBackend;
use crate::types::{LeadId, NewLead};

/// Configuration for REPL mode
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub history_file: Option<PathBuf>,
    pub show_progress: bool,
    pub model: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: None,
            show_progress: true,
            model: crate::streaming::DEFAULT_MODEL.to_string(),
        }
    }
}

/// REPL session coordinator
///
/// Owns the lead working set and the open conversation; every mutation
/// happens between awaits on the one task running the loop.
pub struct ReplSession {
    config: ReplConfig,
    display: DisplayManager,
    store: LeadStore,
    extractor: Box<dyn DocumentExtractor>,
    backend: Option<Arc<dyn ChatBackend>>,
    chat: Option<ChatSession>,
    /// Extracted lead awaiting /confirm
    pending: Option<NewLead>,
}

impl ReplSession {
    /// Create new REPL session
    ///
    /// Without a backend the chat commands report that no API key is set.
    pub fn new(
        config: ReplConfig,
        store: LeadStore,
        extractor: Box<dyn DocumentExtractor>,
        backend: Option<Arc<dyn ChatBackend>>,
    ) -> Self {
        let display = if config.show_progress {
            DisplayManager::new()
        } else {
            DisplayManager::without_progress()
        };

        ReplSession {
            config,
            display,
            store,
            extractor,
            backend,
            chat: None,
            pending: None,
        }
    }

    /// Run the read-eval-print loop until /exit or EOF
    pub async fn run(&mut self, version: &str) -> Result<()> {
        let mut input = match &self.config.history_file {
            Some(path) => InputHandler::with_history(path.clone())?,
            None => InputHandler::new()?,
        };

        self.display
            .show_banner(version, &self.config.model, self.backend.is_some());

        loop {
            let chatting_with = self.chat.as_ref().map(|chat| chat.lead().name.as_str());
            let prompt = self.display.prompt(chatting_with);

            let Some(line) = input.read_line(&prompt)? else {
                break;
            };
            if !self.handle_input(&line).await? {
                break;
            }
        }

        input.save_history()?;
        Ok(())
    }

    /// Handle user input (command or chat question)
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        if is_command(input) {
            return self.execute(commands::parse(input)).await;
        }

        if self.chat.is_some() {
            self.ask(input).await;
        } else {
            self.display.show_warning(
                "Not in a chat. Use /chat <id> to talk about a lead, or /help for commands.",
            );
        }
        Ok(true)
    }

    /// Execute a parsed command
    pub async fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => self.display.show_help(),
            Command::Exit => {
                println!("Goodbye!");
                return Ok(false);
            }
            Command::Leads { filter } => self.show_leads(filter),
            Command::Add { name, email, phone } => {
                let _ = self.add_lead(NewLead::manual(name, email, phone));
            }
            Command::Upload { path } => self.upload(path).await,
            Command::Edit { field, value } => self.edit_pending(field, value),
            Command::Confirm => self.confirm_pending(),
            Command::Discard => {
                if self.pending.take().is_some() {
                    self.display.show_success("Extracted lead discarded");
                } else {
                    self.display.show_warning("No extracted lead to discard");
                }
            }
            Command::Toggle { id } => self.toggle(&id),
            Command::Delete { id } => self.delete(&id),
            Command::Chat { id } => self.open_chat(&id),
            Command::Back => {
                if self.chat.take().is_some() {
                    self.display.show_success("Chat closed");
                }
            }
            Command::Stats => self.display.show_stats(self.store.counts()),
            Command::Clear => self.display.clear_screen(),
            Command::Usage { usage } => self.display.show_warning(&format!("Usage: {}", usage)),
            Command::Unknown { input } => {
                self.display
                    .show_error(&format!("Unknown command: {} (try /help)", input));
            }
        }
        Ok(true)
    }

    fn show_leads(&self, filter: StatusFilter) {
        let leads = self.store.filter(filter);
        self.display.show_leads(&leads, filter, self.store.counts());
    }

    /// Add a candidate; on failure the candidate is handed back
    fn add_lead(&mut self, candidate: NewLead) -> std::result::Result<(), NewLead> {
        match self.store.add(candidate.clone()) {
            Ok(lead) => {
                self.display.show_success(&format!(
                    "{} has been added to your leads ({}, id {})",
                    lead.name,
                    lead.source,
                    lead.id.short()
                ));
                Ok(())
            }
            Err(e) => {
                self.display.show_error(&e.to_string());
                Err(candidate)
            }
        }
    }

    async fn upload(&mut self, path: PathBuf) {
        let upload = match DocumentUpload::open(&Config::expand_path(&path)) {
            Ok(upload) => upload,
            Err(e) => {
                self.display.show_error(&e.to_string());
                return;
            }
        };
        if let Err(e) = upload.ensure_supported() {
            self.display.show_error(&e.to_string());
            return;
        }
        if self.pending.is_some() {
            self.display
                .show_warning("Replacing the extracted lead that was awaiting review");
        }

        let pb = self
            .display
            .spinner(&format!("Processing {}...", upload.file_name));
        let extracted = self.extractor.extract(&upload).await;
        pb.finish_and_clear();

        match extracted {
            Ok(extracted) => {
                self.display
                    .show_success("Lead information extracted from document");
                let candidate = extracted.into_new_lead();
                self.display.show_review(&candidate);
                self.pending = Some(candidate);
            }
            Err(e) => self.display.show_error(&e.to_string()),
        }
    }

    fn edit_pending(&mut self, field: LeadField, value: String) {
        let Some(candidate) = self.pending.as_mut() else {
            self.display.show_warning("No extracted lead to edit; use /upload first");
            return;
        };

        match field {
            LeadField::Name => candidate.name = value,
            LeadField::Email => candidate.email = value,
            LeadField::Phone => candidate.phone = Some(value).filter(|p| !p.is_empty()),
        }
        self.display.show_review(candidate);
    }

    fn confirm_pending(&mut self) {
        let Some(candidate) = self.pending.take() else {
            self.display.show_warning("No extracted lead to confirm; use /upload first");
            return;
        };

        if let Err(candidate) = self.add_lead(candidate) {
            self.pending = Some(candidate);
        }
    }

    fn resolve_id(&self, id: &str) -> Option<LeadId> {
        match self.store.resolve(id) {
            Ok(lead) => Some(lead.id.clone()),
            Err(e) => {
                self.display.show_error(&e.to_string());
                None
            }
        }
    }

    fn toggle(&mut self, id: &str) {
        let Some(id) = self.resolve_id(id) else { return };
        if let Some(status) = self.store.toggle_status(&id) {
            self.display
                .show_success(&format!("Lead status changed to {}", status));
        }
    }

    fn delete(&mut self, id: &str) {
        let Some(id) = self.resolve_id(id) else { return };
        if let Some(lead) = self.store.delete(&id) {
            self.display
                .show_success(&format!("{} has been removed from your leads", lead.name));
        }
    }

    fn open_chat(&mut self, id: &str) {
        if self.backend.is_none() {
            self.display.show_error(
                "Chat needs an API key: set OPENROUTER_API_KEY or openrouter.api_key in the config",
            );
            return;
        }

        let lead = match self.store.resolve(id) {
            Ok(lead) => lead.clone(),
            Err(e) => {
                self.display.show_error(&e.to_string());
                return;
            }
        };

        let chat = ChatSession::new(lead);
        self.display.show_chat_header(chat.lead());
        for message in chat.messages() {
            self.display.show_message(message);
        }
        self.chat = Some(chat);
    }

    async fn ask(&mut self, question: &str) {
        let (Some(chat), Some(backend)) = (self.chat.as_mut(), self.backend.as_ref()) else {
            return;
        };

        let display = &self.display;
        let pb = display.spinner("Thinking...");
        let mut started = false;

        let reply = chat
            .ask_streaming(backend.as_ref(), question, |token| {
                if !started {
                    pb.finish_and_clear();
                    display.begin_answer();
                    started = true;
                }
                display.stream_token(token);
            })
            .await;

        pb.finish_and_clear();
        if reply.is_some() {
            display.end_answer();
        }
    }

    pub fn store(&self) -> &LeadStore {
        &self.store
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    /// Extracted lead awaiting review, if any
    pub fn pending(&self) -> Option<&NewLead> {
        self.pending.as_ref()
    }
}
