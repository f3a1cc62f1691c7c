//! Display manager for the REPL terminal UI
//!
//! Lead table, dashboard counters, chat transcript and spinners.

use crate::leads::{LeadCounts, StatusFilter};
use crate::types::{ChatMessage, Lead, LeadStatus, NewLead, Sender};
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Display manager for REPL UI
pub struct DisplayManager {
    show_progress: bool,
    tick_interval: Duration,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new() -> Self {
        DisplayManager {
            show_progress: true,
            tick_interval: Duration::from_millis(100),
        }
    }

    /// Disable spinners (quiet mode, non-interactive output)
    pub fn without_progress() -> Self {
        DisplayManager {
            show_progress: false,
            ..Self::new()
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, chat_enabled: bool) {
        let width = 64;
        let chat = if chat_enabled { "Enabled" } else { "Disabled (no API key)" };
        let title = format!("  LeadPilot {} - Lead Manager & AI Assistant", version);
        let info = format!("  Model: {} | Chat: {}", model, chat);

        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Type {} for commands, {} to quit\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Prompt text for the current mode
    pub fn prompt(&self, chatting_with: Option<&str>) -> String {
        match chatting_with {
            Some(name) => format!("leadpilot [{}]> ", name),
            None => "leadpilot> ".to_string(),
        }
    }

    /// Display help information
    pub fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/leads [all|new|contacted]", "Show the lead dashboard"),
            ("/add name | email [| phone]", "Add a lead manually"),
            ("/upload <file.pdf|file.docx>", "Extract a lead from a document"),
            ("/edit <name|email|phone> <value>", "Correct the extracted lead"),
            ("/confirm, /discard", "Add or drop the extracted lead"),
            ("/toggle <id>", "Mark a lead Contacted / New"),
            ("/delete <id>", "Remove a lead"),
            ("/chat <id>", "Ask the AI assistant about a lead"),
            ("/back", "Leave the chat"),
            ("/stats", "Show lead counters"),
            ("/clear, /cls", "Clear screen"),
            ("/help, /h", "Show this help message"),
            ("/exit, /quit, /q", "Exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<34} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Ids may be shortened to any unique prefix");
        println!("  - While chatting, type your question directly (no / prefix)");
        println!();
    }

    /// Render the lead table
    pub fn show_leads(&self, leads: &[&Lead], filter: StatusFilter, counts: LeadCounts) {
        println!(
            "\n{}  {}  {}  {}",
            "Lead Dashboard".bold().cyan(),
            format!("All {}", counts.total).dimmed(),
            format!("New {}", counts.new).dimmed(),
            format!("Contacted {}", counts.contacted).dimmed()
        );
        println!("{}", "=".repeat(96).cyan());

        if leads.is_empty() {
            println!("{}", "No leads found".yellow());
            match filter {
                StatusFilter::All => println!("Add your first lead to get started"),
                StatusFilter::Only(status) => {
                    println!("No {} leads", status.as_str().to_lowercase())
                }
            }
            println!();
            return;
        }

        println!(
            "  {:<10} {:<20} {:<28} {:<20} {:<10} {}",
            "ID".bold(),
            "Name".bold(),
            "Email".bold(),
            "Phone".bold(),
            "Status".bold(),
            "Source".bold()
        );
        for lead in leads {
            let status = match lead.status {
                LeadStatus::New => lead.status.as_str().green(),
                LeadStatus::Contacted => lead.status.as_str().blue(),
            };
            println!(
                "  {:<10} {:<20} {:<28} {:<20} {:<10} {}",
                lead.id.short().cyan(),
                lead.name,
                lead.email.dimmed(),
                lead.phone_or("N/A"),
                status,
                lead.source.as_str().dimmed()
            );
        }
        println!();
    }

    /// Prefilled fields of an extracted lead awaiting confirmation
    pub fn show_review(&self, candidate: &NewLead) {
        println!("\n{}", "Review extracted lead:".bold().cyan());
        println!("  {:<8} {}", "Name:", candidate.name);
        println!("  {:<8} {}", "Email:", candidate.email);
        println!(
            "  {:<8} {}",
            "Phone:",
            candidate.phone.as_deref().unwrap_or("Not provided")
        );
        println!(
            "Use {} to correct a field, then {} or {}\n",
            "/edit <field> <value>".green(),
            "/confirm".green(),
            "/discard".green()
        );
    }

    /// Dashboard counters
    pub fn show_stats(&self, counts: LeadCounts) {
        println!("\n{}", "Lead Stats:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());
        println!("  {:<20} {}", "Total Leads:", counts.total.to_string().bold());
        println!("  {:<20} {}", "New:", counts.new);
        println!("  {:<20} {}", "Contacted:", counts.contacted.to_string().green());
        println!();
    }

    /// Header shown when a chat opens
    pub fn show_chat_header(&self, lead: &Lead) {
        println!("\n{}", "AI Lead Assistant".bold().cyan());
        println!(
            "{}",
            format!(
                "{} | {} | {} | {} | Added {}",
                lead.name,
                lead.email,
                lead.phone_or("Not provided"),
                lead.status,
                lead.created_at.format("%Y-%m-%d")
            )
            .dimmed()
        );
        println!("{}", "=".repeat(60).cyan());
        println!("Type {} to return to the dashboard\n", "/back".green());
    }

    /// Print a complete chat message
    pub fn show_message(&self, message: &ChatMessage) {
        match message.sender {
            Sender::Assistant => println!("{} {}", "AI:".bold().magenta(), message.text),
            Sender::User => println!("{} {}", "You:".bold().green(), message.text),
        }
    }

    /// Label printed before a streamed answer
    pub fn begin_answer(&self) {
        print!("{} ", "AI:".bold().magenta());
        let _ = io::stdout().flush();
    }

    /// Print one streamed fragment
    pub fn stream_token(&self, token: &str) {
        print!("{}", token);
        let _ = io::stdout().flush();
    }

    /// Close a streamed answer
    pub fn end_answer(&self) {
        println!("\n");
    }

    /// Spinner with a message; hidden when progress display is off
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.tick_interval);
        pb
    }

    /// Show success message
    pub fn show_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message.green());
    }

    /// Show warning message
    pub fn show_warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message.yellow());
    }

    /// Show error message
    pub fn show_error(&self, message: &str) {
        println!("{} {}", "✗".red(), message.red());
    }

    /// Clear the terminal
    pub fn clear_screen(&self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0));
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_by_mode() {
        let display = DisplayManager::new();
        assert_eq!(display.prompt(None), "leadpilot> ");
        assert_eq!(display.prompt(Some("Ada")), "leadpilot [Ada]> ");
    }

    #[test]
    fn test_hidden_spinner_without_progress() {
        let display = DisplayManager::without_progress();
        let pb = display.spinner("working");
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
