//! Command parser for REPL built-in commands

use crate::leads::StatusFilter;
use std::path::PathBuf;

/// Field of a lead under review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    Name,
    Email,
    Phone,
}

impl LeadField {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "name" => Some(LeadField::Name),
            "email" => Some(LeadField::Email),
            "phone" => Some(LeadField::Phone),
            _ => None,
        }
    }
}

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Leads {
        filter: StatusFilter,
    },
    Add {
        name: String,
        email: String,
        phone: Option<String>,
    },
    Upload {
        path: PathBuf,
    },
    Edit {
        field: LeadField,
        value: String,
    },
    Confirm,
    Discard,
    Toggle {
        id: String,
    },
    Delete {
        id: String,
    },
    Chat {
        id: String,
    },
    Back,
    Stats,
    Clear,
    Exit,
    Usage {
        usage: &'static str,
    },
    Unknown {
        input: String,
    },
}

const LEADS_USAGE: &str = "/leads [all|new|contacted]";
const UPLOAD_USAGE: &str = "/upload <file.pdf|file.docx>";
const EDIT_USAGE: &str = "/edit <name|email|phone> <value>";
const ADD_USAGE: &str = "/add name | email [| phone]";

/// Check whether input is a slash command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Command::Unknown {
            input: input.to_string(),
        };
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    match name.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "leads" | "ls" => {
            if rest.is_empty() {
                return Command::Leads {
                    filter: StatusFilter::All,
                };
            }
            match StatusFilter::parse(rest) {
                Some(filter) => Command::Leads { filter },
                None => Command::Usage { usage: LEADS_USAGE },
            }
        }
        "add" => parse_add(rest),
        "upload" => {
            if rest.is_empty() {
                Command::Usage {
                    usage: UPLOAD_USAGE,
                }
            } else {
                Command::Upload {
                    path: PathBuf::from(rest),
                }
            }
        }
        "edit" | "set" => parse_edit(rest),
        "confirm" | "save" => Command::Confirm,
        "discard" | "cancel" => Command::Discard,
        "toggle" | "mark" => with_id(rest, "/toggle <id>", |id| Command::Toggle { id }),
        "delete" | "rm" => with_id(rest, "/delete <id>", |id| Command::Delete { id }),
        "chat" | "interact" => with_id(rest, "/chat <id>", |id| Command::Chat { id }),
        "back" => Command::Back,
        "stats" => Command::Stats,
        "clear" | "cls" => Command::Clear,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

fn with_id(rest: &str, usage: &'static str, build: impl FnOnce(String) -> Command) -> Command {
    match rest.split_whitespace().next() {
        Some(id) => build(id.to_string()),
        None => Command::Usage { usage },
    }
}

/// `/add name | email [| phone]`
fn parse_add(rest: &str) -> Command {
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    match fields.as_slice() {
        [name, email] => Command::Add {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        },
        [name, email, phone] => Command::Add {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some(phone.to_string()).filter(|p| !p.is_empty()),
        },
        _ => Command::Usage { usage: ADD_USAGE },
    }
}

/// `/edit <field> <value>`; an empty value clears the phone
fn parse_edit(rest: &str) -> Command {
    let (field, value) = match rest.split_once(char::is_whitespace) {
        Some((field, value)) => (field, value.trim()),
        None => (rest, ""),
    };

    match LeadField::parse(field) {
        Some(field) => Command::Edit {
            field,
            value: value.to_string(),
        },
        None => Command::Usage { usage: EDIT_USAGE },
    }
}
