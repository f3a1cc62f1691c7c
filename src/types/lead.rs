//! Lead records and their closed enumerations
//!
//! A lead lives only for the session; ids are opaque strings assigned by the
//! store when the lead is added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque lead identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(String);

impl LeadId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        LeadId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used for table display
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(id: &str) -> Self {
        LeadId(id.to_string())
    }
}

impl From<String> for LeadId {
    fn from(id: String) -> Self {
        LeadId(id)
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Follow-up status of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
        }
    }

    /// The status a dashboard toggle moves to
    pub fn toggled(&self) -> Self {
        match self {
            LeadStatus::New => LeadStatus::Contacted,
            LeadStatus::Contacted => LeadStatus::New,
        }
    }

    /// Parse a case-insensitive status name
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "contacted" => Some(LeadStatus::Contacted),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a lead came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    Manual,
    Document,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Manual => "Manual",
            LeadSource::Document => "Document",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead held in the working set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Phone number or the placeholder shown when none was given
    pub fn phone_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.phone.as_deref().unwrap_or(placeholder)
    }
}

/// Candidate record submitted by the creation form or a processed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub source: LeadSource,
}

impl NewLead {
    /// Manually entered lead; a blank phone counts as absent
    pub fn manual(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.filter(|p| !p.trim().is_empty()),
            source: LeadSource::Manual,
        }
    }
}

/// Partial field set merged onto an existing lead
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Merge the present fields onto `lead`
    pub fn apply_to(self, lead: &mut Lead) {
        if let Some(name) = self.name {
            lead.name = name;
        }
        if let Some(email) = self.email {
            lead.email = email;
        }
        if let Some(phone) = self.phone {
            lead.phone = phone;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lead {
        Lead {
            id: LeadId::from("lead-1"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: LeadStatus::New,
            source: LeadSource::Manual,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(LeadStatus::New.toggled(), LeadStatus::Contacted);
        assert_eq!(LeadStatus::Contacted.toggled(), LeadStatus::New);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(LeadStatus::parse("NEW"), Some(LeadStatus::New));
        assert_eq!(LeadStatus::parse(" contacted "), Some(LeadStatus::Contacted));
        assert_eq!(LeadStatus::parse("won"), None);
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut lead = sample();
        LeadUpdate::status(LeadStatus::Contacted).apply_to(&mut lead);

        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.name, "Ada");
        assert_eq!(lead.email, "ada@example.com");
    }

    #[test]
    fn test_update_can_clear_phone() {
        let mut lead = sample();
        lead.phone = Some("123".to_string());

        let update = LeadUpdate {
            phone: Some(None),
            ..Default::default()
        };
        update.apply_to(&mut lead);
        assert!(lead.phone.is_none());
    }

    #[test]
    fn test_manual_lead_blank_phone() {
        let lead = NewLead::manual("Ada", "ada@example.com", Some("  ".to_string()));
        assert!(lead.phone.is_none());
        assert_eq!(lead.source, LeadSource::Manual);
    }

    #[test]
    fn test_short_id() {
        let id = LeadId::generate();
        assert_eq!(id.short().len(), 8);
        assert_eq!(LeadId::from("ab").short(), "ab");
    }
}
