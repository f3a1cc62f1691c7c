//! In-memory lead working set
//!
//! Newest leads come first. Every operation is a linear pass over the list;
//! the set only lives as long as the session.

use crate::errors::{LeadError, Result};
use crate::types::{Lead, LeadId, LeadSource, LeadStatus, LeadUpdate, NewLead};
use chrono::{Duration, Utc};
use tracing::debug;

/// Status predicate for the dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

impl StatusFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => lead.status == *status,
        }
    }

    /// Parse `all`, `new` or `contacted`
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        LeadStatus::parse(input).map(StatusFilter::Only)
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadCounts {
    pub total: usize,
    pub new: usize,
    pub contacted: usize,
}

/// Ordered list of leads, newest first
#[derive(Debug, Default)]
pub struct LeadStore {
    leads: Vec<Lead>,
}

impl LeadStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `leads` in the given order
    pub fn from_leads(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    /// Store seeded with the two demo leads
    pub fn with_sample_leads() -> Self {
        let now = Utc::now();
        let leads = vec![
            Lead {
                id: LeadId::from("1"),
                name: "Sarah Johnson".to_string(),
                email: "sarah.johnson@example.com".to_string(),
                phone: Some("+1 (555) 123-4567".to_string()),
                status: LeadStatus::New,
                source: LeadSource::Manual,
                created_at: now - Duration::days(1),
            },
            Lead {
                id: LeadId::from("2"),
                name: "Michael Chen".to_string(),
                email: "m.chen@techcorp.com".to_string(),
                phone: Some("+1 (555) 987-6543".to_string()),
                status: LeadStatus::Contacted,
                source: LeadSource::Manual,
                created_at: now - Duration::days(2),
            },
        ];
        Self { leads }
    }

    /// Validate a candidate, assign id and timestamp, and prepend it
    pub fn add(&mut self, candidate: NewLead) -> Result<&Lead> {
        if candidate.name.trim().is_empty() || candidate.email.trim().is_empty() {
            return Err(LeadError::Validation(
                "please fill in at least name and email".to_string(),
            ));
        }

        let mut id = LeadId::generate();
        while self.get(&id).is_some() {
            id = LeadId::generate();
        }

        let lead = Lead {
            id,
            name: candidate.name.trim().to_string(),
            email: candidate.email.trim().to_string(),
            phone: candidate.phone,
            status: LeadStatus::New,
            source: candidate.source,
            created_at: Utc::now(),
        };
        debug!(id = %lead.id, source = %lead.source, "lead added");

        self.leads.insert(0, lead);
        Ok(&self.leads[0])
    }

    /// Merge `update` onto the lead with `id`; false if there is none
    pub fn update(&mut self, id: &LeadId, update: LeadUpdate) -> bool {
        match self.leads.iter_mut().find(|lead| &lead.id == id) {
            Some(lead) => {
                update.apply_to(lead);
                debug!(id = %id, status = %lead.status, "lead updated");
                true
            }
            None => false,
        }
    }

    /// Flip New and Contacted; returns the new status
    pub fn toggle_status(&mut self, id: &LeadId) -> Option<LeadStatus> {
        let next = self.get(id)?.status.toggled();
        self.update(id, LeadUpdate::status(next));
        Some(next)
    }

    /// Remove and return the lead with `id`
    pub fn delete(&mut self, id: &LeadId) -> Option<Lead> {
        let position = self.leads.iter().position(|lead| &lead.id == id)?;
        let removed = self.leads.remove(position);
        debug!(id = %id, "lead deleted");
        Some(removed)
    }

    /// Leads matching `filter`, in store order
    pub fn filter(&self, filter: StatusFilter) -> Vec<&Lead> {
        self.leads.iter().filter(|lead| filter.matches(lead)).collect()
    }

    pub fn get(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| &lead.id == id)
    }

    /// Find a lead by full id or by a prefix matching exactly one lead
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Lead> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(LeadError::LeadNotFound(id_or_prefix.to_string()));
        }

        if let Some(lead) = self.get(&LeadId::from(needle)) {
            return Ok(lead);
        }

        let matches: Vec<&Lead> = self
            .leads
            .iter()
            .filter(|lead| lead.id.as_str().starts_with(needle))
            .collect();

        match matches.as_slice() {
            [lead] => Ok(*lead),
            [] => Err(LeadError::LeadNotFound(needle.to_string())),
            many => Err(LeadError::AmbiguousLeadId {
                prefix: needle.to_string(),
                matches: many.len(),
            }),
        }
    }

    pub fn counts(&self) -> LeadCounts {
        let contacted = self
            .leads
            .iter()
            .filter(|lead| lead.status == LeadStatus::Contacted)
            .count();
        LeadCounts {
            total: self.leads.len(),
            new: self.leads.len() - contacted,
            contacted,
        }
    }

    pub fn all(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> NewLead {
        NewLead::manual(name, format!("{}@example.com", name.to_lowercase()), None)
    }

    #[test]
    fn test_add_prepends() {
        let mut store = LeadStore::new();
        store.add(candidate("Ada")).unwrap();
        store.add(candidate("Grace")).unwrap();

        let names: Vec<&str> = store.all().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Grace", "Ada"]);
    }

    #[test]
    fn test_add_assigns_new_status_and_fresh_ids() {
        let mut store = LeadStore::new();
        let first = store.add(candidate("Ada")).unwrap().id.clone();
        let second = store.add(candidate("Ada")).unwrap();

        assert_eq!(second.status, LeadStatus::New);
        assert_eq!(second.source, LeadSource::Manual);
        assert_ne!(first, second.id);
    }

    #[test]
    fn test_add_requires_name_and_email() {
        let mut store = LeadStore::new();
        let missing_email = NewLead::manual("Ada", "  ", None);

        assert!(matches!(
            store.add(missing_email).unwrap_err(),
            LeadError::Validation(_)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_delete_restores_list() {
        let mut store = LeadStore::with_sample_leads();
        let before = store.all().to_vec();

        let id = store.add(candidate("Temp")).unwrap().id.clone();
        assert_eq!(store.len(), before.len() + 1);

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.name, "Temp");
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = LeadStore::with_sample_leads();
        let before = store.all().to_vec();

        let changed = store.update(
            &LeadId::from("missing"),
            LeadUpdate::status(LeadStatus::Contacted),
        );
        assert!(!changed);
        assert_eq!(store.all(), before.as_slice());
        assert!(store.delete(&LeadId::from("missing")).is_none());
    }

    #[test]
    fn test_toggle_status() {
        let mut store = LeadStore::with_sample_leads();
        let id = LeadId::from("1");

        assert_eq!(store.toggle_status(&id), Some(LeadStatus::Contacted));
        assert_eq!(store.get(&id).unwrap().status, LeadStatus::Contacted);
        assert_eq!(store.toggle_status(&id), Some(LeadStatus::New));
        assert_eq!(store.toggle_status(&LeadId::from("nope")), None);
    }

    #[test]
    fn test_filter_preserves_order_and_status() {
        let mut store = LeadStore::new();
        for name in ["A", "B", "C", "D"] {
            store.add(candidate(name)).unwrap();
        }
        let ids: Vec<LeadId> = store.all().iter().map(|l| l.id.clone()).collect();
        store.toggle_status(&ids[1]);
        store.toggle_status(&ids[3]);

        let contacted = store.filter(StatusFilter::Only(LeadStatus::Contacted));
        let names: Vec<&str> = contacted.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert!(contacted.iter().all(|l| l.status == LeadStatus::Contacted));

        assert_eq!(store.filter(StatusFilter::All).len(), 4);
    }

    #[test]
    fn test_counts() {
        let store = LeadStore::with_sample_leads();
        let counts = store.counts();

        assert_eq!(counts.total, 2);
        assert_eq!(counts.new, 1);
        assert_eq!(counts.contacted, 1);
        assert_eq!(
            counts.contacted,
            store.filter(StatusFilter::Only(LeadStatus::Contacted)).len()
        );
    }

    #[test]
    fn test_resolve_by_prefix() {
        let mut store = LeadStore::new();
        let id = store.add(candidate("Ada")).unwrap().id.clone();

        assert_eq!(store.resolve(id.as_str()).unwrap().id, id);
        assert_eq!(store.resolve(id.short()).unwrap().id, id);
        assert!(matches!(
            store.resolve("zzzz-not-there").unwrap_err(),
            LeadError::LeadNotFound(_)
        ));
    }

    #[test]
    fn test_resolve_ambiguous() {
        let sample = LeadStore::with_sample_leads();
        let mut leads = sample.all().to_vec();
        leads[0].id = LeadId::from("ab-1");
        leads[1].id = LeadId::from("ab-2");
        let store = LeadStore::from_leads(leads);

        assert!(matches!(
            store.resolve("ab").unwrap_err(),
            LeadError::AmbiguousLeadId { matches: 2, .. }
        ));
        assert_eq!(store.resolve("ab-2").unwrap().name, "Michael Chen");
        assert!(matches!(
            store.resolve("  ").unwrap_err(),
            LeadError::LeadNotFound(_)
        ));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("ALL"), Some(StatusFilter::All));
        assert_eq!(
            StatusFilter::parse("new"),
            Some(StatusFilter::Only(LeadStatus::New))
        );
        assert_eq!(StatusFilter::parse("lost"), None);
    }
}
