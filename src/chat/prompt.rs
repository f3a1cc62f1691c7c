//! Lead-context prompt sent with every question

use crate::types::Lead;

/// Placeholder for a lead without a phone number
pub const NO_PHONE: &str = "Not provided";

/// Build the prompt for a question about `lead`
pub fn build_lead_prompt(lead: &Lead, question: &str) -> String {
    format!(
        r#"
You are an AI assistant helping a sales or outreach person decide how to follow up with a potential lead.
Use the information below to provide a concise and helpful recommendation, in a friendly tone.

Lead Info:
- Name: {name}
- Email: {email}
- Phone: {phone}
- Status: {status}
- Source: {source}
- Date Added: {added}

User's Question:
{question}

DO NOT FORGET TO KEEP IT CONCISE AND SHORT
"#,
        name = lead.name,
        email = lead.email,
        phone = lead.phone_or(NO_PHONE),
        status = lead.status,
        source = lead.source,
        added = lead.created_at.format("%Y-%m-%d"),
        question = question,
    )
}

/// Opening assistant message of a conversation
pub fn greeting(lead: &Lead) -> String {
    format!(
        "Hi! I'm your AI assistant. I can help you follow up with {}. What would you like to know?",
        lead.name
    )
}
