pub const ENRICHER_SYSTEM_PROMPT: &str = "You are a sales intelligence analyst. Your job is to find \
the DIRECT contact details (email and phone) of a person at a given company. Only propose \
information that can be verified, or a likely email pattern for the company domain. Put anything \
uncertain in notes and rate your confidence in match_confidence (high, medium or low).";

/// Grounded calls cannot use a response schema, so the shape is spelled out in the prompt.
pub const GROUNDED_OUTPUT_INSTRUCTIONS: &str = "Answer with a single JSON object and nothing else. \
Keys: first_name, last_name, company (all required), title, email, phone, website, sector, notes, \
match_confidence. Use an empty string when a value is unknown.";

pub fn user_prompt(text: &str) -> String {
    format!("FIND DIRECT CONTACT DETAILS: \"{}\"", text.trim())
}
