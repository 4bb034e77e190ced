// Proposal and cover-letter generation.
// Remote calls go through llm_client; the template generator needs no network.

pub mod generator;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod template;
