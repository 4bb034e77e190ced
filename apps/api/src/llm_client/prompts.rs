// Prompts owned by the client itself rather than by a feature module.
// Proposal prompts live in generation/prompts.rs.

/// Prompt used to check that an API key is accepted.
pub const KEY_CHECK_PROMPT: &str = "Hello";

/// Token budget for the key check call.
pub const KEY_CHECK_MAX_TOKENS: u32 = 5;
