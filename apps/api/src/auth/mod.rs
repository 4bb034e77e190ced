// Accounts, sessions and the caller's stored LLM key.
// Session cookies are signed JWTs; the API-key cookie is AES-GCM sealed.

pub mod cookies;
pub mod crypto;
pub mod current_user;
pub mod handlers;
pub mod password;
pub mod session;
pub mod store;
