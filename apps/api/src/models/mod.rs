pub mod proposal;
pub mod user;
