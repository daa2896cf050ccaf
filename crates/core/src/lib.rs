//! Domain rules shared by the VLab server, repositories and client.
//!
//! Nothing in this crate performs I/O. The API and repository layers call
//! into it for validation, sanitisation, LLM output normalisation, rate-limit
//! window math, comment threading and the load-state machine used by the
//! client stores.

pub mod community;
pub mod error;
pub mod fallback;
pub mod generation;
pub mod load_state;
pub mod normalize;
pub mod project;
pub mod rate_limit;
pub mod sanitize;
pub mod schema;
pub mod types;
pub mod workspace;
