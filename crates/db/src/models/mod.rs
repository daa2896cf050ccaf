//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where the record is editable

pub mod community;
pub mod deployment;
pub mod note;
pub mod prd;
pub mod project;
pub mod prompt;
pub mod roadmap;
pub mod secret;
pub mod task;
pub mod user;
