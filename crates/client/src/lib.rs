//! Typed client for the VLab API.
//!
//! [`ApiClient`] speaks HTTP; the stores wrap it behind the [`VlabApi`]
//! trait and keep one snapshot each together with a
//! [`LoadState`](vlab_core::load_state::LoadState). Store fields change
//! only through the stores' own async actions.

pub mod api;
pub mod auth_store;
pub mod error;
pub mod models;
pub mod project_store;
pub mod workspace_store;

#[cfg(test)]
pub(crate) mod fake;

pub use api::{ApiClient, VlabApi};
pub use auth_store::AuthStore;
pub use error::ClientError;
pub use project_store::ProjectStore;
pub use workspace_store::WorkspaceStore;
