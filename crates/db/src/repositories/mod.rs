//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Module-record repositories
//! are scoped by `project_id`; callers check project ownership first.

pub mod comment_repo;
pub mod deployment_repo;
pub mod note_repo;
pub mod post_repo;
pub mod prd_repo;
pub mod project_repo;
pub mod prompt_repo;
pub mod rate_limit_repo;
pub mod roadmap_repo;
pub mod secret_repo;
pub mod task_repo;
pub mod user_repo;
pub mod vote_repo;

pub use comment_repo::CommentRepo;
pub use deployment_repo::DeploymentRepo;
pub use note_repo::NoteRepo;
pub use post_repo::PostRepo;
pub use prd_repo::PrdRepo;
pub use project_repo::ProjectRepo;
pub use prompt_repo::PromptRepo;
pub use rate_limit_repo::{PgRateLimiter, RateLimitRepo};
pub use roadmap_repo::RoadmapRepo;
pub use secret_repo::SecretRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;

/// Lock the parent project row and return the next free `position` in
/// `table` for that project.
///
/// Must run inside a transaction so concurrent appends serialise on the
/// project row.
pub(crate) async fn next_position(
    conn: &mut sqlx::PgConnection,
    table: &str,
    project_id: vlab_core::types::DbId,
) -> Result<i32, sqlx::Error> {
    sqlx::query("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    let query =
        format!("SELECT COALESCE(MAX(position) + 1, 0) FROM {table} WHERE project_id = $1");
    sqlx::query_scalar::<_, i32>(&query)
        .bind(project_id)
        .fetch_one(&mut *conn)
        .await
}
