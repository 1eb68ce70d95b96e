//! Lookup contracts for entities owned by other modules.
//!
//! Users and course parts live outside this service; callers inject
//! implementations backed by whatever transport those modules expose.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{Part, User};
use crate::error::ServiceResult;

#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Resolve a user by id; fails NotFound when absent.
    async fn find_by_id(&self, user_id: Uuid) -> ServiceResult<User>;
}

#[async_trait]
pub trait PartProvider: Send + Sync {
    /// Resolve a course part by id; fails NotFound when absent.
    async fn find_by_id(&self, part_id: Uuid) -> ServiceResult<Part>;
}
