use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::CommentLike;
use crate::error::ServiceResult;

/// Data access for the user-liked-comment relation.
///
/// The relation is presence-only and carries no uniqueness: liking the
/// same comment twice inserts two rows.
#[async_trait]
pub trait CommentLikeStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, comment_id: Uuid) -> ServiceResult<CommentLike>;

    /// All likes on a comment, oldest first
    async fn find_by_comment(&self, comment_id: Uuid) -> ServiceResult<Vec<CommentLike>>;
}

/// PostgreSQL-backed comment like repository
#[derive(Clone)]
pub struct PgCommentLikeRepository {
    pool: PgPool,
}

impl PgCommentLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentLikeStore for PgCommentLikeRepository {
    async fn insert(&self, user_id: Uuid, comment_id: Uuid) -> ServiceResult<CommentLike> {
        let like = sqlx::query_as::<_, CommentLike>(
            r#"
            INSERT INTO comment_likes (user_id, comment_id)
            VALUES ($1, $2)
            RETURNING id, comment_id, user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(like)
    }

    async fn find_by_comment(&self, comment_id: Uuid) -> ServiceResult<Vec<CommentLike>> {
        let likes = sqlx::query_as::<_, CommentLike>(
            r#"
            SELECT id, comment_id, user_id, created_at
            FROM comment_likes
            WHERE comment_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(likes)
    }
}
