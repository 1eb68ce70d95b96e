use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Comment, NewComment};
use crate::error::ServiceResult;

const COMMENT_COLUMNS: &str =
    "id, part_id, user_id, text, parent_comment_id, created_at, updated_at";

/// Data access for comments and their single-level responses
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, comment: NewComment) -> ServiceResult<Comment>;

    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Comment>>;

    /// Top-level comments on a part, oldest first
    async fn find_top_level_by_part(&self, part_id: Uuid) -> ServiceResult<Vec<Comment>>;

    /// Direct responses to a comment, oldest first
    async fn find_responses(&self, parent_comment_id: Uuid) -> ServiceResult<Vec<Comment>>;
}

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentRepository {
    async fn insert(&self, comment: NewComment) -> ServiceResult<Comment> {
        let query = format!(
            r#"
            INSERT INTO comments (part_id, user_id, text, parent_comment_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#,
        );

        let saved = sqlx::query_as::<_, Comment>(&query)
            .bind(comment.part_id)
            .bind(comment.user_id)
            .bind(comment.text)
            .bind(comment.parent_comment_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Comment>> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE id = $1
            "#,
        );

        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn find_top_level_by_part(&self, part_id: Uuid) -> ServiceResult<Vec<Comment>> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE part_id = $1 AND parent_comment_id IS NULL
            ORDER BY created_at ASC
            "#,
        );

        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(part_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn find_responses(&self, parent_comment_id: Uuid) -> ServiceResult<Vec<Comment>> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE parent_comment_id = $1
            ORDER BY created_at ASC
            "#,
        );

        let responses = sqlx::query_as::<_, Comment>(&query)
            .bind(parent_comment_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(responses)
    }
}
