use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Engagement status of a user on a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_taken_status", rename_all = "UPPERCASE")]
pub enum CourseTakenStatus {
    Taken,
    Completed,
}

/// CourseTaken entity - a user's progress record on a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseTaken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: CourseTakenStatus,
    /// Completion percentage, 0 to 100
    pub completion: i32,
    /// Rating given after completion (1 to 5), if any
    pub rating: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseTaken {
    /// A certificate exists iff the course is completed end to end.
    pub fn has_certificate(&self) -> bool {
        self.status == CourseTakenStatus::Completed && self.completion == 100
    }
}

/// Comment entity - a comment or single-level response on a course part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub part_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    /// None for top-level comments, Some for responses
    pub parent_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_response(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}

/// Payload for inserting a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub part_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub parent_comment_id: Option<Uuid>,
}

/// CommentLike entity - presence-only like relation between a user and a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentLike {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Per-course engagement frequency row for dashboard aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseCompletionStat {
    /// Course title; None when the course row is missing (LEFT JOIN)
    pub title: Option<String>,
    pub frequency: i64,
}

/// Sort direction for aggregate queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// User entity, resolved through an external user module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}

/// Course part entity, resolved through an external course module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: Uuid,
    pub title: String,
}
