//! Transfer objects returned to callers.
//!
//! Comments hydrate into a tree exactly two levels deep: a top-level
//! `CommentDto` carries its direct responses, and a `ResponseDto` may
//! carry its parent comment (whose `responses` hold the siblings).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{CourseTaken, Part, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDto {
    pub id: Uuid,
    pub title: String,
}

impl From<Part> for PartDto {
    fn from(part: Part) -> Self {
        Self {
            id: part.id,
            title: part.title,
        }
    }
}

/// A top-level comment with its responses and likes hydrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub text: String,
    pub user: UserDto,
    pub part: PartDto,
    pub liked_by: Vec<UserDto>,
    pub responses: Vec<ResponseDto>,
    pub created_at: DateTime<Utc>,
}

/// A response with its likes hydrated; `parent_comment` is populated when
/// the response is the entry point of the assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDto {
    pub id: Uuid,
    pub text: String,
    pub user: UserDto,
    pub part: PartDto,
    pub liked_by: Vec<UserDto>,
    pub parent_comment: Option<Box<CommentDto>>,
    pub created_at: DateTime<Utc>,
}

/// Certificate view over a completed course engagement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateDto {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub completion: i32,
    pub rating: Option<i16>,
    pub issued_at: DateTime<Utc>,
}

impl From<CourseTaken> for CertificateDto {
    fn from(taken: CourseTaken) -> Self {
        Self {
            user_id: taken.user_id,
            course_id: taken.course_id,
            completion: taken.completion,
            rating: taken.rating,
            issued_at: taken.updated_at,
        }
    }
}
