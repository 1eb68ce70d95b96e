#![allow(dead_code)]

//! In-memory store and provider implementations for service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use course_service::domain::models::{
    Comment, CommentLike, CourseCompletionStat, CourseTaken, CourseTakenStatus, NewComment, Part,
    SortOrder, User,
};
use course_service::error::{ServiceError, ServiceResult};
use course_service::providers::{PartProvider, UserProvider};
use course_service::repository::{
    CommentLikeStore, CommentStore, CourseTakenStore, ACTIVE_COMPLETION_THRESHOLD,
};

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub fn add(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().insert(
            id,
            User {
                id,
                name: name.to_string(),
            },
        );
        id
    }
}

#[async_trait]
impl UserProvider for InMemoryUsers {
    async fn find_by_id(&self, user_id: Uuid) -> ServiceResult<User> {
        self.users
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryParts {
    parts: Mutex<HashMap<Uuid, Part>>,
}

impl InMemoryParts {
    pub fn add(&self, title: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.parts.lock().unwrap().insert(
            id,
            Part {
                id,
                title: title.to_string(),
            },
        );
        id
    }
}

#[async_trait]
impl PartProvider for InMemoryParts {
    async fn find_by_id(&self, part_id: Uuid) -> ServiceResult<Part> {
        self.parts
            .lock()
            .unwrap()
            .get(&part_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Part not found".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryComments {
    rows: Mutex<Vec<Comment>>,
}

#[async_trait]
impl CommentStore for InMemoryComments {
    async fn insert(&self, comment: NewComment) -> ServiceResult<Comment> {
        let now = Utc::now();
        let saved = Comment {
            id: Uuid::new_v4(),
            part_id: comment.part_id,
            user_id: comment.user_id,
            text: comment.text,
            parent_comment_id: comment.parent_comment_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> ServiceResult<Option<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_top_level_by_part(&self, part_id: Uuid) -> ServiceResult<Vec<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.part_id == part_id && c.parent_comment_id.is_none())
            .cloned()
            .collect())
    }

    async fn find_responses(&self, parent_comment_id: Uuid) -> ServiceResult<Vec<Comment>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.parent_comment_id == Some(parent_comment_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCommentLikes {
    rows: Mutex<Vec<CommentLike>>,
}

#[async_trait]
impl CommentLikeStore for InMemoryCommentLikes {
    async fn insert(&self, user_id: Uuid, comment_id: Uuid) -> ServiceResult<CommentLike> {
        let like = CommentLike {
            id: Uuid::new_v4(),
            comment_id,
            user_id,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(like.clone());
        Ok(like)
    }

    async fn find_by_comment(&self, comment_id: Uuid) -> ServiceResult<Vec<CommentLike>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.comment_id == comment_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCourseTaken {
    rows: Mutex<Vec<CourseTaken>>,
    courses: Mutex<HashMap<Uuid, String>>,
}

impl InMemoryCourseTaken {
    pub fn register_course(&self, title: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.courses.lock().unwrap().insert(id, title.to_string());
        id
    }

    /// Insert a row directly, bypassing lifecycle rules
    pub fn push_raw(&self, taken: CourseTaken) {
        self.rows.lock().unwrap().push(taken);
    }

    pub fn row(
        user_id: Uuid,
        course_id: Uuid,
        status: CourseTakenStatus,
        completion: i32,
    ) -> CourseTaken {
        let now = Utc::now();
        CourseTaken {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            status,
            completion,
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl CourseTakenStore for InMemoryCourseTaken {
    async fn start(&self, user_id: Uuid, course_id: Uuid) -> ServiceResult<CourseTaken> {
        let taken = Self::row(user_id, course_id, CourseTakenStatus::Taken, 0);
        self.rows.lock().unwrap().push(taken.clone());
        Ok(taken)
    }

    async fn set_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completion: i32,
        status: CourseTakenStatus,
    ) -> ServiceResult<Option<CourseTaken>> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.course_id == course_id);
        Ok(row.map(|r| {
            r.completion = completion;
            r.status = status;
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn set_rating(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        rating: i16,
    ) -> ServiceResult<Option<CourseTaken>> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.course_id == course_id);
        Ok(row.map(|r| {
            r.rating = Some(rating);
            r.updated_at = Utc::now();
            r.clone()
        }))
    }

    async fn find_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_course(&self, course_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.course_id == course_id)
            .cloned())
    }

    async fn find_completed_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.user_id == user_id
                    && r.course_id == course_id
                    && r.status == CourseTakenStatus::Completed
                    && r.completion == 100
            })
            .cloned())
    }

    async fn find_completed_with_rating_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.user_id == user_id
                    && r.course_id == course_id
                    && r.status == CourseTakenStatus::Completed
                    && r.completion == 100
                    && r.rating.is_some()
            })
            .cloned())
    }

    async fn find_certificate_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.user_id == user_id
                    && r.course_id == course_id
                    && r.status == CourseTakenStatus::Completed
            })
            .cloned())
    }

    async fn find_certificates_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.status == CourseTakenStatus::Completed)
            .cloned()
            .collect())
    }

    async fn count_certificates(&self) -> ServiceResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == CourseTakenStatus::Completed)
            .count() as i64)
    }

    async fn count_active_users(&self) -> ServiceResult<i64> {
        let users: HashSet<Uuid> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.completion >= ACTIVE_COMPLETION_THRESHOLD)
            .map(|r| r.user_id)
            .collect();
        Ok(users.len() as i64)
    }

    async fn count_users_with_taken_courses(&self) -> ServiceResult<i64> {
        let users: HashSet<Uuid> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == CourseTakenStatus::Taken)
            .map(|r| r.user_id)
            .collect();
        Ok(users.len() as i64)
    }

    async fn count_users_with_completed_courses(&self) -> ServiceResult<i64> {
        let users: HashSet<Uuid> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status == CourseTakenStatus::Completed)
            .map(|r| r.user_id)
            .collect();
        Ok(users.len() as i64)
    }

    async fn count_distinct_users(&self) -> ServiceResult<i64> {
        let users: HashSet<Uuid> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.user_id)
            .collect();
        Ok(users.len() as i64)
    }

    async fn courses_by_completion_frequency(
        &self,
        order: SortOrder,
        limit: i64,
    ) -> ServiceResult<Vec<CourseCompletionStat>> {
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for row in self.rows.lock().unwrap().iter() {
            *counts.entry(row.course_id).or_insert(0) += 1;
        }

        let titles = self.courses.lock().unwrap();
        let mut stats: Vec<CourseCompletionStat> = counts
            .into_iter()
            .map(|(course_id, frequency)| CourseCompletionStat {
                title: titles.get(&course_id).cloned(),
                frequency,
            })
            .collect();

        match order {
            SortOrder::Asc => stats.sort_by_key(|s| s.frequency),
            SortOrder::Desc => stats.sort_by_key(|s| std::cmp::Reverse(s.frequency)),
        }
        stats.truncate(limit as usize);

        Ok(stats)
    }
}
