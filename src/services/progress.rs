/// Course progress service - engagement lifecycle from start to
/// certificate.
///
/// A record starts as TAKEN with completion 0, moves forward through
/// progress updates, and becomes terminal as COMPLETED when completion
/// reaches 100. A certificate exists iff a record is COMPLETED at 100.
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::dto::CertificateDto;
use crate::domain::models::{CourseTaken, CourseTakenStatus};
use crate::error::{ServiceError, ServiceResult};
use crate::providers::UserProvider;
use crate::repository::CourseTakenStore;

pub struct CourseProgressService {
    store: Arc<dyn CourseTakenStore>,
    users: Arc<dyn UserProvider>,
}

impl CourseProgressService {
    pub fn new(store: Arc<dyn CourseTakenStore>, users: Arc<dyn UserProvider>) -> Self {
        Self { store, users }
    }

    pub async fn start_course(&self, user_id: Uuid, course_id: Uuid) -> ServiceResult<CourseTaken> {
        let user = self.users.find_by_id(user_id).await?;

        if self
            .store
            .find_by_user_and_course(user.id, course_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Validation(
                "Course already started by this user".to_string(),
            ));
        }

        let taken = self.store.start(user.id, course_id).await?;
        info!(user_id = %user.id, course_id = %course_id, "course started");

        Ok(taken)
    }

    pub async fn update_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completion: i32,
    ) -> ServiceResult<CourseTaken> {
        if !(0..=100).contains(&completion) {
            return Err(ServiceError::Validation(
                "Completion must be between 0 and 100".to_string(),
            ));
        }

        let current = self
            .store
            .find_by_user_and_course(user_id, course_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Course engagement not found".to_string()))?;

        // COMPLETED is terminal
        if current.status == CourseTakenStatus::Completed {
            return Err(ServiceError::Validation(
                "Course already completed".to_string(),
            ));
        }

        let status = if completion == 100 {
            CourseTakenStatus::Completed
        } else {
            CourseTakenStatus::Taken
        };

        let updated = self
            .store
            .set_progress(user_id, course_id, completion, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Course engagement not found".to_string()))?;

        if updated.status == CourseTakenStatus::Completed {
            info!(user_id = %user_id, course_id = %course_id, "course completed");
        }

        Ok(updated)
    }

    pub async fn rate_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        rating: i16,
    ) -> ServiceResult<CourseTaken> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        self.store
            .find_completed_by_user_and_course(user_id, course_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation("Only completed courses can be rated".to_string())
            })?;

        self.store
            .set_rating(user_id, course_id, rating)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Course engagement not found".to_string()))
    }

    pub async fn certificate(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<CertificateDto> {
        self.store
            .find_completed_by_user_and_course(user_id, course_id)
            .await?
            .map(CertificateDto::from)
            .ok_or_else(|| ServiceError::NotFound("Certificate not found".to_string()))
    }

    pub async fn certificates_for_user(
        &self,
        user_id: Uuid,
    ) -> ServiceResult<Vec<CertificateDto>> {
        let completed = self.store.find_certificates_by_user(user_id).await?;
        Ok(completed.into_iter().map(CertificateDto::from).collect())
    }
}
