use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{CourseCompletionStat, CourseTaken, CourseTakenStatus, SortOrder};
use crate::error::ServiceResult;

/// Minimum completion percentage for a user to count as active
pub const ACTIVE_COMPLETION_THRESHOLD: i32 = 30;

const COURSE_TAKEN_COLUMNS: &str =
    "id, user_id, course_id, status, completion, rating, created_at, updated_at";

/// Data access for CourseTaken records.
///
/// Absence is never an error: lookups return `None`/empty and counts
/// return zero. Callers decide whether absence is exceptional.
#[async_trait]
pub trait CourseTakenStore: Send + Sync {
    /// Insert a fresh engagement row (status TAKEN, completion 0)
    async fn start(&self, user_id: Uuid, course_id: Uuid) -> ServiceResult<CourseTaken>;

    /// Update completion and status; None when no row matches
    async fn set_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completion: i32,
        status: CourseTakenStatus,
    ) -> ServiceResult<Option<CourseTaken>>;

    /// Record the user's rating; None when no row matches
    async fn set_rating(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        rating: i16,
    ) -> ServiceResult<Option<CourseTaken>>;

    async fn find_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>>;

    async fn find_by_course(&self, course_id: Uuid) -> ServiceResult<Vec<CourseTaken>>;

    /// First match for the pair, any status
    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>>;

    /// Exact COMPLETED + completion=100 match
    async fn find_completed_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>>;

    /// Same as completed lookup, additionally requiring a rating
    async fn find_completed_with_rating_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>>;

    /// Certificate lookup: status COMPLETED for the pair
    async fn find_certificate_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>>;

    async fn find_certificates_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>>;

    /// Number of rows with status COMPLETED
    async fn count_certificates(&self) -> ServiceResult<i64>;

    /// Distinct users with completion >= ACTIVE_COMPLETION_THRESHOLD
    async fn count_active_users(&self) -> ServiceResult<i64>;

    /// Distinct users holding at least one TAKEN row
    async fn count_users_with_taken_courses(&self) -> ServiceResult<i64>;

    /// Distinct users holding at least one COMPLETED row
    async fn count_users_with_completed_courses(&self) -> ServiceResult<i64>;

    /// Distinct users regardless of status
    async fn count_distinct_users(&self) -> ServiceResult<i64>;

    /// Per-course engagement counts joined to course titles, ordered by
    /// frequency with a caller-supplied limit
    async fn courses_by_completion_frequency(
        &self,
        order: SortOrder,
        limit: i64,
    ) -> ServiceResult<Vec<CourseCompletionStat>>;
}

/// PostgreSQL-backed CourseTaken repository
#[derive(Clone)]
pub struct PgCourseTakenRepository {
    pool: PgPool,
}

impl PgCourseTakenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseTakenStore for PgCourseTakenRepository {
    async fn start(&self, user_id: Uuid, course_id: Uuid) -> ServiceResult<CourseTaken> {
        let query = format!(
            r#"
            INSERT INTO course_taken (user_id, course_id, status, completion)
            VALUES ($1, $2, 'TAKEN', 0)
            RETURNING {COURSE_TAKEN_COLUMNS}
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn set_progress(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        completion: i32,
        status: CourseTakenStatus,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            UPDATE course_taken
            SET completion = $3, status = $4, updated_at = NOW()
            WHERE user_id = $1 AND course_id = $2
            RETURNING {COURSE_TAKEN_COLUMNS}
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(completion)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn set_rating(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        rating: i16,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            UPDATE course_taken
            SET rating = $3, updated_at = NOW()
            WHERE user_id = $1 AND course_id = $2
            RETURNING {COURSE_TAKEN_COLUMNS}
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(rating)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn find_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        );

        let rows = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_course(&self, course_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE course_id = $1
            ORDER BY created_at ASC
            "#,
        );

        let rows = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1 AND course_id = $2
            LIMIT 1
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn find_completed_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1 AND course_id = $2
              AND status = 'COMPLETED' AND completion = 100
            LIMIT 1
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn find_completed_with_rating_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1 AND course_id = $2
              AND status = 'COMPLETED' AND completion = 100
              AND rating IS NOT NULL
            LIMIT 1
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn find_certificate_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> ServiceResult<Option<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1 AND course_id = $2 AND status = 'COMPLETED'
            LIMIT 1
            "#,
        );

        let taken = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(taken)
    }

    async fn find_certificates_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<CourseTaken>> {
        let query = format!(
            r#"
            SELECT {COURSE_TAKEN_COLUMNS}
            FROM course_taken
            WHERE user_id = $1 AND status = 'COMPLETED'
            ORDER BY updated_at ASC
            "#,
        );

        let rows = sqlx::query_as::<_, CourseTaken>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn count_certificates(&self) -> ServiceResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM course_taken WHERE status = 'COMPLETED'")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn count_active_users(&self) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM course_taken WHERE completion >= $1",
        )
        .bind(ACTIVE_COMPLETION_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_users_with_taken_courses(&self) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM course_taken WHERE status = 'TAKEN'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_users_with_completed_courses(&self) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM course_taken WHERE status = 'COMPLETED'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_distinct_users(&self) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM course_taken")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn courses_by_completion_frequency(
        &self,
        order: SortOrder,
        limit: i64,
    ) -> ServiceResult<Vec<CourseCompletionStat>> {
        let query = format!(
            r#"
            SELECT c.title AS title, COUNT(*) AS frequency
            FROM course_taken ct
            LEFT JOIN courses c ON c.id = ct.course_id
            GROUP BY ct.course_id, c.title
            ORDER BY frequency {}
            LIMIT $1
            "#,
            order.as_sql()
        );

        let stats = sqlx::query_as::<_, CourseCompletionStat>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(stats)
    }
}
