pub mod comment_likes;
pub mod comments;
pub mod course_taken;

pub use comment_likes::{CommentLikeStore, PgCommentLikeRepository};
pub use comments::{CommentStore, PgCommentRepository};
pub use course_taken::{CourseTakenStore, PgCourseTakenRepository, ACTIVE_COMPLETION_THRESHOLD};
