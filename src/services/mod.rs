pub mod comments;
pub mod progress;

pub use comments::CommentService;
pub use progress::CourseProgressService;
