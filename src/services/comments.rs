/// Comment service - orchestrates comment CRUD and DTO hydration for
/// course parts.
///
/// Comments nest exactly one level: a top-level comment may receive
/// responses, a response may not. The service resolves users and parts
/// through injected providers and assembles denormalized DTO trees from
/// the comment and like stores.
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::info;
use uuid::Uuid;

use crate::domain::dto::{CommentDto, PartDto, ResponseDto, UserDto};
use crate::domain::models::{Comment, NewComment};
use crate::error::{ServiceError, ServiceResult};
use crate::providers::{PartProvider, UserProvider};
use crate::repository::{CommentLikeStore, CommentStore};

pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    likes: Arc<dyn CommentLikeStore>,
    users: Arc<dyn UserProvider>,
    parts: Arc<dyn PartProvider>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentStore>,
        likes: Arc<dyn CommentLikeStore>,
        users: Arc<dyn UserProvider>,
        parts: Arc<dyn PartProvider>,
    ) -> Self {
        Self {
            comments,
            likes,
            users,
            parts,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> ServiceResult<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))
    }

    /// All top-level comments on a part, fully hydrated
    pub async fn find_part_comments(&self, part_id: Uuid) -> ServiceResult<Vec<CommentDto>> {
        let part = self.parts.find_by_id(part_id).await?;
        let comments = self.comments.find_top_level_by_part(part.id).await?;
        try_join_all(comments.iter().map(|comment| self.map_comment(comment.id))).await
    }

    /// A single comment with its responses, hydrated
    pub async fn get_comment_responses(&self, id: Uuid) -> ServiceResult<CommentDto> {
        let comment = self.find_by_id(id).await?;
        self.map_comment(comment.id).await
    }

    pub async fn add_comment(
        &self,
        part_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> ServiceResult<CommentDto> {
        if text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }

        let (user, part) = tokio::try_join!(
            self.users.find_by_id(user_id),
            self.parts.find_by_id(part_id),
        )?;

        let comment = self
            .comments
            .insert(NewComment {
                part_id: part.id,
                user_id: user.id,
                text: text.to_string(),
                parent_comment_id: None,
            })
            .await?;

        info!(comment_id = %comment.id, part_id = %part.id, "comment created");

        self.map_comment(comment.id).await
    }

    pub async fn like_comment(&self, id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let (user, comment) =
            tokio::try_join!(self.users.find_by_id(user_id), self.find_by_id(id))?;

        // Presence-only relation; repeated likes insert repeated rows.
        self.likes.insert(user.id, comment.id).await?;

        Ok(())
    }

    pub async fn add_comment_response(
        &self,
        id: Uuid,
        part_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> ServiceResult<ResponseDto> {
        if text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Response text cannot be empty".to_string(),
            ));
        }

        let (user, part, comment) = tokio::try_join!(
            self.users.find_by_id(user_id),
            self.parts.find_by_id(part_id),
            self.find_by_id(id),
        )?;

        if comment.is_response() {
            return Err(ServiceError::Validation(
                "A response cannot have other responses".to_string(),
            ));
        }

        let saved = self
            .comments
            .insert(NewComment {
                part_id: part.id,
                user_id: user.id,
                text: text.to_string(),
                parent_comment_id: Some(comment.id),
            })
            .await?;

        info!(response_id = %saved.id, comment_id = %comment.id, "response created");

        self.map_response(saved.id).await
    }

    /// Reload a comment and assemble its two-level DTO: user, part,
    /// likes, and each direct response with its own likes.
    pub async fn map_comment(&self, comment_id: Uuid) -> ServiceResult<CommentDto> {
        let comment = self.find_by_id(comment_id).await?;

        let (user, part) = tokio::try_join!(
            self.users.find_by_id(comment.user_id),
            self.parts.find_by_id(comment.part_id),
        )?;
        let part = PartDto::from(part);

        let (liked_by, responses) = tokio::try_join!(
            self.liked_by(comment.id),
            self.comments.find_responses(comment.id),
        )?;

        let responses = try_join_all(
            responses
                .iter()
                .map(|response| self.hydrate_response(response, &part)),
        )
        .await?;

        Ok(CommentDto {
            id: comment.id,
            text: comment.text.clone(),
            user: UserDto::from(user),
            part,
            liked_by,
            responses,
            created_at: comment.created_at,
        })
    }

    /// Symmetric assembly starting from a response: hydrates the response
    /// itself plus its parent comment carrying the remaining sibling
    /// responses (the entry response excluded).
    pub async fn map_response(&self, response_id: Uuid) -> ServiceResult<ResponseDto> {
        let response = self.find_by_id(response_id).await?;
        let parent_id = response.parent_comment_id.ok_or_else(|| {
            ServiceError::Validation("Comment is not a response".to_string())
        })?;
        let parent = self.find_by_id(parent_id).await?;

        let (user, part) = tokio::try_join!(
            self.users.find_by_id(response.user_id),
            self.parts.find_by_id(response.part_id),
        )?;
        let part = PartDto::from(part);

        let siblings = self.comments.find_responses(parent.id).await?;
        let siblings = try_join_all(
            siblings
                .iter()
                .filter(|sibling| sibling.id != response.id)
                .map(|sibling| self.hydrate_response(sibling, &part)),
        )
        .await?;

        let (parent_user, parent_liked_by, liked_by) = tokio::try_join!(
            self.users.find_by_id(parent.user_id),
            self.liked_by(parent.id),
            self.liked_by(response.id),
        )?;

        let parent_dto = CommentDto {
            id: parent.id,
            text: parent.text.clone(),
            user: UserDto::from(parent_user),
            part: part.clone(),
            liked_by: parent_liked_by,
            responses: siblings,
            created_at: parent.created_at,
        };

        Ok(ResponseDto {
            id: response.id,
            text: response.text.clone(),
            user: UserDto::from(user),
            part,
            liked_by,
            parent_comment: Some(Box::new(parent_dto)),
            created_at: response.created_at,
        })
    }

    /// Users who liked a comment, hydrated to DTOs
    async fn liked_by(&self, comment_id: Uuid) -> ServiceResult<Vec<UserDto>> {
        let likes = self.likes.find_by_comment(comment_id).await?;
        let users = try_join_all(likes.iter().map(|like| self.users.find_by_id(like.user_id)))
            .await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    async fn hydrate_response(
        &self,
        response: &Comment,
        part: &PartDto,
    ) -> ServiceResult<ResponseDto> {
        let (user, liked_by) = tokio::try_join!(
            self.users.find_by_id(response.user_id),
            self.liked_by(response.id),
        )?;

        Ok(ResponseDto {
            id: response.id,
            text: response.text.clone(),
            user: UserDto::from(user),
            part: part.clone(),
            liked_by,
            parent_comment: None,
            created_at: response.created_at,
        })
    }
}
