/// Post handlers - HTTP endpoints for the compose flow and queue view
use crate::db::StoreHandle;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{NewPost, Platform, PostBody};
use crate::services::{schedule, PostService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub body: PostBody,
    pub link: Option<String>,
    /// Schedule timestamp as sent by the client; absent or null means an
    /// undated draft.
    pub scheduled_at: Option<String>,
    #[validate(length(min = 1, message = "At least one platform is required"))]
    pub platforms: Vec<Platform>,
}

/// Create a new post and bind it to the requested platforms.
pub async fn create_post(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    // A malformed schedule value is a caller mistake at this boundary, not
    // a silently dropped one: the post would otherwise land as a draft the
    // user believes is scheduled.
    let scheduled_at = match &req.scheduled_at {
        None => None,
        Some(raw) => Some(
            schedule::parse_schedule_time(raw)
                .ok_or_else(|| AppError::Validation("Invalid scheduled_at".to_string()))?,
        ),
    };

    let service = PostService::new(store.get_ref().clone());
    let creation = service
        .create_post(
            user_id.0,
            NewPost {
                body: req.body,
                link: req.link.filter(|l| !l.trim().is_empty()),
                scheduled_at,
            },
            req.platforms,
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "post": creation.post,
        "bindings": creation.bindings,
        "skipped_platforms": creation.skipped_platforms,
    })))
}

/// The queue: every post for the caller, scheduled first in ascending
/// schedule order, undated drafts last.
pub async fn list_posts(store: web::Data<StoreHandle>, user_id: UserId) -> Result<HttpResponse> {
    let service = PostService::new(store.get_ref().clone());
    let posts = service.list_posts(user_id.0).await?;

    let draft_count = schedule::drafts(&posts).len();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "posts": posts,
        "draft_count": draft_count,
    })))
}

/// One post with its platform bindings.
pub async fn get_post(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new(store.get_ref().clone());
    match service.get_post(user_id.0, *post_id).await? {
        Some((post, bindings)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "post": post,
            "bindings": bindings,
        }))),
        None => Err(AppError::NotFound("Post not found".to_string())),
    }
}

/// Delete a post. Deleting an id that is already gone is a success; the
/// compose views fire these without awaiting confirmation.
pub async fn delete_post(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new(store.get_ref().clone());
    service.delete_post(user_id.0, *post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
