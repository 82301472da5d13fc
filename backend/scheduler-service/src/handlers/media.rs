/// Media handlers - upload, listing, deletion
///
/// Uploads stream through multipart into object storage; the row in the
/// media table points at the stored object. Nothing enforces that a post
/// referencing a media id still has it - the original system had no such
/// referential integrity either.
use crate::db::StoreHandle;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::NewMediaItem;
use crate::storage::MediaStorageHandle;
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

/// Placeholder shown until real video thumbnail extraction exists.
const VIDEO_THUMBNAIL_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=400";

#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "50MB")]
    pub file: TempFile,
    pub alt_text: Option<Text<String>>,
    pub title: Option<Text<String>>,
    pub description: Option<Text<String>>,
}

/// Upload a file: store the object, then record the row.
pub async fn upload_media(
    store: web::Data<StoreHandle>,
    media_storage: web::Data<MediaStorageHandle>,
    user_id: UserId,
    form: MultipartForm<UploadForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    if form.file.size == 0 {
        return Err(AppError::Validation("No file provided".to_string()));
    }

    let file_name = form
        .file
        .file_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "upload.bin".to_string());
    let content_type = form
        .file
        .content_type
        .clone()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);

    let bytes = tokio::fs::read(form.file.file.path())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read upload: {}", e)))?;

    let key = format!(
        "{}/{}-{}",
        user_id.0,
        Utc::now().timestamp_millis(),
        file_name
    );

    let url = media_storage
        .put_object(&key, bytes, content_type.as_ref())
        .await
        .map_err(|e| AppError::Storage(format!("{:#}", e)))?;

    // Real thumbnail generation is out of scope: images reuse their own URL,
    // videos get a placeholder.
    let thumbnail_url = if content_type.type_() == mime::IMAGE {
        Some(url.clone())
    } else if content_type.type_() == mime::VIDEO {
        Some(VIDEO_THUMBNAIL_PLACEHOLDER.to_string())
    } else {
        None
    };

    let media = store
        .insert_media(
            user_id.0,
            NewMediaItem {
                file_name,
                file_type: content_type.to_string(),
                file_size: form.file.size as i64,
                storage_key: key,
                url,
                thumbnail_url,
                alt_text: form.alt_text.map(|t| t.into_inner()),
                title: form.title.map(|t| t.into_inner()),
                description: form.description.map(|t| t.into_inner()),
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "media": media,
    })))
}

/// The caller's media library, newest first.
pub async fn list_media(store: web::Data<StoreHandle>, user_id: UserId) -> Result<HttpResponse> {
    let media = store.list_media(user_id.0).await?;
    Ok(HttpResponse::Ok().json(media))
}

/// Delete a media item: remove the stored object, then the row. A storage
/// failure is logged and the row is removed anyway, matching the original
/// cleanup behavior.
pub async fn delete_media(
    store: web::Data<StoreHandle>,
    media_storage: web::Data<MediaStorageHandle>,
    user_id: UserId,
    media_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let Some(media) = store.get_media(user_id.0, *media_id).await? else {
        return Err(AppError::NotFound("Media item not found".to_string()));
    };

    if let Err(err) = media_storage.delete_object(&media.storage_key).await {
        tracing::error!(
            media_id = %media.id,
            storage_key = %media.storage_key,
            "failed to delete stored object, removing row anyway: {:#}",
            err
        );
    }

    store.delete_media(user_id.0, *media_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
