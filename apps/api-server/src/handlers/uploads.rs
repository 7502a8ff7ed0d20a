//! Image upload handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::header, web};
use futures::StreamExt;

use quill_shared::dto::{DeleteUploadRequest, UploadResponse};
use quill_shared::{ApiResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

const CACHE_FOREVER: &str = "public, max-age=31536000, immutable";

struct ImagePart {
    bytes: Vec<u8>,
    content_type: String,
    filename: String,
}

/// Read the `image` part, keeping at most `limit + 1` bytes so an oversized
/// upload is still reported as too large without buffering all of it.
async fn read_image_part(mut payload: Multipart, limit: usize) -> AppResult<Option<ImagePart>> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            let room = (limit + 1).saturating_sub(bytes.len());
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }

        return Ok(Some(ImagePart {
            bytes,
            content_type,
            filename,
        }));
    }
    Ok(None)
}

/// POST /api/upload
pub async fn upload_image(
    identity: Identity,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let Some(part) = read_image_part(payload, state.uploads.max_bytes()).await? else {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    };

    let stored = state
        .uploads
        .store(&part.bytes, &part.content_type, &part.filename, &identity)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UploadResponse {
        filename: stored.filename,
        url: stored.url,
        size: stored.size,
        content_type: stored.content_type,
    })))
}

/// DELETE /api/upload
pub async fn delete_upload(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<DeleteUploadRequest>,
) -> AppResult<HttpResponse> {
    let Some(filename) = body.into_inner().filename.filter(|f| !f.trim().is_empty()) else {
        return Err(AppError::BadRequest("filename is required".to_string()));
    };

    state.uploads.remove(filename.trim(), &identity).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MessageResponse::new(
        "File deleted successfully",
    ))))
}

/// GET /uploads/{filename}
pub async fn serve_upload(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file = state.uploads.serve(&filename).await?;

    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header((header::CACHE_CONTROL, CACHE_FOREVER))
        .body(file.bytes))
}
