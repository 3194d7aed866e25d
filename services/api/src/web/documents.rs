//! services/api/src/web/documents.rs
//!
//! Handlers for uploading, listing and deleting a project's documents.
//!
//! Uploads write the file first and record it second. If recording fails the
//! written file is removed again, so a failed upload leaves no document behind.

use crate::error::ApiError;
use crate::web::rest::DocumentResponse;
use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

/// The file part of an upload together with the name it should be stored under.
struct Upload {
    filename: String,
    data: Bytes,
}

/// Pulls the file out of the form.
///
/// The file is the part named `file`, or failing that any part carrying a
/// file name. An optional text part named `filename` overrides the name sent
/// with the file. Other parts are ignored.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let mut file: Option<(Option<String>, Bytes)> = None;
    let mut filename_override: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        if name.as_deref() == Some("filename") {
            filename_override = Some(field.text().await?);
        } else if name.as_deref() == Some("file") || (file.is_none() && file_name.is_some()) {
            let data = field.bytes().await?;
            file = Some((file_name, data));
        }
    }

    let (sent_name, data) = file.ok_or_else(|| {
        ApiError::Validation("file: multipart form must include a file part".to_string())
    })?;
    let filename = filename_override
        .filter(|n| !n.trim().is_empty())
        .or(sent_name)
        .ok_or_else(|| {
            ApiError::Validation("filename: the file part has no name".to_string())
        })?;

    Ok(Upload { filename, data })
}

/// Upload a document into a project.
#[utoipa::path(
    post,
    path = "/projects/{project_id}/documents",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body(content_type = "multipart/form-data", description = "A `file` part and an optional `filename` part."),
    responses(
        (status = 201, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Missing file or unusable filename"),
        (status = 404, description = "Project not found"),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "The file could not be written"),
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(project_id) = path?;
    // Reject before reading the body when the project is missing.
    app_state.db.get_project(project_id).await?;

    let upload = read_upload(&mut multipart?).await?;
    info!(
        "Uploading '{}' ({} bytes) to project {}",
        upload.filename,
        upload.data.len(),
        project_id
    );

    let stored = app_state
        .storage
        .save_file(project_id, &upload.filename, &upload.data)
        .await?;

    match app_state.db.create_document(project_id, &stored).await {
        Ok(document) => {
            info!("Created document {} at {}", document.id, document.path);
            Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
        }
        Err(e) => {
            if let Err(cleanup) = app_state.storage.remove_file(&stored.path).await {
                warn!("Failed to remove orphaned upload {}: {:?}", stored.path, cleanup);
            }
            Err(e.into())
        }
    }
}

/// List a project's documents, newest first.
#[utoipa::path(
    get,
    path = "/projects/{project_id}/documents",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project's documents", body = [DocumentResponse]),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let Path(project_id) = path?;
    let documents = app_state.db.list_documents(project_id).await?;
    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect()))
}

/// Delete a document and its stored file.
#[utoipa::path(
    delete,
    path = "/projects/{project_id}/documents/{document_id}",
    params(
        ("project_id" = i64, Path, description = "Project id"),
        ("document_id" = i64, Path, description = "Document id"),
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Project or document not found"),
    )
)]
pub async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((project_id, document_id)) = path?;
    let document = app_state.db.get_document(project_id, document_id).await?;
    app_state.db.delete_document(project_id, document_id).await?;

    // The row is gone; a file left behind is only logged.
    if let Err(e) = app_state.storage.remove_file(&document.path).await {
        warn!("Failed to delete file {}: {:?}", document.path, e);
    }

    info!("Deleted document {} from project {}", document_id, project_id);
    Ok(StatusCode::NO_CONTENT)
}
