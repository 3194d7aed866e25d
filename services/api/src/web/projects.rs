//! services/api/src/web/projects.rs
//!
//! Handlers for creating, listing, fetching and deleting projects.

use crate::error::ApiError;
use crate::web::rest::{CreateProjectRequest, ProjectResponse};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use project_workspace_core::domain::NewProject;
use std::sync::Arc;
use tracing::{info, warn};

/// Create a project.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing or blank name"),
        (status = 422, description = "Body does not match the declared shape"),
    )
)]
pub async fn create_project_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let new_project = NewProject::parse(&payload.name, payload.description.as_deref())?;

    let project = app_state.db.create_project(&new_project).await?;
    info!("Created project {} ({})", project.id, project.name);
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

/// List all projects, newest first.
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "All projects", body = [ProjectResponse]),
    )
)]
pub async fn list_projects_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = app_state.db.list_projects().await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Fetch one project.
#[utoipa::path(
    get,
    path = "/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = ProjectResponse),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn get_project_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let Path(project_id) = path?;
    let project = app_state.db.get_project(project_id).await?;
    Ok(Json(project.into()))
}

/// Delete a project with all of its documents, their files, and its questions.
#[utoipa::path(
    delete,
    path = "/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn delete_project_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(project_id) = path?;
    app_state.db.delete_project(project_id).await?;

    // The rows are gone; leftover files are only logged.
    if let Err(e) = app_state.storage.remove_project_files(project_id).await {
        warn!("Failed to remove files of project {}: {:?}", project_id, e);
    }
    info!("Deleted project {}", project_id);
    Ok(StatusCode::NO_CONTENT)
}
