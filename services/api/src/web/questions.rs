//! services/api/src/web/questions.rs
//!
//! Handlers for asking and listing a project's questions. Answers are the
//! fixed placeholder text until an answering backend exists.

use crate::error::ApiError;
use crate::web::rest::{AskQuestionRequest, QuestionResponse};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use project_workspace_core::domain::NewQuestion;
use std::sync::Arc;
use tracing::info;

/// Ask a question about a project.
#[utoipa::path(
    post,
    path = "/projects/{project_id}/questions",
    params(("project_id" = i64, Path, description = "Project id")),
    request_body = AskQuestionRequest,
    responses(
        (status = 201, description = "Question stored with its answer", body = QuestionResponse),
        (status = 400, description = "Blank question"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "Body does not match the declared shape"),
    )
)]
pub async fn create_question_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AskQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(project_id) = path?;
    let Json(payload) = payload?;
    let question = NewQuestion::parse(&payload.question)?;

    let stored = app_state.db.create_question(project_id, &question).await?;
    info!("Stored question {} for project {}", stored.id, project_id);
    Ok((StatusCode::CREATED, Json(QuestionResponse::from(stored))))
}

/// List a project's questions in the order they were asked.
#[utoipa::path(
    get,
    path = "/projects/{project_id}/questions",
    params(("project_id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project's questions", body = [QuestionResponse]),
        (status = 404, description = "Project not found"),
    )
)]
pub async fn list_questions_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let Path(project_id) = path?;
    let questions = app_state.db.list_questions(project_id).await?;
    Ok(Json(questions.into_iter().map(QuestionResponse::from).collect()))
}
