//! Student roster endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::student::{AddStudentRequest, Student},
};

use super::{ApiJson, AuthenticatedLibrarian, MessageResponse};

/// Enrol a student
#[utoipa::path(
    post,
    path = "/addstudent",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = AddStudentRequest,
    responses(
        (status = 201, description = "Student added", body = MessageResponse),
        (status = 400, description = "Invalid request or email already enrolled", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_student(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<AddStudentRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let student = request.into_student()?;
    state.services.roster.add_student(student).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Student added successfully")),
    ))
}

/// List enrolled students
#[utoipa::path(
    get,
    path = "/liststudents",
    tag = "students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All students", body = Vec<Student>)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.roster.list_students().await?;
    Ok(Json(students))
}
