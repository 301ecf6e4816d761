//! Membership fee endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::fee::{ManageFeeRequest, ManageFeeResponse, StudentWithFee},
};

use super::{ApiJson, AuthenticatedLibrarian};

/// Record a fee payment for a student
#[utoipa::path(
    post,
    path = "/managefees",
    tag = "fees",
    security(("bearer_auth" = [])),
    request_body = ManageFeeRequest,
    responses(
        (status = 200, description = "Fee recorded", body = ManageFeeResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn manage_fees(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
    ApiJson(request): ApiJson<ManageFeeRequest>,
) -> AppResult<Json<ManageFeeResponse>> {
    let entry = request.into_entry()?;
    let record = state.services.fees.upsert_fee(entry).await?;

    Ok(Json(ManageFeeResponse {
        message: "Fee details updated successfully".to_string(),
        record,
    }))
}

/// List every student with their fee state
#[utoipa::path(
    get,
    path = "/liststudentswithfees",
    tag = "fees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Students joined with fee records", body = Vec<StudentWithFee>)
    )
)]
pub async fn list_students_with_fees(
    State(state): State<crate::AppState>,
    AuthenticatedLibrarian(_claims): AuthenticatedLibrarian,
) -> AppResult<Json<Vec<StudentWithFee>>> {
    let students = state.services.fees.list_students_with_fees().await?;
    Ok(Json(students))
}
