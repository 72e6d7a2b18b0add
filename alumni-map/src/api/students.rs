//! Student CRUD handlers
//!
//! GET/POST /students, PUT/DELETE /students/:id

use alumni_common::{StudentFields, StudentRecord};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

/// Response carrying only a status message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// PUT /students/:id response
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    pub student: StudentRecord,
}

/// GET /students
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Json<Vec<StudentRecord>>> {
    let students = state.store.load_all().await?;
    Ok(Json(students))
}

/// POST /students
///
/// Geocodes the location; unresolved places are stored at (0.0, 0.0).
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentFields>, JsonRejection>,
) -> ApiResult<Json<StudentRecord>> {
    let Json(fields) = payload?;
    let student = state.reconciler.create_student(fields).await?;
    Ok(Json(student))
}

/// PUT /students/:id
///
/// Overwrites every field and re-geocodes the location, even if unchanged.
pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    payload: Result<Json<StudentFields>, JsonRejection>,
) -> ApiResult<Json<UpdateResponse>> {
    let Json(fields) = payload?;
    let student = state.reconciler.update_student(&student_id, fields).await?;

    Ok(Json(UpdateResponse {
        message: "Updated successfully".to_string(),
        student,
    }))
}

/// DELETE /students/:id
///
/// Unknown ids succeed without changing the store.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let removed = state.store.delete_by_id(&student_id).await?;
    tracing::info!(id = %student_id, removed, "Delete student");

    Ok(Json(MessageResponse {
        message: "Deleted successfully".to_string(),
    }))
}

/// Build student CRUD routes
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", put(update_student).delete(delete_student))
}
