use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::courses::dto::{CourseDetail, CourseList, CoursePayload, CourseResponse};
use crate::courses::repo::Course;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate, ResourceKind};

/// GET /api/courses. Public; every course with its owner projection.
#[instrument(skip_all)]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<CourseList>, ApiError> {
    let rows = Course::find_all_with_owner(&state.db).await?;
    let courses = rows.into_iter().map(CourseResponse::from).collect();
    Ok(Json(CourseList { courses }))
}

/// GET /api/courses/:id. Public.
#[instrument(skip_all)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CourseDetail>, ApiError> {
    let row = Course::find_by_id_with_owner(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(CourseDetail {
        course: CourseResponse::from(row),
    }))
}

/// POST /api/courses. Ownership comes from the authenticated
/// identity, never from the body.
#[instrument(skip_all)]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = validated_payload(body)?;
    let course = Course::create(&state.db, user.id, &payload).await?;
    info!(course_id = course.id, user_id = user.id, "course created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("api/courses/{}", course.id))],
    ))
}

/// PUT /api/courses/:id. Owner only; the mutation itself is a single
/// statement conditioned on ownership, so a stale lookup can never
/// touch another user's course.
#[instrument(skip_all)]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    body: Option<Json<Value>>,
) -> Result<StatusCode, ApiError> {
    let payload = validated_payload(body)?;

    let course = Course::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if course.user_id != user.id {
        warn!(course_id = id, user_id = user.id, owner_id = course.user_id, "update denied");
        return Err(ApiError::AccessForbidden);
    }

    let updated = Course::update_owned(&state.db, id, user.id, &payload).await?;
    if updated == 0 {
        // Deleted between the lookup and the conditional update.
        return Err(ApiError::NotFound);
    }
    info!(course_id = id, user_id = user.id, "course updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/courses/:id. Owner only.
#[instrument(skip_all)]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let course = Course::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if course.user_id != user.id {
        warn!(course_id = id, user_id = user.id, owner_id = course.user_id, "delete denied");
        return Err(ApiError::AccessForbidden);
    }

    let deleted = Course::delete_owned(&state.db, id, user.id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    info!(course_id = id, user_id = user.id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validates the course body and deserializes it; a missing or
/// unparseable body validates as an empty one.
fn validated_payload(body: Option<Json<Value>>) -> Result<CoursePayload, ApiError> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let errors = validate(ResourceKind::Course, &body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}
