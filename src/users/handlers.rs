use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::auth::extractors::AuthUser;
use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{CreateUserRequest, UserResponse};
use crate::users::repo::{is_unique_violation, User};
use crate::validation::{validate, ResourceKind};

/// GET /api/users. Returns the authenticated identity, without its digest.
#[instrument(skip_all)]
pub async fn current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// POST /api/users. Signup; each stage exits completely on failure:
/// validate, check for a duplicate email, hash, insert.
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);

    let errors = validate(ResourceKind::User, &body);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let payload: CreateUserRequest =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if User::find_by_email(&state.db, &payload.email_address)
        .await?
        .is_some()
    {
        warn!(email = %payload.email_address, "signup with existing email");
        return Err(duplicate_email(&payload.email_address));
    }

    let digest = hash_password(&payload.password)?;

    let user = User::create(
        &state.db,
        &payload.first_name,
        &payload.last_name,
        &payload.email_address,
        &digest,
    )
    .await
    .map_err(|e| {
        // A concurrent signup can slip past the pre-check; the unique
        // constraint reports it the same way.
        if is_unique_violation(&e) {
            duplicate_email(&payload.email_address)
        } else {
            e.into()
        }
    })?;

    info!(user_id = user.id, email = %user.email_address, "user created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, "/".to_string())],
    ))
}

fn duplicate_email(email: &str) -> ApiError {
    ApiError::BadRequest(format!(
        "User with email address: {} already exists",
        email
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_message_names_the_address() {
        let err = duplicate_email("jane@example.com");
        match err {
            ApiError::BadRequest(message) => assert_eq!(
                message,
                "User with email address: jane@example.com already exists"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
