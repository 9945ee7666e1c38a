use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// One variant per request outcome the API can report.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field validation failed; one message per offending field.
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    #[error("access denied")]
    AccessDenied,
    #[error("access forbidden")]
    AccessForbidden,
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Detail attached to 5xx responses so the error-logging middleware
/// can report what failed without re-parsing the body.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::AccessDenied => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Access Denied" })),
            )
                .into_response(),
            ApiError::AccessForbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "Access Forbidden" })),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Page not found" })),
            )
                .into_response(),
            ApiError::Storage(e) => server_error(e.to_string()),
            ApiError::Internal(e) => server_error(e.to_string()),
        }
    }
}

fn server_error(message: String) -> Response {
    let mut res = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message, "error": {} })),
    )
        .into_response();
    res.extensions_mut().insert(ErrorDetail(message));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_error_list() {
        let err = ApiError::Validation(vec![
            "Please provide a value for \"title\"".to_string(),
            "Please provide a value for \"description\"".to_string(),
        ]);
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["errors"][0], "Please provide a value for \"title\"");
    }

    #[tokio::test]
    async fn access_denied_maps_to_401_with_fixed_message() {
        let res = ApiError::AccessDenied.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Access Denied");
    }

    #[tokio::test]
    async fn access_forbidden_maps_to_403() {
        let res = ApiError::AccessForbidden.into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Access Forbidden");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let res = ApiError::NotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Page not found");
    }

    #[tokio::test]
    async fn storage_failure_maps_to_500_with_empty_error_object() {
        let res = ApiError::Storage(sqlx::Error::PoolClosed).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.extensions().get::<ErrorDetail>().is_some());
        let body = body_json(res).await;
        assert!(body["message"].is_string());
        assert_eq!(body["error"], json!({}));
    }
}
