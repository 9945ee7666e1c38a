use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};

use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// The authenticated identity, resolved from the request's Basic
/// credentials and handed to the handler as a value.
///
/// Every failure rejects with the same 401 body; the distinct reasons
/// below are logged for server-side diagnostics only.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let Some((username, secret)) = header.and_then(parse_basic) else {
            warn!("Authorization header not found");
            return Err(ApiError::AccessDenied);
        };

        let user = match User::find_by_email(&state.db, &username).await? {
            Some(user) => user,
            None => {
                warn!("User not found for Username: {}", username);
                return Err(ApiError::AccessDenied);
            }
        };

        if !verify_password(&secret, &user.password) {
            warn!("Incorrect password for Username: {}", user.email_address);
            return Err(ApiError::AccessDenied);
        }

        info!("Authentication successful for Username: {}", user.email_address);
        Ok(AuthUser(user))
    }
}

/// Splits a `Basic <base64>` Authorization header into its username
/// and secret. The first colon separates the pair, so secrets may
/// contain colons.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header
        .strip_prefix("Basic ")
        .or_else(|| header.strip_prefix("basic "))?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, secret) = decoded.split_once(':')?;
    Some((username.to_string(), secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn basic_header(username: &str, secret: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{secret}")))
    }

    #[test]
    fn parse_basic_roundtrips_credentials() {
        let header = basic_header("jane@example.com", "secret");
        let (username, secret) = parse_basic(&header).expect("parse");
        assert_eq!(username, "jane@example.com");
        assert_eq!(secret, "secret");
    }

    #[test]
    fn parse_basic_keeps_colons_in_the_secret() {
        let header = basic_header("jane@example.com", "se:cr:et");
        let (_, secret) = parse_basic(&header).expect("parse");
        assert_eq!(secret, "se:cr:et");
    }

    #[test]
    fn parse_basic_accepts_lowercase_scheme() {
        let header = format!("basic {}", STANDARD.encode("jane@example.com:secret"));
        assert!(parse_basic(&header).is_some());
    }

    #[test]
    fn parse_basic_rejects_other_schemes_and_garbage() {
        assert!(parse_basic("Bearer abc.def.ghi").is_none());
        assert!(parse_basic("Basic !!!not-base64!!!").is_none());
        let no_colon = format!("Basic {}", STANDARD.encode("jane@example.com"));
        assert!(parse_basic(&no_colon).is_none());
    }

    #[tokio::test]
    async fn missing_header_is_denied_before_any_lookup() {
        let state = AppState::fake();
        let (mut parts, _) = Request::builder()
            .uri("/api/users")
            .body(())
            .expect("request")
            .into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejection");
        assert!(matches!(err, ApiError::AccessDenied));
    }

    #[tokio::test]
    async fn malformed_header_is_denied_before_any_lookup() {
        let state = AppState::fake();
        let (mut parts, _) = Request::builder()
            .uri("/api/users")
            .header(header::AUTHORIZATION, "Basic ???")
            .body(())
            .expect("request")
            .into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejection");
        assert!(matches!(err, ApiError::AccessDenied));
    }
}
