use serde::{Deserialize, Serialize};

use crate::users::repo::User;

/// Request body for signup, deserialized after validation has passed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
}

/// Public part of a user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email_address: user.email_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_serializes_camel_case_without_password() {
        let response = UserResponse {
            id: 1,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email_address: "jane@example.com".into(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["emailAddress"], "jane@example.com");
        assert!(json.get("password").is_none());
    }
}
