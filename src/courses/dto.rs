use serde::{Deserialize, Serialize};

use crate::courses::repo::CourseWithOwnerRow;

/// Request body for creating or updating a course, deserialized after
/// validation has passed. Ownership is never taken from the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePayload {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub materials_needed: Option<String>,
}

/// Reduced projection of the owning user embedded in course reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOwner {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i32,
    pub user: CourseOwner,
}

#[derive(Debug, Serialize)]
pub struct CourseList {
    pub courses: Vec<CourseResponse>,
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    pub course: CourseResponse,
}

impl From<CourseWithOwnerRow> for CourseResponse {
    fn from(row: CourseWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            user_id: row.user_id,
            user: CourseOwner {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
        }
    }
}
