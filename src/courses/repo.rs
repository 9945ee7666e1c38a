use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::courses::dto::CoursePayload;

/// Course record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Flat row for course reads joined with the owning user.
#[derive(Debug, Clone, FromRow)]
pub struct CourseWithOwnerRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i32,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email_address: String,
}

const OWNER_SELECT: &str = r#"
    SELECT c.id, c.title, c.description, c.estimated_time, c.materials_needed, c.user_id,
           u.first_name    AS owner_first_name,
           u.last_name     AS owner_last_name,
           u.email_address AS owner_email_address
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

impl Course {
    pub async fn find_all_with_owner(db: &PgPool) -> Result<Vec<CourseWithOwnerRow>, sqlx::Error> {
        sqlx::query_as::<_, CourseWithOwnerRow>(&format!("{OWNER_SELECT} ORDER BY c.id"))
            .fetch_all(db)
            .await
    }

    pub async fn find_by_id_with_owner(
        db: &PgPool,
        id: i32,
    ) -> Result<Option<CourseWithOwnerRow>, sqlx::Error> {
        sqlx::query_as::<_, CourseWithOwnerRow>(&format!("{OWNER_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Bare lookup used by mutations to distinguish 404 from 403.
    pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, estimated_time, materials_needed, user_id,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i32,
        fields: &CoursePayload,
    ) -> Result<Course, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, estimated_time, materials_needed, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, estimated_time, materials_needed, user_id,
                      created_at, updated_at
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.estimated_time)
        .bind(&fields.materials_needed)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Update conditioned on ownership in one statement; returns the
    /// number of rows touched. Optional fields keep their stored value
    /// when absent from the payload.
    pub async fn update_owned(
        db: &PgPool,
        id: i32,
        user_id: i32,
        fields: &CoursePayload,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = $3,
                description = $4,
                estimated_time = COALESCE($5, estimated_time),
                materials_needed = COALESCE($6, materials_needed),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.estimated_time)
        .bind(&fields.materials_needed)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete conditioned on ownership in one statement.
    pub async fn delete_owned(db: &PgPool, id: i32, user_id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
