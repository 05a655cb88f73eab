use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::services::activities_service::{self, ActivitiesView};
use crate::services::roster_service;
use crate::web::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ParticipantBody {
    pub email: String,
}

impl ParticipantBody {
    fn email(&self) -> Result<&str, ApiError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ApiError::MissingEmail);
        }
        Ok(email)
    }
}

pub async fn activities_handler(
    State(pool): State<SqlitePool>,
) -> Result<Json<ActivitiesView>, ApiError> {
    Ok(Json(activities_service::list_activities(&pool).await?))
}

pub async fn signup_handler(
    Path(activity_name): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<ParticipantBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let email = body.email()?;
    let message = roster_service::sign_up(&pool, &activity_name, email).await?;
    Ok(Json(serde_json::json!({ "message": message })))
}

pub async fn unregister_handler(
    Path(activity_name): Path<String>,
    State(pool): State<SqlitePool>,
    body: Result<Json<ParticipantBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    let email = body.email()?;
    let message = roster_service::unregister(&pool, &activity_name, email).await?;
    Ok(Json(serde_json::json!({ "message": message })))
}
