use axum::{extract::State, Json};
use sqlx::SqlitePool;

use crate::services::status_service::{self, DbStatus};

pub async fn db_status_handler(State(pool): State<SqlitePool>) -> Json<DbStatus> {
    Json(status_service::db_status(&pool).await)
}
