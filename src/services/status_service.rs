use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::activities_repo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbStatus {
    pub activities_count: i64,
    pub connection_status: &'static str,
}

// Never fails: an unreachable store is reported, not raised.
pub async fn db_status(pool: &SqlitePool) -> DbStatus {
    if pool.is_closed() {
        return DbStatus {
            activities_count: 0,
            connection_status: "Not connected",
        };
    }

    match activities_repo::count_activities(pool).await {
        Ok(activities_count) => DbStatus {
            activities_count,
            connection_status: "Connected",
        },
        Err(e) => {
            warn!("db status count failed: {}", e);
            DbStatus {
                activities_count: 0,
                connection_status: "Not connected",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{memory_pool, seed_activity};

    #[tokio::test]
    async fn reports_count_when_connected() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Chess Club", 2).await;

        assert_eq!(
            db_status(&pool).await,
            DbStatus {
                activities_count: 1,
                connection_status: "Connected"
            }
        );
    }

    #[tokio::test]
    async fn reports_closed_pool_as_not_connected() {
        let pool = memory_pool().await;
        pool.close().await;

        let status = db_status(&pool).await;
        assert_eq!(status.connection_status, "Not connected");
        assert_eq!(status.activities_count, 0);
    }
}
