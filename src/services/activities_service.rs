use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::database::activities_repo;
use crate::models::Activity;

/// Activity name -> activity, as served by `GET /activities`.
pub type ActivitiesView = BTreeMap<String, Activity>;

pub async fn list_activities(pool: &SqlitePool) -> sqlx::Result<ActivitiesView> {
    let activities = activities_repo::list_activities(pool).await?;
    Ok(activities
        .into_iter()
        .map(|activity| (activity.name.clone(), activity))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{memory_pool, seed_activity};

    #[tokio::test]
    async fn keys_activities_by_name() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Gym Class", 30).await;
        seed_activity(&pool, "Chess Club", 12).await;
        activities_repo::append_participant(&pool, "Chess Club", "a@x.com")
            .await
            .unwrap();

        let view = list_activities(&pool).await.unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view["Chess Club"].participants, vec!["a@x.com"]);
        assert_eq!(view["Gym Class"].max_participants, 30);
    }

    #[tokio::test]
    async fn empty_store_is_empty_map() {
        let pool = memory_pool().await;
        assert!(list_activities(&pool).await.unwrap().is_empty());
    }
}
