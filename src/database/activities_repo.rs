use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ActivitiesRow, Activity};

const SQL_GET_ACTIVITY: &str = r#"
SELECT
  a.name,
  a.description,
  a.schedule,
  a.max_participants,
  (
    SELECT json_group_array(email)
    FROM (
      SELECT ap.email
      FROM activity_participants ap
      WHERE ap.activity_name = a.name
      ORDER BY ap.participant_id ASC
    )
  ) AS participants_json
FROM activities a
WHERE a.name = ?1
LIMIT 1
"#;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT
  a.name,
  a.description,
  a.schedule,
  a.max_participants,
  (
    SELECT json_group_array(email)
    FROM (
      SELECT ap.email
      FROM activity_participants ap
      WHERE ap.activity_name = a.name
      ORDER BY ap.participant_id ASC
    )
  ) AS participants_json
FROM activities a
ORDER BY a.name ASC
"#;

// Capacity and duplicate checks run inside the insert, so concurrent signups
// can never push a roster past max_participants.
const SQL_APPEND_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (activity_name, email)
SELECT a.name, ?2
FROM activities a
WHERE a.name = ?1
  AND (
    SELECT COUNT(*)
    FROM activity_participants ap
    WHERE ap.activity_name = a.name
  ) < a.max_participants
  AND NOT EXISTS (
    SELECT 1
    FROM activity_participants ap
    WHERE ap.activity_name = a.name
      AND ap.email = ?2
  )
"#;

const SQL_REMOVE_PARTICIPANT: &str = r#"
DELETE FROM activity_participants
WHERE activity_name = ?1
  AND email = ?2
"#;

const SQL_COUNT_ACTIVITIES: &str = "SELECT COUNT(*) FROM activities";

const SQL_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (
  name,
  description,
  schedule,
  max_participants
) VALUES (?, ?, ?, ?)
"#;

const SQL_INSERT_SEED_PARTICIPANT: &str = r#"
INSERT INTO activity_participants (activity_name, email) VALUES (?, ?)
"#;

pub struct NewActivity<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub max_participants: i64,
}

fn decode(row: ActivitiesRow) -> sqlx::Result<Activity> {
    Activity::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub async fn get_activity(pool: &SqlitePool, name: &str) -> sqlx::Result<Option<Activity>> {
    sqlx::query_as::<_, ActivitiesRow>(SQL_GET_ACTIVITY)
        .bind(name)
        .fetch_optional(pool)
        .await?
        .map(decode)
        .transpose()
}

pub async fn list_activities(pool: &SqlitePool) -> sqlx::Result<Vec<Activity>> {
    sqlx::query_as::<_, ActivitiesRow>(SQL_LIST_ACTIVITIES)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(decode)
        .collect()
}

/// Appends `email` to the roster only if the activity exists, has a free slot
/// and does not list the email yet. Returns the number of rows inserted (0 or 1).
pub async fn append_participant(pool: &SqlitePool, name: &str, email: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_APPEND_PARTICIPANT)
        .bind(name)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn remove_participant(pool: &SqlitePool, name: &str, email: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_REMOVE_PARTICIPANT)
        .bind(name)
        .bind(email)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn count_activities(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_ACTIVITIES)
        .fetch_one(pool)
        .await
}

/// Deletes every activity and roster entry. Returns the number of activities removed.
pub async fn drop_all(pool: &SqlitePool) -> sqlx::Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM activity_participants")
        .execute(&mut *tx)
        .await?;
    let res = sqlx::query("DELETE FROM activities")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected())
}

pub async fn insert_activity(
    conn: &mut SqliteConnection,
    activity: NewActivity<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ACTIVITY)
        .bind(activity.name)
        .bind(activity.description)
        .bind(activity.schedule)
        .bind(activity.max_participants)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

// Unconditional; the seed loader validates the catalog before calling this.
pub async fn insert_seed_participant(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_SEED_PARTICIPANT)
        .bind(name)
        .bind(email)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{memory_pool, seed_activity};

    #[tokio::test]
    async fn get_unknown_activity_is_none() {
        let pool = memory_pool().await;
        assert!(get_activity(&pool, "Nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn append_keeps_signup_order() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Art Club", 5).await;

        for email in ["c@x.com", "a@x.com", "b@x.com"] {
            assert_eq!(append_participant(&pool, "Art Club", email).await.unwrap(), 1);
        }

        let activity = get_activity(&pool, "Art Club").await.unwrap().unwrap();
        assert_eq!(activity.participants, vec!["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn append_refuses_duplicates_and_overflow() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Chess Club", 2).await;

        assert_eq!(append_participant(&pool, "Chess Club", "a@x.com").await.unwrap(), 1);
        assert_eq!(append_participant(&pool, "Chess Club", "a@x.com").await.unwrap(), 0);
        assert_eq!(append_participant(&pool, "Chess Club", "b@x.com").await.unwrap(), 1);
        assert_eq!(append_participant(&pool, "Chess Club", "c@x.com").await.unwrap(), 0);

        let activity = get_activity(&pool, "Chess Club").await.unwrap().unwrap();
        assert_eq!(activity.participants, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn append_to_unknown_activity_inserts_nothing() {
        let pool = memory_pool().await;
        assert_eq!(append_participant(&pool, "Nope", "a@x.com").await.unwrap(), 0);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_participants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn remove_only_touches_the_named_roster() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Chess Club", 2).await;
        seed_activity(&pool, "Drama Club", 2).await;
        append_participant(&pool, "Chess Club", "a@x.com").await.unwrap();
        append_participant(&pool, "Drama Club", "a@x.com").await.unwrap();

        assert_eq!(remove_participant(&pool, "Chess Club", "a@x.com").await.unwrap(), 1);
        assert_eq!(remove_participant(&pool, "Chess Club", "a@x.com").await.unwrap(), 0);

        let drama = get_activity(&pool, "Drama Club").await.unwrap().unwrap();
        assert_eq!(drama.participants, vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn count_list_and_drop_all() {
        let pool = memory_pool().await;
        seed_activity(&pool, "Swim Team", 3).await;
        seed_activity(&pool, "Art Club", 3).await;
        append_participant(&pool, "Art Club", "a@x.com").await.unwrap();

        assert_eq!(count_activities(&pool).await.unwrap(), 2);
        let names: Vec<String> = list_activities(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Art Club", "Swim Team"]);

        assert_eq!(drop_all(&pool).await.unwrap(), 2);
        assert_eq!(count_activities(&pool).await.unwrap(), 0);
        assert!(list_activities(&pool).await.unwrap().is_empty());
    }
}
