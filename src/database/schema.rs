use sqlx::SqlitePool;

// Roster order is participant_id order.
const SQL_SCHEMA: [&str; 2] = [
    r#"
CREATE TABLE IF NOT EXISTS activities (
  name TEXT PRIMARY KEY NOT NULL,
  description TEXT NOT NULL,
  schedule TEXT NOT NULL,
  max_participants INTEGER NOT NULL CHECK (max_participants > 0)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS activity_participants (
  participant_id INTEGER PRIMARY KEY AUTOINCREMENT,
  activity_name TEXT NOT NULL REFERENCES activities(name) ON DELETE CASCADE,
  email TEXT NOT NULL,
  UNIQUE (activity_name, email)
)
"#,
];

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SQL_SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
