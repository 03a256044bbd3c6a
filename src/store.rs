use crate::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, FromRow, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: i64,
    pub subject: String,
    pub deadline: DateTime<Utc>,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub subject: String,
    pub deadline: DateTime<Utc>,
    pub details: String,
}

#[derive(FromRow)]
struct AssignmentRow {
    id: i64,
    subject: String,
    deadline: i64,
    details: String,
    created_at: i64,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = StoreError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(Assignment {
            id: row.id,
            subject: row.subject,
            deadline: from_timestamp(row.deadline)?,
            details: row.details,
            created_at: from_timestamp(row.created_at)?,
        })
    }
}

fn from_timestamp(ts: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(ts, 0).ok_or(StoreError::InvalidTimestamp(ts))
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    query(
        r"CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            deadline INTEGER NOT NULL,
            details TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    query("CREATE INDEX IF NOT EXISTS assignments_deadline ON assignments (deadline)")
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_assignment(
    pool: &SqlitePool, new: NewAssignment,
) -> Result<Assignment, StoreError> {
    let created_at = Utc::now().timestamp();
    let id = query(
        "INSERT INTO assignments (subject, deadline, details, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&new.subject)
    .bind(new.deadline.timestamp())
    .bind(&new.details)
    .bind(created_at)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(Assignment {
        id,
        subject: new.subject,
        deadline: from_timestamp(new.deadline.timestamp())?,
        details: new.details,
        created_at: from_timestamp(created_at)?,
    })
}

/// Assignments whose deadline is at or after `since`, soonest first.
pub async fn pending_assignments(
    pool: &SqlitePool, since: DateTime<Utc>,
) -> Result<Vec<Assignment>, StoreError> {
    let rows = query_as::<_, AssignmentRow>(
        "SELECT id, subject, deadline, details, created_at FROM assignments WHERE deadline >= ? ORDER BY deadline ASC, id ASC",
    )
    .bind(since.timestamp())
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Assignment::try_from).collect()
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}
