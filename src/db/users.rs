/// Validated-user models and directory queries
use crate::error::ApiResult;
use crate::extension::LookupKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A directory user record.
///
/// `handle_part1..3` mirror the handle's domain labels in reverse order
/// (part1 is the effective TLD). `is_valid` is owned by the validate
/// sibling process; only records it has confirmed are served.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub did: String,
    pub handle: String,
    pub handle_part1: String,
    pub handle_part2: Option<String>,
    pub handle_part3: Option<String>,
    pub is_valid: bool,
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str =
    "did, handle, handle_part1, handle_part2, handle_part3, is_valid, updated_at";

/// Find valid users matching a lookup key.
///
/// Each present key part constrains the corresponding handle part;
/// absent parts match anything. Results are ordered by handle so
/// responses are stable across calls.
pub async fn find_valid_users(db: &SqlitePool, key: &LookupKey) -> ApiResult<Vec<User>> {
    // Placeholders are unnumbered so binds stay positional no matter
    // which parts are present
    let mut sql = format!(
        "SELECT {} FROM user WHERE is_valid = 1 AND handle_part1 = ?",
        USER_COLUMNS
    );
    if key.part2.is_some() {
        sql.push_str(" AND handle_part2 = ?");
    }
    if key.part3.is_some() {
        sql.push_str(" AND handle_part3 = ?");
    }
    sql.push_str(" ORDER BY handle");

    let mut query = sqlx::query_as::<_, User>(&sql).bind(&key.part1);
    if let Some(part2) = &key.part2 {
        query = query.bind(part2);
    }
    if let Some(part3) = &key.part3 {
        query = query.bind(part3);
    }

    let users = query.fetch_all(db).await?;

    Ok(users)
}

/// Find handles of valid users matching a lookup key.
pub async fn find_valid_handles(db: &SqlitePool, key: &LookupKey) -> ApiResult<Vec<String>> {
    let users = find_valid_users(db, key).await?;

    Ok(users.into_iter().map(|user| user.handle).collect())
}
