//! Database operations for groups, membership and group messages

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};

/// A group channel row
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// A persisted group message
///
/// Serialized as-is into realtime `message` events and list responses.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMessage {
    pub id: i64,
    pub group_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn group_from_row(row: &sqlx::postgres::PgRow) -> Group {
    Group {
        id: row.get("id"),
        name: row.get("name"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    }
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> GroupMessage {
    GroupMessage {
        id: row.get("id"),
        group_id: row.get("group_id"),
        sender_id: row.get("sender_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

/// Create a group and enroll the creator as its first member
pub async fn create_group(pool: &PgPool, name: &str, created_by: i64) -> Result<Group, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO groups (name, created_by)
        VALUES ($1, $2)
        RETURNING id, name, created_by, created_at
        "#,
    )
    .bind(name)
    .bind(created_by)
    .fetch_one(&mut *tx)
    .await?;

    let group = group_from_row(&row);

    sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
        .bind(group.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(group)
}

/// Is the user currently a member of the group?
pub async fn is_group_member(
    pool: &PgPool,
    group_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2")
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Groups the user belongs to
pub async fn groups_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Group>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT g.id, g.name, g.created_by, g.created_at
        FROM groups g
        JOIN group_members m ON m.group_id = g.id
        WHERE m.user_id = $1
        ORDER BY g.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(group_from_row).collect())
}

/// Persist a new group message
pub async fn create_group_message(
    pool: &PgPool,
    group_id: i64,
    sender_id: i64,
    content: &str,
) -> Result<GroupMessage, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO group_messages (group_id, sender_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, group_id, sender_id, content, created_at
        "#,
    )
    .bind(group_id)
    .bind(sender_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(message_from_row(&row))
}

/// Most recent messages of a group, newest first
pub async fn recent_group_messages(
    pool: &PgPool,
    group_id: i64,
    limit: i64,
) -> Result<Vec<GroupMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, group_id, sender_id, content, created_at
        FROM group_messages
        WHERE group_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(group_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(message_from_row).collect())
}
