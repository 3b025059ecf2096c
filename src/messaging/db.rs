//! Database operations for private messages

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};

/// A persisted one-to-one message
///
/// Serialized as-is into the `data` field of realtime `message` events and
/// into list responses, so the field names are part of the client contract.
#[derive(Debug, Clone, Serialize)]
pub struct PrivateMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> PrivateMessage {
    PrivateMessage {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

/// Persist a new private message
pub async fn create_private_message(
    pool: &PgPool,
    sender_id: i64,
    receiver_id: i64,
    content: &str,
) -> Result<PrivateMessage, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO private_messages (sender_id, receiver_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, sender_id, receiver_id, content, created_at
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(message_from_row(&row))
}

/// Messages exchanged between two users, oldest first
pub async fn get_conversation(
    pool: &PgPool,
    user_id: i64,
    other_user_id: i64,
    limit: i64,
) -> Result<Vec<PrivateMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, sender_id, receiver_id, content, created_at
        FROM private_messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        ORDER BY created_at
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(other_user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(message_from_row).collect())
}
