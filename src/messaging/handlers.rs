/**
 * Private Message Handlers
 *
 * HTTP handlers for the private-message endpoints. The write path is the
 * producer side of the realtime fan-out contract: persist the row first,
 * then publish it to the canonical dm room. Delivery is best effort; the
 * HTTP response reflects only the persistence outcome.
 */

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::messaging::db::{create_private_message, get_conversation, PrivateMessage};
use crate::middleware::auth::AuthUser;
use crate::realtime::broker::RoomBroker;
use crate::realtime::room::dm_room;
use crate::auth::users::user_exists;
use crate::server::state::AppState;

/// Default page size for message listings
const DEFAULT_LIMIT: i64 = 50;

/// Request body for POST /messages/private
#[derive(Debug, Deserialize)]
pub struct PrivateMessageCreate {
    pub receiver_id: i64,
    pub content: String,
}

/// Query parameters for message listings
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Send a private message (POST /messages/private)
///
/// Persists the message, then publishes it to `dm:<min>:<max>` so both
/// participants' live connections receive it.
///
/// # Errors
///
/// * `400 Bad Request` - Messaging yourself
/// * `404 Not Found` - Receiver does not exist
pub async fn send_private_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<PrivateMessageCreate>,
) -> Result<Json<PrivateMessage>, ApiError> {
    if request.receiver_id == user_id {
        return Err(ApiError::bad_request("Cannot message yourself"));
    }

    if !user_exists(&state.db_pool, request.receiver_id).await? {
        return Err(ApiError::not_found("Receiver not found"));
    }

    let message =
        create_private_message(&state.db_pool, user_id, request.receiver_id, &request.content)
            .await?;

    publish_private_message(&state.broker, &message)?;

    Ok(Json(message))
}

/// Fan a persisted private message out to its conversation's dm room
///
/// The room key is canonical regardless of which participant sent the
/// message. Delivery is best effort; failures surface only as a lower
/// subscriber count.
pub(crate) fn publish_private_message(
    broker: &RoomBroker,
    message: &PrivateMessage,
) -> Result<(), ApiError> {
    let room = dm_room(message.sender_id, message.receiver_id);
    let delivered = broker.publish(&room, serde_json::to_value(message)?);
    tracing::debug!(
        "Private message {} published to {} ({} live subscribers)",
        message.id,
        room,
        delivered
    );
    Ok(())
}

/// List the conversation with another user
/// (GET /messages/private/{other_user_id})
pub async fn get_private_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(other_user_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PrivateMessage>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let messages = get_conversation(&state.db_pool, user_id, other_user_id, limit).await?;
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use crate::realtime::authz::MembershipOracle;
    use crate::realtime::events::ServerEvent;
    use crate::realtime::registry::SessionRegistry;

    struct NoOracle;

    #[async_trait]
    impl MembershipOracle for NoOracle {
        async fn is_group_member(&self, _: i64, _: i64) -> Result<bool, sqlx::Error> {
            Ok(false)
        }
    }

    fn broker() -> RoomBroker {
        RoomBroker::new(Arc::new(SessionRegistry::new()), Arc::new(NoOracle))
    }

    fn message(sender_id: i64, receiver_id: i64) -> PrivateMessage {
        PrivateMessage {
            id: 1,
            sender_id,
            receiver_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_write_fans_out_to_canonical_dm_room() {
        let broker = broker();

        // A bystander connection that never subscribes.
        let (tx, mut rx) = mpsc::channel(16);
        broker.connect(Uuid::new_v4(), 5, tx).unwrap();

        // The receiver's connection subscribes to the canonical room.
        let conn = Uuid::new_v4();
        let (tx, mut rx_sub) = mpsc::channel(16);
        broker.connect(conn, 3, tx).unwrap();
        broker.subscribe(conn, "dm:3:9").await;
        let _ = rx_sub.try_recv();

        // Sender 9 → receiver 3: the room key still comes out dm:3:9.
        let message = message(9, 3);
        publish_private_message(&broker, &message).unwrap();

        assert_matches!(
            rx_sub.try_recv().unwrap(),
            ServerEvent::Message { room, data }
                if room == "dm:3:9" && data == serde_json::to_value(&message).unwrap()
        );
        // A connection that never subscribed receives nothing.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_write_with_no_live_subscribers_succeeds() {
        let broker = broker();
        publish_private_message(&broker, &message(3, 9)).unwrap();
    }
}
