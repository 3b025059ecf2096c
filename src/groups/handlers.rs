/**
 * Group Handlers
 *
 * HTTP handlers for group channels. Group-message writes are the second
 * producer for the realtime fan-out: persist first, then publish to
 * `group:<id>`.
 *
 * Membership is checked per request against the `group_members` table; a
 * non-member gets 403 regardless of whether the group exists.
 */

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::groups::db::{
    create_group as insert_group, create_group_message, groups_for_user, is_group_member,
    recent_group_messages, Group, GroupMessage,
};
use crate::messaging::handlers::ListQuery;
use crate::middleware::auth::AuthUser;
use crate::realtime::broker::RoomBroker;
use crate::realtime::room::group_room;
use crate::server::state::AppState;

/// Default page size for message listings
const DEFAULT_LIMIT: i64 = 50;

/// Request body for POST /groups
#[derive(Debug, Deserialize)]
pub struct GroupCreate {
    pub name: String,
}

/// Request body for POST /groups/{group_id}/messages
#[derive(Debug, Deserialize)]
pub struct GroupMessageCreate {
    pub content: String,
}

/// Reject callers who are not members of the group
async fn require_membership(
    state: &AppState,
    group_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    if !is_group_member(&state.db_pool, group_id, user_id).await? {
        return Err(ApiError::forbidden("Not a member of the group"));
    }
    Ok(())
}

/// Create a group (POST /groups)
///
/// The creator becomes the group's first member.
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<GroupCreate>,
) -> Result<Json<Group>, ApiError> {
    let group = insert_group(&state.db_pool, &request.name, user_id).await?;
    tracing::info!("Group {} created by user {}", group.id, user_id);
    Ok(Json(group))
}

/// List the caller's groups (GET /groups)
pub async fn list_groups(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = groups_for_user(&state.db_pool, user_id).await?;
    Ok(Json(groups))
}

/// Send a group message (POST /groups/{group_id}/messages)
///
/// # Errors
///
/// * `403 Forbidden` - Caller is not a member of the group
pub async fn send_group_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<i64>,
    Json(request): Json<GroupMessageCreate>,
) -> Result<Json<GroupMessage>, ApiError> {
    require_membership(&state, group_id, user_id).await?;

    let message = create_group_message(&state.db_pool, group_id, user_id, &request.content).await?;

    publish_group_message(&state.broker, &message)?;

    Ok(Json(message))
}

/// Fan a persisted group message out to the group's room
///
/// Delivery is best effort; failures surface only as a lower subscriber
/// count.
pub(crate) fn publish_group_message(
    broker: &RoomBroker,
    message: &GroupMessage,
) -> Result<(), ApiError> {
    let room = group_room(message.group_id);
    let delivered = broker.publish(&room, serde_json::to_value(message)?);
    tracing::debug!(
        "Group message {} published to {} ({} live subscribers)",
        message.id,
        room,
        delivered
    );
    Ok(())
}

/// List recent group messages (GET /groups/{group_id}/messages)
pub async fn get_group_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(group_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GroupMessage>>, ApiError> {
    require_membership(&state, group_id, user_id).await?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let messages = recent_group_messages(&state.db_pool, group_id, limit).await?;
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

    /// Oracle with a fixed membership table
    struct StaticOracle {
        members: Vec<(i64, i64)>, // (user_id, group_id)
    }

    #[async_trait]
    impl MembershipOracle for StaticOracle {
        async fn is_group_member(&self, user_id: i64, group_id: i64) -> Result<bool, sqlx::Error> {
            Ok(self.members.contains(&(user_id, group_id)))
        }
    }

    fn message(group_id: i64, sender_id: i64) -> GroupMessage {
        GroupMessage {
            id: 1,
            group_id,
            sender_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_write_fans_out_to_group_room() {
        let broker = RoomBroker::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(StaticOracle { members: vec![(3, 7), (9, 7)] }),
        );

        let member = Uuid::new_v4();
        let (tx, mut rx_member) = mpsc::channel(16);
        broker.connect(member, 3, tx).unwrap();
        broker.subscribe(member, "group:7").await;
        let _ = rx_member.try_recv();

        // A member who never subscribed receives nothing.
        let outsider = Uuid::new_v4();
        let (tx, mut rx_outsider) = mpsc::channel(16);
        broker.connect(outsider, 9, tx).unwrap();

        let message = message(7, 9);
        publish_group_message(&broker, &message).unwrap();

        assert_matches!(
            rx_member.try_recv().unwrap(),
            ServerEvent::Message { room, data }
                if room == "group:7" && data == serde_json::to_value(&message).unwrap()
        );
        assert!(rx_outsider.try_recv().is_err());
    }
}
