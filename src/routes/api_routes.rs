/**
 * API Route Handlers
 *
 * This module wires the JSON API endpoints:
 *
 * ## Authentication
 * - `POST /auth/register` - User registration
 * - `POST /auth/login` - User login
 * - `GET /auth/me` - Get current user info (requires token)
 *
 * ## Private messages
 * - `POST /messages/private` - Send a private message
 * - `GET /messages/private/{other_user_id}` - Conversation listing
 *
 * ## Groups
 * - `POST /groups` - Create a group
 * - `GET /groups` - List the caller's groups
 * - `POST /groups/{group_id}/messages` - Send a group message
 * - `GET /groups/{group_id}/messages` - Recent group messages
 *
 * Registration and login are public; everything else requires a bearer
 * token.
 */

use axum::routing::{get, post};
use axum::Router;

use crate::auth::{login, me, register};
use crate::groups::{create_group, get_group_messages, list_groups, send_group_message};
use crate::messaging::{get_private_messages, send_private_message};
use crate::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        // Private messages
        .route("/messages/private", post(send_private_message))
        .route("/messages/private/{other_user_id}", get(get_private_messages))
        // Groups
        .route("/groups", post(create_group).get(list_groups))
        .route(
            "/groups/{group_id}/messages",
            post(send_group_message).get(get_group_messages),
        )
}
