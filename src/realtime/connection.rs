/**
 * WebSocket Transport
 *
 * The `GET /ws` upgrade handler and the per-connection socket task.
 *
 * # Authentication Handshake
 *
 * The client supplies its token as a query parameter on the upgrade request
 * (`/ws?token=<jwt>`). The token is verified *before* the upgrade: a
 * missing, invalid or unknown-subject token refuses the connection with 401
 * and the socket is never opened, so an unauthenticated client cannot probe
 * room names. Every admitted connection therefore has a bound session from
 * its first frame.
 *
 * # Event Loop
 *
 * Each connection runs one reader loop and one writer task. The reader
 * decodes frames and dispatches them to the broker one at a time, which
 * linearizes that connection's protocol events in arrival order. The writer
 * drains the connection's bounded outbound queue into the socket. When the
 * reader ends (close frame, transport error, or EOF) the connection is torn
 * down and all its subscriptions are released.
 */

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::sessions::user_id_from_token;
use crate::auth::users::user_exists;
use crate::realtime::broker::RoomBroker;
use crate::realtime::events::{ClientEvent, ServerEvent};
use crate::realtime::registry::ConnectionId;
use crate::server::state::AppState;

/// Outbound queue capacity per connection. A client that lags this far
/// behind is treated as dead and dropped from the rooms it lags on.
const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Query parameters of the upgrade request
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// Handle WebSocket upgrade (GET /ws?token=...)
///
/// Verifies the credential before upgrading. All failure modes (missing
/// token, bad signature, expired, unknown subject, verifier unreachable)
/// collapse to a single 401 refusal; the remote end sees only a failed
/// connection attempt.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let token = match query.token {
        Some(token) => token,
        None => {
            tracing::debug!("[Realtime] Connection refused: no token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    let user_id = match user_id_from_token(&token) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("[Realtime] Connection refused: {}", e);
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    // The token subject must still exist; verifier errors fail closed.
    match user_exists(&state.db_pool, user_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("[Realtime] Connection refused: unknown user {}", user_id);
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(e) => {
            tracing::error!("[Realtime] User lookup failed during connect: {}", e);
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let broker = state.broker.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, broker, user_id))
}

/// Per-connection task: session lifecycle plus the read/write loops
async fn handle_socket(socket: WebSocket, broker: Arc<RoomBroker>, user_id: i64) {
    let conn_id: ConnectionId = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_QUEUE_CAPACITY);

    if let Err(e) = broker.connect(conn_id, user_id, tx) {
        tracing::error!("[Realtime] Failed to admit connection {}: {}", conn_id, e);
        return;
    }

    tracing::info!("[Realtime] Connection {} open for user {}", conn_id, user_id);

    let (mut sink, mut stream) = socket.split();

    // Writer: drain the outbound queue into the socket. Ends when every
    // sender is dropped (teardown) or the socket write fails.
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Realtime] Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader: one frame at a time, in arrival order.
    while let Some(result) = stream.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("[Realtime] Connection {} transport error: {}", conn_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_frame(&broker, conn_id, text.as_str()).await,
            Message::Close(_) => break,
            // Ping/pong are answered by axum; binary frames are ignored.
            _ => {}
        }
    }

    broker.disconnect(conn_id);
    writer.abort();
    tracing::info!("[Realtime] Connection {} closed", conn_id);
}

/// Decode one inbound frame and dispatch it to the broker
///
/// Protocol-level failures (missing room, malformed name, denial) are
/// reported as `error` events by the broker and the connection stays open.
async fn handle_frame(broker: &RoomBroker, conn_id: ConnectionId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Subscribe { room: Some(room) }) => {
            broker.subscribe(conn_id, &room).await;
        }
        Ok(ClientEvent::Unsubscribe { room: Some(room) }) => {
            broker.unsubscribe(conn_id, &room);
        }
        Ok(ClientEvent::Subscribe { room: None }) | Ok(ClientEvent::Unsubscribe { room: None }) => {
            broker.emit(conn_id, ServerEvent::missing_room());
        }
        Err(e) => {
            tracing::debug!("[Realtime] Undecodable frame from {}: {}", conn_id, e);
            broker.emit(conn_id, ServerEvent::unrecognized());
        }
    }
}
