/**
 * Realtime Wire Protocol
 *
 * JSON text frames exchanged over the WebSocket. Every frame carries an
 * `event` tag; remaining fields depend on the event.
 *
 * # Client → server
 *
 * - `{"event": "subscribe", "room": "group:7"}`
 * - `{"event": "unsubscribe", "room": "group:7"}`
 *
 * # Server → client
 *
 * Field names are fixed for client compatibility:
 *
 * - `{"event": "subscribed", "room": ...}`
 * - `{"event": "unsubscribed", "room": ...}`
 * - `{"event": "error", "message": ...}`
 * - `{"event": "message", "room": ..., "data": <opaque JSON>}`
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A frame sent by the client
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Request to join a room
    Subscribe {
        /// Room name; a missing field is reported as a protocol error, not
        /// a decode failure
        #[serde(default)]
        room: Option<String>,
    },
    /// Request to leave a room
    Unsubscribe {
        #[serde(default)]
        room: Option<String>,
    },
}

/// A frame emitted by the server to one connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Acknowledgment of a successful subscribe
    Subscribed { room: String },
    /// Acknowledgment of an unsubscribe (emitted even for rooms never
    /// joined)
    Unsubscribed { room: String },
    /// Protocol-level failure; the connection stays open
    Error { message: String },
    /// Fan-out delivery of a published payload
    Message { room: String, data: Value },
}

impl ServerEvent {
    /// Error frame for a subscribe/unsubscribe with no `room` field
    pub fn missing_room() -> Self {
        Self::Error {
            message: "Missing room".to_string(),
        }
    }

    /// Error frame for a malformed or unauthorized room
    ///
    /// The same message covers both cases so a caller cannot distinguish
    /// "room does not exist" from "not allowed".
    pub fn not_authorized() -> Self {
        Self::Error {
            message: "Not authorized for room".to_string(),
        }
    }

    /// Error frame for an undecodable inbound frame
    pub fn unrecognized() -> Self {
        Self::Error {
            message: "Unrecognized event".to_string(),
        }
    }
}
