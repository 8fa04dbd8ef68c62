//! WebSocket chat endpoint
//!
//! One socket per conversation: the URL names the peer, the token names the
//! caller. Both sockets of a conversation share a room keyed by the ordered
//! user-id pair, and every event published to the room reaches both ends.

use crate::api::rest::error::Problem;
use crate::api::rest::extract::AuthUser;
use crate::contract::{AuthContext, MessageStatus, NewMessage};
use crate::domain::{ChatEvent, Presence, RoomKey};
use crate::infra::media::{decode_data_url, MediaKind};
use crate::state::AppState;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::Path;
use axum::response::Response;
use axum::Extension;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// `GET /ws/chat/{user_id}` - upgrade to a chat socket with the given peer
pub async fn chat_socket(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser(ctx): AuthUser,
    Path(peer_id): Path<i64>,
    upgrade: WebSocketUpgrade,
) -> Result<Response, Problem> {
    // Reject the handshake outright when the peer does not exist
    state.chat.username(peer_id).await?;

    Ok(upgrade.on_upgrade(move |socket| handle_socket(state, ctx, peer_id, socket)))
}

async fn handle_socket(state: Arc<AppState>, ctx: AuthContext, peer_id: i64, socket: WebSocket) {
    let username = match state.chat.username(ctx.user_id).await {
        Ok(username) => username,
        Err(error) => {
            tracing::warn!(user_id = ctx.user_id, %error, "chat socket rejected");
            return;
        }
    };

    let room = RoomKey::for_pair(ctx.user_id, peer_id);
    let handle = state.rooms.join(&room);
    let mut events = handle.receiver;

    tracing::debug!(room = %room, user_id = ctx.user_id, "chat socket connected");
    state.rooms.publish(
        &room,
        ChatEvent::Presence {
            user_id: ctx.user_id,
            presence: Presence::Online,
        },
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if !forward(&mut ws_tx, &event).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(room = %room, skipped, "chat socket lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_frame(&state, &ctx, &username, peer_id, &room, text.as_str()).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::debug!(room = %room, %error, "chat socket read error");
                        break;
                    }
                }
            }
        }
    }

    drop(events);
    drop(ws_rx);
    state.rooms.publish(
        &room,
        ChatEvent::Presence {
            user_id: ctx.user_id,
            presence: Presence::Offline,
        },
    );
    state.rooms.leave(&room);
    tracing::debug!(room = %room, user_id = ctx.user_id, "chat socket closed");
}

async fn forward(ws_tx: &mut SplitSink<WebSocket, WsMessage>, event: &ChatEvent) -> bool {
    let frame = event.to_frame().to_string();
    ws_tx.send(WsMessage::Text(frame.into())).await.is_ok()
}

/// A single inbound frame after parsing and type dispatch
#[derive(Debug)]
enum Inbound {
    Text {
        body: String,
        client_id: String,
    },
    File {
        payload: String,
        filename: String,
        caption: Option<String>,
        client_id: String,
    },
    Voice {
        payload: String,
        client_id: String,
    },
    Receipt {
        ids: Vec<i64>,
        status: MessageStatus,
    },
    Signal(Value),
}

/// Parse an inbound frame. `None` means the frame is malformed, of an
/// unknown type, or missing its payload, and gets dropped.
fn parse_frame(text: &str) -> Option<Inbound> {
    let value: Value = serde_json::from_str(text).ok()?;
    let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "text" => Some(Inbound::Text {
            body: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            client_id: client_id(&value),
        }),
        "file" => Some(Inbound::File {
            payload: value.get("file_b64").and_then(Value::as_str)?.to_string(),
            filename: value
                .get("filename")
                .and_then(Value::as_str)
                .unwrap_or("attachment.bin")
                .to_string(),
            caption: value
                .get("message")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
            client_id: client_id(&value),
        }),
        "audio" | "voice_note" => Some(Inbound::Voice {
            payload: voice_payload(&value)?.to_string(),
            client_id: client_id(&value),
        }),
        "delivered" => Some(Inbound::Receipt {
            ids: message_ids(&value),
            status: MessageStatus::Delivered,
        }),
        "seen" => Some(Inbound::Receipt {
            ids: message_ids(&value),
            status: MessageStatus::Seen,
        }),
        "call_offer" | "call_answer" | "ice_candidate" | "call_end" => {
            Some(Inbound::Signal(value))
        }
        _ => None,
    }
}

/// Dispatch a single inbound frame; errors are logged but never kill the socket
async fn handle_frame(
    state: &AppState,
    ctx: &AuthContext,
    username: &str,
    peer_id: i64,
    room: &RoomKey,
    text: &str,
) {
    let Some(frame) = parse_frame(text) else {
        tracing::debug!(room = %room, "discarding unrecognized chat frame");
        return;
    };

    let outcome = match frame {
        Inbound::Text { body, client_id } => {
            text_message(state, ctx, username, peer_id, room, body, client_id).await
        }
        Inbound::File {
            payload,
            filename,
            caption,
            client_id,
        } => {
            file_message(
                state, ctx, username, peer_id, room, &payload, &filename, caption, client_id,
            )
            .await
        }
        Inbound::Voice { payload, client_id } => {
            voice_message(state, ctx, username, peer_id, room, &payload, client_id).await
        }
        Inbound::Receipt { ids, status } => receipt(state, ctx, room, ids, status).await,
        Inbound::Signal(value) => {
            state.rooms.publish(room, ChatEvent::Signal(value));
            Ok(())
        }
    };

    if let Err(error) = outcome {
        tracing::warn!(room = %room, %error, "chat frame failed");
    }
}

async fn text_message(
    state: &AppState,
    ctx: &AuthContext,
    username: &str,
    peer_id: i64,
    room: &RoomKey,
    body: String,
    client_id: String,
) -> anyhow::Result<()> {
    let saved = state
        .chat
        .save_message(
            ctx.user_id,
            peer_id,
            NewMessage {
                body: Some(body),
                audio_path: None,
                attachment_path: None,
                client_id: Some(client_id),
            },
        )
        .await?;

    publish_message(state, room, username, saved);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn file_message(
    state: &AppState,
    ctx: &AuthContext,
    username: &str,
    peer_id: i64,
    room: &RoomKey,
    payload: &str,
    filename: &str,
    caption: Option<String>,
    client_id: String,
) -> anyhow::Result<()> {
    let bytes = decode_data_url(payload)?;
    let path = state
        .media
        .save(MediaKind::ChatFiles, filename, &bytes)
        .await?;

    let saved = state
        .chat
        .save_message(
            ctx.user_id,
            peer_id,
            NewMessage {
                body: caption,
                audio_path: None,
                attachment_path: Some(path),
                client_id: Some(client_id),
            },
        )
        .await?;

    publish_message(state, room, username, saved);
    Ok(())
}

async fn voice_message(
    state: &AppState,
    ctx: &AuthContext,
    username: &str,
    peer_id: i64,
    room: &RoomKey,
    payload: &str,
    client_id: String,
) -> anyhow::Result<()> {
    let filename = format!("voice_{}_{}.webm", ctx.user_id, client_id);

    let bytes = decode_data_url(payload)?;
    let path = state
        .media
        .save(MediaKind::ChatAudio, &filename, &bytes)
        .await?;

    let saved = state
        .chat
        .save_message(
            ctx.user_id,
            peer_id,
            NewMessage {
                body: None,
                audio_path: Some(path),
                attachment_path: None,
                client_id: Some(client_id),
            },
        )
        .await?;

    publish_message(state, room, username, saved);
    Ok(())
}

async fn receipt(
    state: &AppState,
    ctx: &AuthContext,
    room: &RoomKey,
    ids: Vec<i64>,
    status: MessageStatus,
) -> anyhow::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    state.chat.mark_status(&ids, status).await?;
    state.rooms.publish(
        room,
        ChatEvent::Delivery {
            message_ids: ids,
            user_id: ctx.user_id,
            status,
        },
    );
    Ok(())
}

fn publish_message(
    state: &AppState,
    room: &RoomKey,
    username: &str,
    saved: crate::contract::Message,
) {
    state.rooms.publish(
        room,
        ChatEvent::Message {
            id: saved.id,
            client_id: saved.client_id.unwrap_or_default(),
            sender_id: saved.sender_id,
            sender_username: username.to_string(),
            body: saved.body.unwrap_or_default(),
            timestamp: saved.created_at,
            status: saved.status,
            voice_note_url: saved
                .audio_path
                .as_deref()
                .map(crate::infra::media::MediaStore::url),
            file_url: saved
                .attachment_path
                .as_deref()
                .map(crate::infra::media::MediaStore::url),
        },
    );
}

/// Client-assigned correlation id; generated when the client omits one
fn client_id(value: &Value) -> String {
    value
        .get("client_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Voice payloads arrive under `audio` or `audio_data` depending on the
/// client code path
fn voice_payload(value: &Value) -> Option<&str> {
    ["audio", "audio_data"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
}

/// Accept `"msg_ids": [1, 2]`, a bare `"msg_ids": 1`, and `"msg_id": 1`
fn message_ids(value: &Value) -> Vec<i64> {
    if let Some(ids) = value.get("msg_ids") {
        if let Some(list) = ids.as_array() {
            return list.iter().filter_map(Value::as_i64).collect();
        }
        if let Some(id) = ids.as_i64() {
            return vec![id];
        }
    }
    value
        .get("msg_id")
        .and_then(Value::as_i64)
        .map(|id| vec![id])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_frames_are_discarded() {
        assert!(parse_frame("not json at all").is_none());
        assert!(parse_frame("{\"type\":").is_none());
        assert!(parse_frame("42").is_none());
    }

    #[test]
    fn unknown_frame_types_are_discarded() {
        assert!(parse_frame(&json!({"type": "typing"}).to_string()).is_none());
        assert!(parse_frame(&json!({"message": "no type at all"}).to_string()).is_none());
    }

    #[test]
    fn missing_or_empty_client_id_gets_a_generated_one() {
        for frame in [
            json!({"type": "text", "message": "hi"}),
            json!({"type": "text", "message": "hi", "client_id": ""}),
        ] {
            match parse_frame(&frame.to_string()) {
                Some(Inbound::Text { body, client_id }) => {
                    assert_eq!(body, "hi");
                    assert!(Uuid::parse_str(&client_id).is_ok());
                }
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    #[test]
    fn supplied_client_id_is_preserved() {
        let frame = json!({"type": "text", "message": "hi", "client_id": "c42"});
        match parse_frame(&frame.to_string()) {
            Some(Inbound::Text { client_id, .. }) => assert_eq!(client_id, "c42"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn receipt_ids_accept_list_scalar_and_legacy_forms() {
        let list = json!({"type": "seen", "msg_ids": [1, 2, 3]});
        match parse_frame(&list.to_string()) {
            Some(Inbound::Receipt { ids, status }) => {
                assert_eq!(ids, vec![1, 2, 3]);
                assert_eq!(status, MessageStatus::Seen);
            }
            other => panic!("unexpected frame: {other:?}"),
        }

        let scalar = json!({"type": "delivered", "msg_ids": 5});
        match parse_frame(&scalar.to_string()) {
            Some(Inbound::Receipt { ids, status }) => {
                assert_eq!(ids, vec![5]);
                assert_eq!(status, MessageStatus::Delivered);
            }
            other => panic!("unexpected frame: {other:?}"),
        }

        let single = json!({"type": "delivered", "msg_id": 7});
        match parse_frame(&single.to_string()) {
            Some(Inbound::Receipt { ids, .. }) => assert_eq!(ids, vec![7]),
            other => panic!("unexpected frame: {other:?}"),
        }

        let none = json!({"type": "seen"});
        match parse_frame(&none.to_string()) {
            Some(Inbound::Receipt { ids, .. }) => assert!(ids.is_empty()),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn voice_payload_field_has_two_spellings() {
        for key in ["audio", "audio_data"] {
            let frame = json!({"type": "voice_note", key: "AAAA", "client_id": "c1"});
            match parse_frame(&frame.to_string()) {
                Some(Inbound::Voice { payload, client_id }) => {
                    assert_eq!(payload, "AAAA");
                    assert_eq!(client_id, "c1");
                }
                other => panic!("unexpected frame: {other:?}"),
            }
        }

        // No payload at all: drop the frame rather than save an empty note
        assert!(parse_frame(&json!({"type": "audio"}).to_string()).is_none());
    }

    #[test]
    fn file_frames_need_a_payload() {
        assert!(parse_frame(&json!({"type": "file", "filename": "a.pdf"}).to_string()).is_none());

        let frame = json!({
            "type": "file",
            "file_b64": "data:application/pdf;base64,AAAA",
            "message": "lab report"
        });
        match parse_frame(&frame.to_string()) {
            Some(Inbound::File {
                filename, caption, ..
            }) => {
                assert_eq!(filename, "attachment.bin");
                assert_eq!(caption.as_deref(), Some("lab report"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn signaling_frames_pass_through_verbatim() {
        let frame = json!({"type": "call_offer", "offer": {"sdp": "v=0"}});
        match parse_frame(&frame.to_string()) {
            Some(Inbound::Signal(value)) => assert_eq!(value, frame),
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
