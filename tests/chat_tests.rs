//! Integration tests for one-to-one chat persistence and fan-out

mod common;

use campus_portal::contract::{MessageStatus, NewMessage, PortalError};
use campus_portal::domain::{ChatEvent, RoomKey, RoomRegistry};
use common::TestPortal;

fn text(body: &str, client_id: &str) -> NewMessage {
    NewMessage {
        body: Some(body.to_string()),
        client_id: Some(client_id.to_string()),
        ..NewMessage::default()
    }
}

#[tokio::test]
async fn contacts_are_shaped_by_role() {
    let portal = TestPortal::new();
    let admin = portal.seed_admin().await;
    let (_, lecturer) = portal.seed_lecturer("drkline", "Networking").await;
    let (_, student) = portal.seed_student("amina", "Networking").await;

    let seen_by_student = portal.chat.contacts(&student).await.unwrap();
    assert_eq!(seen_by_student.len(), 1);
    assert_eq!(seen_by_student[0].user.username, "drkline");

    let seen_by_lecturer = portal.chat.contacts(&lecturer).await.unwrap();
    assert_eq!(seen_by_lecturer.len(), 1);
    assert_eq!(seen_by_lecturer[0].user.username, "amina");

    assert!(portal.chat.contacts(&admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_requires_an_existing_peer() {
    let portal = TestPortal::new();
    let (_, student) = portal.seed_student("amina", "Networking").await;

    let err = portal.chat.history(&student, 999).await.unwrap_err();
    assert!(matches!(err, PortalError::NotFound { .. }));
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let portal = TestPortal::new();
    let (student, _) = portal.seed_student("amina", "Networking").await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    let err = portal
        .chat
        .save_message(student.user.id, lecturer.user.id, NewMessage::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));
}

#[tokio::test]
async fn conversation_interleaves_both_directions_oldest_first() {
    let portal = TestPortal::new();
    let (student, student_ctx) = portal.seed_student("amina", "Networking").await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    portal
        .chat
        .save_message(student.user.id, lecturer.user.id, text("hello", "c1"))
        .await
        .unwrap();
    portal
        .chat
        .save_message(lecturer.user.id, student.user.id, text("hi amina", "c2"))
        .await
        .unwrap();
    portal
        .chat
        .save_message(student.user.id, lecturer.user.id, text("question about lab 1", "c3"))
        .await
        .unwrap();

    let history = portal
        .chat
        .history(&student_ctx, lecturer.user.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].body.as_deref(), Some("hello"));
    assert_eq!(history[1].sender_id, lecturer.user.id);
    assert_eq!(history[2].client_id.as_deref(), Some("c3"));
}

#[tokio::test]
async fn message_status_advances_from_sent_to_seen() {
    let portal = TestPortal::new();
    let (student, student_ctx) = portal.seed_student("amina", "Networking").await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    let saved = portal
        .chat
        .save_message(student.user.id, lecturer.user.id, text("hello", "c1"))
        .await
        .unwrap();
    assert_eq!(saved.status, MessageStatus::Sent);

    portal
        .chat
        .mark_status(&[saved.id], MessageStatus::Delivered)
        .await
        .unwrap();
    portal
        .chat
        .mark_status(&[saved.id], MessageStatus::Seen)
        .await
        .unwrap();

    let history = portal
        .chat
        .history(&student_ctx, lecturer.user.id)
        .await
        .unwrap();
    assert_eq!(history[0].status, MessageStatus::Seen);

    // Receipts never move a message back to sent
    let err = portal
        .chat
        .mark_status(&[saved.id], MessageStatus::Sent)
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation { .. }));
}

#[tokio::test]
async fn marking_no_messages_is_a_no_op() {
    let portal = TestPortal::new();
    portal
        .chat
        .mark_status(&[], MessageStatus::Seen)
        .await
        .unwrap();
}

#[tokio::test]
async fn voice_and_file_messages_need_no_body() {
    let portal = TestPortal::new();
    let (student, _) = portal.seed_student("amina", "Networking").await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    let voice = portal
        .chat
        .save_message(
            student.user.id,
            lecturer.user.id,
            NewMessage {
                audio_path: Some("chat_audio/voice_1_c1.webm".to_string()),
                client_id: Some("c1".to_string()),
                ..NewMessage::default()
            },
        )
        .await
        .unwrap();
    assert!(voice.body.is_none());
    assert!(voice.audio_path.is_some());

    let attachment = portal
        .chat
        .save_message(
            lecturer.user.id,
            student.user.id,
            NewMessage {
                attachment_path: Some("chat_files/notes.pdf".to_string()),
                client_id: Some("c2".to_string()),
                ..NewMessage::default()
            },
        )
        .await
        .unwrap();
    assert!(attachment.attachment_path.is_some());
}

#[tokio::test]
async fn saved_message_event_carries_media_urls() {
    let portal = TestPortal::new();
    let (student, _) = portal.seed_student("amina", "Networking").await;
    let (lecturer, _) = portal.seed_lecturer("drkline", "Networking").await;

    let registry = RoomRegistry::new(16);
    let room = RoomKey::for_pair(student.user.id, lecturer.user.id);
    let mut receiver = registry.join(&room).receiver;

    let saved = portal
        .chat
        .save_message(
            student.user.id,
            lecturer.user.id,
            NewMessage {
                audio_path: Some("chat/audio/voice_1_c9.webm".to_string()),
                client_id: Some("c9".to_string()),
                ..NewMessage::default()
            },
        )
        .await
        .unwrap();

    registry.publish(
        &room,
        ChatEvent::Message {
            id: saved.id,
            client_id: "c9".to_string(),
            sender_id: saved.sender_id,
            sender_username: "amina".to_string(),
            body: String::new(),
            timestamp: saved.created_at,
            status: saved.status,
            voice_note_url: Some("/media/chat/audio/voice_1_c9.webm".to_string()),
            file_url: None,
        },
    );

    let frame = receiver.recv().await.unwrap().to_frame();
    assert_eq!(frame["type"], "message");
    assert_eq!(frame["client_id"], "c9");
    assert_eq!(frame["status"], "sent");
    assert_eq!(frame["voice_note"], "/media/chat/audio/voice_1_c9.webm");
    assert!(frame["file"].is_null());
}
