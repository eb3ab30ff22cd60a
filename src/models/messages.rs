use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/*
id UUID PRIMARY KEY,
sender_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
recipient_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
message_type message_type NOT NULL DEFAULT 'text',
content TEXT,
attachment_url TEXT,
is_read BOOLEAN NOT NULL DEFAULT FALSE,
read_at TIMESTAMPTZ,
created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

 */
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message_type: MessageType,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Whether content/attachment_url agrees with the type is the caller's
// responsibility; the store accepts any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    File,
    System,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message_type: MessageType,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
}

impl Message {
    /// Legacy serializer alias: `imageUrl` is only populated for image messages.
    pub fn legacy_image_url(&self) -> Option<&str> {
        if self.message_type == MessageType::Image {
            self.attachment_url.as_deref()
        } else {
            None
        }
    }
}
