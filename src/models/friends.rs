use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/*
id SERIAL PRIMARY KEY,
sender_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
receiver_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
status friend_request_status NOT NULL DEFAULT 'pending',
message TEXT,
created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
UNIQUE (sender_id, receiver_id),

 */
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FriendRequest {
    pub id: i32,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl FriendRequest {
    /// The participant that is not `user_id`. Rows are always fetched through
    /// filters naming the user, so the caller knows the row involves them.
    pub fn other_party(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}
