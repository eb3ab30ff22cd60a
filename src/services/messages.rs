use anyhow::anyhow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::messages::{Message, MessageType, NewMessage};
use crate::store::{MessageFilter, SortOrder, Store};

/// Inserts an unread message. No check that content or attachment agrees with
/// the message type; that stays with the caller.
pub async fn send(
    store: &dyn Store,
    sender_id: Uuid,
    recipient_id: Uuid,
    message_type: MessageType,
    content: Option<String>,
    attachment_url: Option<String>,
) -> AppResult<Message> {
    if store.account_by_id(recipient_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow!("Recipient not found")));
    }
    store
        .insert_message(NewMessage {
            sender_id,
            recipient_id,
            message_type,
            content,
            attachment_url,
        })
        .await
}

/// Both directions between `user_a` and `user_b`, oldest first (chat display
/// order). Only a participant may read the conversation.
pub async fn conversation(
    store: &dyn Store,
    acting_user: Uuid,
    user_a: Uuid,
    user_b: Uuid,
) -> AppResult<Vec<Message>> {
    if acting_user != user_a && acting_user != user_b {
        return Err(AppError::Forbidden(anyhow!("Unauthorized access")));
    }
    let filter = MessageFilter {
        between: Some((user_a, user_b)),
        ..MessageFilter::default()
    };
    store.list_messages(filter, SortOrder::Ascending).await
}

/// Every message the user sent or received, oldest first.
pub async fn chats_for(
    store: &dyn Store,
    acting_user: Uuid,
    user_id: Uuid,
) -> AppResult<Vec<Message>> {
    if acting_user != user_id {
        return Err(AppError::Forbidden(anyhow!("Unauthorized access")));
    }
    let filter = MessageFilter {
        participant: Some(user_id),
        ..MessageFilter::default()
    };
    store.list_messages(filter, SortOrder::Ascending).await
}

/// Recipient-only; repeated calls are no-ops that leave read_at unchanged.
pub async fn mark_read(store: &dyn Store, acting_user: Uuid, message_id: Uuid) -> AppResult<Message> {
    let message = store
        .message_by_id(message_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Message not found")))?;

    if message.recipient_id != acting_user {
        return Err(AppError::Forbidden(anyhow!(
            "Only the recipient can mark a message as read"
        )));
    }
    if message.is_read {
        return Ok(message);
    }

    store
        .mark_message_read(message_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("Message not found")))
}

/// Deletes the listed messages that the acting user sent; everything else in
/// the list is silently skipped. Returns the number actually deleted.
pub async fn delete_messages(
    store: &dyn Store,
    acting_user: Uuid,
    message_ids: &[Uuid],
) -> AppResult<u64> {
    if message_ids.is_empty() {
        return Err(AppError::BadRequest(anyhow!("Invalid request body!")));
    }
    store
        .delete_messages_from_sender(message_ids, acting_user)
        .await
}
