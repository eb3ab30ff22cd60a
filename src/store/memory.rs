use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::accounts::{Account, NewAccount};
use crate::models::friends::{FriendRequest, FriendRequestStatus};
use crate::models::messages::{Message, NewMessage};
use crate::store::{FriendRequestFilter, MessageFilter, SortOrder, Store};

/// In-memory `Store` with the same observable semantics as `PgStore`,
/// including the uniqueness constraints. Used by the test suite.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    requests: Vec<FriendRequest>,
    messages: Vec<Message>,
    next_request_id: i32,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

fn request_matches(request: &FriendRequest, filter: &FriendRequestFilter) -> bool {
    if let Some(sender) = filter.sender {
        if request.sender_id != sender {
            return false;
        }
    }
    if let Some(receiver) = filter.receiver {
        if request.receiver_id != receiver {
            return false;
        }
    }
    if let Some(user) = filter.involving {
        if request.sender_id != user && request.receiver_id != user {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if request.status != status {
            return false;
        }
    }
    true
}

fn message_matches(message: &Message, filter: &MessageFilter) -> bool {
    if let Some((a, b)) = filter.between {
        let forward = message.sender_id == a && message.recipient_id == b;
        let backward = message.sender_id == b && message.recipient_id == a;
        if !forward && !backward {
            return false;
        }
    }
    if let Some(user) = filter.participant {
        if message.sender_id != user && message.recipient_id != user {
            return false;
        }
    }
    true
}

// Stable sorts keep insertion order within equal timestamps, matching the
// serial-id tie-break in the SQL queries.
fn sort_requests(requests: &mut [FriendRequest], order: SortOrder) {
    match order {
        SortOrder::Ascending => {
            requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        }
        SortOrder::Descending => {
            requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
        }
    }
}

fn sort_messages(messages: &mut [Message], order: SortOrder) {
    match order {
        SortOrder::Ascending => messages.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Descending => messages.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert_account(&self, account: NewAccount) -> AppResult<Account> {
        let mut inner = self.lock();
        if inner.accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::Conflict(anyhow::anyhow!("Email already exists")));
        }
        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            email: account.email,
            name: account.name,
            avatar_url: account.avatar_url,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };
        inner.accounts.push(created.clone());
        Ok(created)
    }

    async fn account_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.lock().accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn accounts_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .lock()
            .accounts
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn accounts_excluding(&self, ids: &[Uuid]) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .lock()
            .accounts
            .iter()
            .filter(|a| !ids.contains(&a.id))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn insert_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> AppResult<FriendRequest> {
        let mut inner = self.lock();
        let duplicate = inner
            .requests
            .iter()
            .any(|r| r.sender_id == sender_id && r.receiver_id == receiver_id);
        if duplicate {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Friend request already exists"
            )));
        }
        inner.next_request_id += 1;
        let now = Utc::now();
        let created = FriendRequest {
            id: inner.next_request_id,
            sender_id,
            receiver_id,
            status: FriendRequestStatus::Pending,
            message,
            created_at: now,
            updated_at: now,
        };
        inner.requests.push(created.clone());
        Ok(created)
    }

    async fn find_friend_request(
        &self,
        filter: FriendRequestFilter,
    ) -> AppResult<Option<FriendRequest>> {
        Ok(self
            .lock()
            .requests
            .iter()
            .find(|r| request_matches(r, &filter))
            .cloned())
    }

    async fn list_friend_requests(
        &self,
        filter: FriendRequestFilter,
        order: SortOrder,
    ) -> AppResult<Vec<FriendRequest>> {
        let mut requests: Vec<FriendRequest> = self
            .lock()
            .requests
            .iter()
            .filter(|r| request_matches(r, &filter))
            .cloned()
            .collect();
        sort_requests(&mut requests, order);
        Ok(requests)
    }

    async fn update_friend_request_status(
        &self,
        filter: FriendRequestFilter,
        status: FriendRequestStatus,
    ) -> AppResult<Option<FriendRequest>> {
        let mut inner = self.lock();
        let request = inner
            .requests
            .iter_mut()
            .find(|r| request_matches(r, &filter));
        match request {
            Some(request) => {
                request.status = status;
                request.updated_at = Utc::now();
                Ok(Some(request.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_friend_request(&self, filter: FriendRequestFilter) -> AppResult<bool> {
        let mut inner = self.lock();
        let before = inner.requests.len();
        inner.requests.retain(|r| !request_matches(r, &filter));
        Ok(inner.requests.len() < before)
    }

    async fn insert_message(&self, message: NewMessage) -> AppResult<Message> {
        let now = Utc::now();
        let created = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            message_type: message.message_type,
            content: message.content,
            attachment_url: message.attachment_url,
            is_read: false,
            read_at: None,
            created_at: now,
            updated_at: now,
        };
        self.lock().messages.push(created.clone());
        Ok(created)
    }

    async fn message_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn list_messages(
        &self,
        filter: MessageFilter,
        order: SortOrder,
    ) -> AppResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| message_matches(m, &filter))
            .cloned()
            .collect();
        sort_messages(&mut messages, order);
        Ok(messages)
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>> {
        let mut inner = self.lock();
        let message = inner.messages.iter_mut().find(|m| m.id == id);
        match message {
            Some(message) => {
                if !message.is_read {
                    let now = Utc::now();
                    message.is_read = true;
                    message.read_at = Some(now);
                    message.updated_at = now;
                }
                Ok(Some(message.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_messages_from_sender(&self, ids: &[Uuid], sender_id: Uuid) -> AppResult<u64> {
        let mut inner = self.lock();
        let before = inner.messages.len();
        inner
            .messages
            .retain(|m| !(ids.contains(&m.id) && m.sender_id == sender_id));
        Ok((before - inner.messages.len()) as u64)
    }
}
