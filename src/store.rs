pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::accounts::{Account, NewAccount};
use crate::models::friends::{FriendRequest, FriendRequestStatus};
use crate::models::messages::{Message, NewMessage};

pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Predicate over friend_requests rows. Every `Some` field is ANDed into the
/// query; `involving` matches the user on either side of the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FriendRequestFilter {
    pub sender: Option<Uuid>,
    pub receiver: Option<Uuid>,
    pub involving: Option<Uuid>,
    pub status: Option<FriendRequestStatus>,
}

impl FriendRequestFilter {
    pub fn pair(sender: Uuid, receiver: Uuid) -> Self {
        Self {
            sender: Some(sender),
            receiver: Some(receiver),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: FriendRequestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Predicate over messages rows. `between` matches both directions of the
/// pair; `participant` matches the user as sender or recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter {
    pub between: Option<(Uuid, Uuid)>,
    pub participant: Option<Uuid>,
}

/// Storage interface for the three tables. Service logic depends only on this
/// trait; `PgStore` backs it in production and `MemStore` in tests.
///
/// `update_friend_request_status` and `delete_friend_request` expect filters
/// that identify at most one row (the (sender, receiver) pair is unique); the
/// status filter doubles as the atomicity boundary for state transitions.
#[async_trait]
pub trait Store: Send + Sync {
    // accounts
    async fn insert_account(&self, account: NewAccount) -> AppResult<Account>;
    async fn account_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    async fn accounts_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Account>>;
    async fn accounts_excluding(&self, ids: &[Uuid]) -> AppResult<Vec<Account>>;

    // friend requests
    async fn insert_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> AppResult<FriendRequest>;
    async fn find_friend_request(
        &self,
        filter: FriendRequestFilter,
    ) -> AppResult<Option<FriendRequest>>;
    async fn list_friend_requests(
        &self,
        filter: FriendRequestFilter,
        order: SortOrder,
    ) -> AppResult<Vec<FriendRequest>>;
    async fn update_friend_request_status(
        &self,
        filter: FriendRequestFilter,
        status: FriendRequestStatus,
    ) -> AppResult<Option<FriendRequest>>;
    async fn delete_friend_request(&self, filter: FriendRequestFilter) -> AppResult<bool>;

    // messages
    async fn insert_message(&self, message: NewMessage) -> AppResult<Message>;
    async fn message_by_id(&self, id: Uuid) -> AppResult<Option<Message>>;
    async fn list_messages(
        &self,
        filter: MessageFilter,
        order: SortOrder,
    ) -> AppResult<Vec<Message>>;
    /// Sets is_read/read_at if the message is still unread; repeated calls
    /// leave read_at untouched. `None` means no such message exists.
    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>>;
    /// Deletes the listed messages owned by `sender_id`, silently skipping the
    /// rest. Returns the number of rows deleted.
    async fn delete_messages_from_sender(&self, ids: &[Uuid], sender_id: Uuid) -> AppResult<u64>;
}
