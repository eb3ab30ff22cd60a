use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::accounts::{Account, NewAccount};
use crate::models::friends::{FriendRequest, FriendRequestStatus};
use crate::models::messages::{Message, NewMessage};
use crate::store::{FriendRequestFilter, MessageFilter, SortOrder, Store};

/// `Store` backed by the shared PostgreSQL pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_request_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FriendRequestFilter) {
    let mut sep = " WHERE ";
    if let Some(sender) = filter.sender {
        builder.push(sep).push("sender_id = ").push_bind(sender);
        sep = " AND ";
    }
    if let Some(receiver) = filter.receiver {
        builder.push(sep).push("receiver_id = ").push_bind(receiver);
        sep = " AND ";
    }
    if let Some(user) = filter.involving {
        builder
            .push(sep)
            .push("(sender_id = ")
            .push_bind(user)
            .push(" OR receiver_id = ")
            .push_bind(user)
            .push(")");
        sep = " AND ";
    }
    if let Some(status) = filter.status {
        builder.push(sep).push("status = ").push_bind(status);
    }
}

fn push_message_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MessageFilter) {
    let mut sep = " WHERE ";
    if let Some((a, b)) = filter.between {
        builder
            .push(sep)
            .push("((sender_id = ")
            .push_bind(a)
            .push(" AND recipient_id = ")
            .push_bind(b)
            .push(") OR (sender_id = ")
            .push_bind(b)
            .push(" AND recipient_id = ")
            .push_bind(a)
            .push("))");
        sep = " AND ";
    }
    if let Some(user) = filter.participant {
        builder
            .push(sep)
            .push("(sender_id = ")
            .push_bind(user)
            .push(" OR recipient_id = ")
            .push_bind(user)
            .push(")");
    }
}

fn order_clause(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => " ORDER BY created_at ASC, id ASC",
        SortOrder::Descending => " ORDER BY created_at DESC, id DESC",
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_account(&self, account: NewAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, name, avatar_url) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(account.email)
        .bind(account.name)
        .bind(account.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(anyhow::anyhow!("Email already exists"));
                }
            }
            tracing::error!("account insert failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to create account: {}", e))
        })
    }

    async fn account_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("account lookup failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!("Failed to fetch account: {}", e))
            })
    }

    async fn accounts_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ANY($1) ORDER BY name ASC")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("account batch lookup failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!("Failed to fetch accounts: {}", e))
            })
    }

    async fn accounts_excluding(&self, ids: &[Uuid]) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE id <> ALL($1) ORDER BY name ASC",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("account listing failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to list accounts: {}", e))
        })
    }

    async fn insert_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> AppResult<FriendRequest> {
        sqlx::query_as::<_, FriendRequest>(
            "INSERT INTO friend_requests (sender_id, receiver_id, message, status) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(message)
        .bind(FriendRequestStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                // Concurrent duplicate sends land here via the pair constraint.
                if db_err.is_unique_violation() {
                    return AppError::Conflict(anyhow::anyhow!("Friend request already exists"));
                }
            }
            tracing::error!("friend request insert failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to send friend request: {}", e))
        })
    }

    async fn find_friend_request(
        &self,
        filter: FriendRequestFilter,
    ) -> AppResult<Option<FriendRequest>> {
        let mut builder = QueryBuilder::new("SELECT * FROM friend_requests");
        push_request_filter(&mut builder, &filter);
        builder
            .build_query_as::<FriendRequest>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("friend request lookup failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!(
                    "Failed to fetch friend request: {}",
                    e
                ))
            })
    }

    async fn list_friend_requests(
        &self,
        filter: FriendRequestFilter,
        order: SortOrder,
    ) -> AppResult<Vec<FriendRequest>> {
        let mut builder = QueryBuilder::new("SELECT * FROM friend_requests");
        push_request_filter(&mut builder, &filter);
        builder.push(order_clause(order));
        builder
            .build_query_as::<FriendRequest>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("friend request listing failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!(
                    "Failed to list friend requests: {}",
                    e
                ))
            })
    }

    async fn update_friend_request_status(
        &self,
        filter: FriendRequestFilter,
        status: FriendRequestStatus,
    ) -> AppResult<Option<FriendRequest>> {
        let mut builder = QueryBuilder::new("UPDATE friend_requests SET status = ");
        builder.push_bind(status);
        builder.push(", updated_at = now()");
        push_request_filter(&mut builder, &filter);
        builder.push(" RETURNING *");
        builder
            .build_query_as::<FriendRequest>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("friend request update failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!(
                    "Failed to update friend request: {}",
                    e
                ))
            })
    }

    async fn delete_friend_request(&self, filter: FriendRequestFilter) -> AppResult<bool> {
        let mut builder = QueryBuilder::new("DELETE FROM friend_requests");
        push_request_filter(&mut builder, &filter);
        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("friend request delete failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to delete friend request: {}", e))
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_message(&self, message: NewMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, sender_id, recipient_id, message_type, content, attachment_url) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(message.message_type)
        .bind(message.content)
        .bind(message.attachment_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("message insert failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to send message: {}", e))
        })
    }

    async fn message_by_id(&self, id: Uuid) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("message lookup failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!("Failed to fetch message: {}", e))
            })
    }

    async fn list_messages(
        &self,
        filter: MessageFilter,
        order: SortOrder,
    ) -> AppResult<Vec<Message>> {
        let mut builder = QueryBuilder::new("SELECT * FROM messages");
        push_message_filter(&mut builder, &filter);
        builder.push(order_clause(order));
        builder
            .build_query_as::<Message>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("message listing failed: {:?}", e);
                AppError::InternalServerError(anyhow::anyhow!("Failed to list messages: {}", e))
            })
    }

    async fn mark_message_read(&self, id: Uuid) -> AppResult<Option<Message>> {
        // The is_read guard keeps read_at stable across repeated calls.
        let updated = sqlx::query_as::<_, Message>(
            "UPDATE messages SET is_read = TRUE, read_at = now(), updated_at = now() \
             WHERE id = $1 AND is_read = FALSE RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("message read update failed: {:?}", e);
            AppError::InternalServerError(anyhow::anyhow!("Failed to mark message read: {}", e))
        })?;

        match updated {
            Some(message) => Ok(Some(message)),
            None => self.message_by_id(id).await,
        }
    }

    async fn delete_messages_from_sender(&self, ids: &[Uuid], sender_id: Uuid) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result =
            sqlx::query("DELETE FROM messages WHERE id = ANY($1) AND sender_id = $2")
                .bind(ids.to_vec())
                .bind(sender_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("message delete failed: {:?}", e);
                    AppError::InternalServerError(anyhow::anyhow!(
                        "Failed to delete messages: {}",
                        e
                    ))
                })?;
        Ok(result.rows_affected())
    }
}
