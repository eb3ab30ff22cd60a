use std::collections::HashMap;

use anyhow::anyhow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::accounts::Account;
use crate::models::friends::{FriendRequest, FriendRequestStatus};
use crate::store::{FriendRequestFilter, SortOrder, Store};

#[derive(Debug)]
pub struct FriendsOverview {
    pub friends: Vec<Account>,
    pub pending: Vec<PendingRequest>,
}

#[derive(Debug)]
pub struct PendingRequest {
    pub request: FriendRequest,
    pub sender: Account,
}

/// Inserts a pending request from `sender_id` to `receiver_id`. A row already
/// present for the ordered pair is a conflict; concurrent duplicates are
/// caught by the pair constraint inside the store.
pub async fn send_request(
    store: &dyn Store,
    sender_id: Uuid,
    receiver_id: Uuid,
    message: Option<String>,
) -> AppResult<FriendRequest> {
    if sender_id == receiver_id {
        return Err(AppError::BadRequest(anyhow!(
            "Cannot send a friend request to yourself"
        )));
    }
    if store.account_by_id(receiver_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow!("User not found")));
    }

    let existing = store
        .find_friend_request(FriendRequestFilter::pair(sender_id, receiver_id))
        .await?;
    if let Some(existing) = existing {
        return Err(match existing.status {
            FriendRequestStatus::Pending => AppError::Conflict(anyhow!(
                "Friend request already sent"
            )),
            FriendRequestStatus::Accepted => {
                AppError::Conflict(anyhow!("You are already friends"))
            }
            _ => AppError::Conflict(anyhow!("Friend request already exists")),
        });
    }

    store
        .insert_friend_request(sender_id, receiver_id, message)
        .await
}

/// Flips the unique (sender, receiver, pending) row to accepted. A second
/// accept finds no pending row and reports not-found; that is the intended
/// idempotence boundary.
pub async fn accept_request(
    store: &dyn Store,
    receiver_id: Uuid,
    sender_id: Uuid,
) -> AppResult<FriendRequest> {
    let filter =
        FriendRequestFilter::pair(sender_id, receiver_id).with_status(FriendRequestStatus::Pending);
    store
        .update_friend_request_status(filter, FriendRequestStatus::Accepted)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("No pending friend request found to accept")))
}

/// Deletes the sender's own pending request to `receiver_id`.
pub async fn cancel_request(
    store: &dyn Store,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> AppResult<()> {
    let filter =
        FriendRequestFilter::pair(sender_id, receiver_id).with_status(FriendRequestStatus::Pending);
    if store.delete_friend_request(filter).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(anyhow!(
            "No pending friend request found to cancel"
        )))
    }
}

/// Demotes an accepted request back to pending rather than deleting it.
/// Only rows where the other party was the original requester are matched;
/// the reverse direction is never checked.
pub async fn remove_friend(
    store: &dyn Store,
    current_user: Uuid,
    other_id: Uuid,
) -> AppResult<FriendRequest> {
    let filter = FriendRequestFilter::pair(other_id, current_user)
        .with_status(FriendRequestStatus::Accepted);
    store
        .update_friend_request_status(filter, FriendRequestStatus::Pending)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("No accepted friend found for that option")))
}

/// Every request the user appears in, newest first.
pub async fn my_requests(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<FriendRequest>> {
    let filter = FriendRequestFilter {
        involving: Some(user_id),
        ..FriendRequestFilter::default()
    };
    store
        .list_friend_requests(filter, SortOrder::Descending)
        .await
}

/// Ids of everyone the user has an accepted request with, either direction.
pub async fn accepted_friend_ids(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Uuid>> {
    let filter = FriendRequestFilter {
        involving: Some(user_id),
        status: Some(FriendRequestStatus::Accepted),
        ..FriendRequestFilter::default()
    };
    let accepted = store
        .list_friend_requests(filter, SortOrder::Descending)
        .await?;
    Ok(accepted.iter().map(|r| r.other_party(user_id)).collect())
}

/// Friends (accepted rows, both directions) plus the pending requests aimed
/// at the user, each resolved to the sender's account.
pub async fn friends_overview(store: &dyn Store, user_id: Uuid) -> AppResult<FriendsOverview> {
    if store.account_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow!("User not found")));
    }

    let friend_ids = accepted_friend_ids(store, user_id).await?;
    let friends = store.accounts_by_ids(&friend_ids).await?;

    let pending_filter = FriendRequestFilter {
        receiver: Some(user_id),
        status: Some(FriendRequestStatus::Pending),
        ..FriendRequestFilter::default()
    };
    let pending_rows = store
        .list_friend_requests(pending_filter, SortOrder::Descending)
        .await?;

    let sender_ids: Vec<Uuid> = pending_rows.iter().map(|r| r.sender_id).collect();
    let senders: HashMap<Uuid, Account> = store
        .accounts_by_ids(&sender_ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    // A pending row whose sender account vanished is dropped from the view.
    let pending = pending_rows
        .into_iter()
        .filter_map(|request| {
            senders.get(&request.sender_id).cloned().map(|sender| PendingRequest {
                request,
                sender,
            })
        })
        .collect();

    Ok(FriendsOverview { friends, pending })
}
