use anyhow::anyhow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::accounts::{Account, NewAccount};
use crate::services::friends;
use crate::store::Store;

pub async fn register(store: &dyn Store, account: NewAccount) -> AppResult<Account> {
    store.insert_account(account).await
}

pub async fn profile(store: &dyn Store, user_id: Uuid) -> AppResult<Account> {
    store
        .account_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow!("User not found")))
}

/// Everyone except the acting user.
pub async fn all_users(store: &dyn Store, current_user: Uuid) -> AppResult<Vec<Account>> {
    store.accounts_excluding(&[current_user]).await
}

/// Everyone the acting user could still send a request to: all accounts
/// minus themselves and minus accepted friends in either direction.
pub async fn discoverable_users(store: &dyn Store, current_user: Uuid) -> AppResult<Vec<Account>> {
    let mut exclude = friends::accepted_friend_ids(store, current_user).await?;
    exclude.push(current_user);
    store.accounts_excluding(&exclude).await
}
