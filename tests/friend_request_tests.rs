use social_messenger::error::AppError;
use social_messenger::models::accounts::{Account, NewAccount};
use social_messenger::models::friends::FriendRequestStatus;
use social_messenger::services::{accounts, friends};
use social_messenger::store::{MemStore, Store};

async fn register(store: &dyn Store, email: &str, name: &str) -> Account {
    accounts::register(
        store,
        NewAccount {
            email: email.to_string(),
            name: name.to_string(),
            avatar_url: None,
        },
    )
    .await
    .expect("register account")
}

#[tokio::test]
async fn duplicate_send_is_a_conflict() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;

    let request = friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect("first send succeeds");
    assert_eq!(request.status, FriendRequestStatus::Pending);

    let err = friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect_err("second send fails");
    assert!(matches!(err, AppError::Conflict(_)), "got {err}");

    // the reverse ordered pair is a distinct row
    friends::send_request(&store, bob.id, alice.id, None)
        .await
        .expect("reverse direction is allowed");
}

#[tokio::test]
async fn self_request_is_rejected() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;

    let err = friends::send_request(&store, alice.id, alice.id, None)
        .await
        .expect_err("self request fails");
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn request_to_unknown_user_is_not_found() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;

    let err = friends::send_request(&store, alice.id, uuid::Uuid::new_v4(), None)
        .await
        .expect_err("unknown receiver fails");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn accept_transitions_once() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;

    friends::send_request(&store, alice.id, bob.id, Some("hi".into()))
        .await
        .expect("send");

    let accepted = friends::accept_request(&store, bob.id, alice.id)
        .await
        .expect("accept");
    assert_eq!(accepted.status, FriendRequestStatus::Accepted);

    // the pending filter no longer matches; this is the idempotence boundary
    let err = friends::accept_request(&store, bob.id, alice.id)
        .await
        .expect_err("second accept fails");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn sending_to_an_existing_friend_is_a_conflict() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;

    friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect("send");
    friends::accept_request(&store, bob.id, alice.id)
        .await
        .expect("accept");

    let err = friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect_err("resend to a friend fails");
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn cancel_deletes_the_pending_row() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;

    friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect("send");
    friends::cancel_request(&store, alice.id, bob.id)
        .await
        .expect("cancel");

    assert!(friends::my_requests(&store, alice.id)
        .await
        .expect("list")
        .is_empty());

    let err = friends::cancel_request(&store, alice.id, bob.id)
        .await
        .expect_err("second cancel fails");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn remove_friend_only_matches_the_requesting_direction() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;

    // Bob was the original requester, so the row is (sender=bob, receiver=alice).
    friends::send_request(&store, bob.id, alice.id, None)
        .await
        .expect("send");
    friends::accept_request(&store, alice.id, bob.id)
        .await
        .expect("accept");

    // Bob removing Alice looks for (sender=alice, receiver=bob); no such row.
    let err = friends::remove_friend(&store, bob.id, alice.id)
        .await
        .expect_err("wrong direction fails");
    assert!(matches!(err, AppError::NotFound(_)));

    let demoted = friends::remove_friend(&store, alice.id, bob.id)
        .await
        .expect("matching direction demotes");
    assert_eq!(demoted.status, FriendRequestStatus::Pending);
}

#[tokio::test]
async fn overview_merges_both_directions_and_pending_senders() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;
    let carol = register(&store, "carol@example.com", "Carol").await;
    let dave = register(&store, "dave@example.com", "Dave").await;

    // alice -> bob accepted, dave -> alice accepted, carol -> alice pending
    friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect("send");
    friends::accept_request(&store, bob.id, alice.id)
        .await
        .expect("accept");
    friends::send_request(&store, dave.id, alice.id, None)
        .await
        .expect("send");
    friends::accept_request(&store, alice.id, dave.id)
        .await
        .expect("accept");
    friends::send_request(&store, carol.id, alice.id, None)
        .await
        .expect("send");

    let overview = friends::friends_overview(&store, alice.id)
        .await
        .expect("overview");

    let mut friend_ids: Vec<_> = overview.friends.iter().map(|a| a.id).collect();
    friend_ids.sort();
    let mut expected = vec![bob.id, dave.id];
    expected.sort();
    assert_eq!(friend_ids, expected);

    assert_eq!(overview.pending.len(), 1);
    assert_eq!(overview.pending[0].sender.id, carol.id);
    assert_eq!(overview.pending[0].request.sender_id, carol.id);
}

#[tokio::test]
async fn overview_for_unknown_user_is_not_found() {
    let store = MemStore::new();
    let err = friends::friends_overview(&store, uuid::Uuid::new_v4())
        .await
        .expect_err("unknown user fails");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn discoverable_users_exclude_self_and_friends() {
    let store = MemStore::new();
    let alice = register(&store, "alice@example.com", "Alice").await;
    let bob = register(&store, "bob@example.com", "Bob").await;
    let carol = register(&store, "carol@example.com", "Carol").await;
    let dave = register(&store, "dave@example.com", "Dave").await;

    // bob is a friend, carol only has a pending request towards alice
    friends::send_request(&store, alice.id, bob.id, None)
        .await
        .expect("send");
    friends::accept_request(&store, bob.id, alice.id)
        .await
        .expect("accept");
    friends::send_request(&store, carol.id, alice.id, None)
        .await
        .expect("send");

    let discoverable = accounts::discoverable_users(&store, alice.id)
        .await
        .expect("list");
    let ids: Vec<_> = discoverable.iter().map(|a| a.id).collect();

    assert!(!ids.contains(&alice.id));
    assert!(!ids.contains(&bob.id));
    assert!(ids.contains(&carol.id), "pending sender stays discoverable");
    assert!(ids.contains(&dave.id));

    // the unfiltered listing only drops the acting user
    let all = accounts::all_users(&store, alice.id).await.expect("all");
    assert_eq!(all.len(), 3);
}
