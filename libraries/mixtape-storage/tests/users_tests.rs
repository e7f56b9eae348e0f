//! Integration tests for users and sessions
//!
//! Tests:
//! - Find-or-create keyed by external identity
//! - Session lifetime and idempotent deletion
//! - The `MixtapeStorage` facade over the slices

mod test_helpers;

use chrono::{Duration, Utc};
use mixtape_core::{types::*, MixtapeStorage};
use mixtape_storage::{sessions, users, LocalStorageContext};
use serde_json::json;
use test_helpers::*;

fn profile(id: &str, name: &str) -> ExternalProfile {
    ExternalProfile {
        id: id.to_string(),
        display_name: name.to_string(),
    }
}

#[tokio::test]
async fn test_find_or_create_inserts_once() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = users::find_or_create(pool, &profile("google-123", "Alice"))
        .await
        .expect("Failed to create user");
    assert_eq!(first.external_id, "google-123");
    assert_eq!(first.display_name, "Alice");

    let again = users::find_or_create(pool, &profile("google-123", "Alice"))
        .await
        .unwrap();
    assert_eq!(again.id, first.id);

    let all = users::get_all(pool).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_find_or_create_keeps_original_display_name() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = users::find_or_create(pool, &profile("google-123", "Alice")).await.unwrap();
    let renamed = users::find_or_create(pool, &profile("google-123", "Alice B.")).await.unwrap();

    assert_eq!(renamed.id, first.id);
    assert_eq!(renamed.display_name, "Alice");
}

#[tokio::test]
async fn test_distinct_external_ids_create_distinct_users() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = users::find_or_create(pool, &profile("g-1", "Alice")).await.unwrap();
    let bob = users::find_or_create(pool, &profile("g-2", "Bob")).await.unwrap();
    assert_ne!(alice.id, bob.id);

    let fetched = users::get_by_id(pool, &bob.id).await.unwrap().unwrap();
    assert_eq!(fetched, bob);

    // Sorted by display name
    let names: Vec<_> = users::get_all(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.display_name)
        .collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    assert!(users::get_by_id(pool, &UserId::new("nobody")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user_id = UserId::new("u1");

    let session = sessions::create(pool, &user_id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let live = sessions::get_live(pool, &session.id, Utc::now()).await.unwrap();
    assert_eq!(live.map(|s| s.user_id), Some(user_id));

    sessions::delete(pool, &session.id).await.unwrap();
    assert!(sessions::get_live(pool, &session.id, Utc::now()).await.unwrap().is_none());

    // Deleting twice is fine
    sessions::delete(pool, &session.id).await.unwrap();
}

#[tokio::test]
async fn test_expired_session_is_not_live_and_gets_purged() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let stale = sessions::create(pool, &UserId::new("u1"), Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    let fresh = sessions::create(pool, &UserId::new("u2"), Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    assert!(sessions::get_live(pool, &stale.id, Utc::now()).await.unwrap().is_none());

    let purged = sessions::delete_expired(pool, Utc::now()).await.unwrap();
    assert_eq!(purged, 1);
    assert!(sessions::get_live(pool, &fresh.id, Utc::now()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_storage_context_delegates_to_slices() {
    let test_db = TestDb::new().await;
    let storage = LocalStorageContext::new(test_db.pool().clone());

    let user = storage.find_or_create_user(&profile("g-9", "Dana")).await.unwrap();
    assert_eq!(storage.get_user(&user.id).await.unwrap(), Some(user.clone()));

    let tape = storage
        .store_playlist(new_tape(user.id.as_str(), vec![json!("t1")], true))
        .await
        .unwrap();

    let by_id = storage
        .retrieve_playlist(&PlaylistFilter::Id(tape.id.clone()))
        .await
        .unwrap();
    assert_eq!(by_id, Some(tape.clone()));

    assert_eq!(storage.list_public_playlists().await.unwrap().len(), 1);
    assert_eq!(storage.list_user_playlists(&user.id).await.unwrap().len(), 1);
    assert_eq!(storage.increment_views(&tape.id).await.unwrap().unwrap().views, 1);

    let session = storage
        .create_session(&user.id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert!(storage.get_live_session(&session.id).await.unwrap().is_some());

    storage.delete_session(&session.id).await.unwrap();
    assert!(storage.get_live_session(&session.id).await.unwrap().is_none());
}
