//! PostgreSQL store tests. They need a disposable database, named by
//! `TEST_DATABASE_URL`, and return early when it is not set.

use std::{env, sync::Arc};

use poll_service::{
    db,
    store::{CredentialStore, PgStore, PollStore, StoreError},
};
use uuid::Uuid;

async fn store() -> Option<PgStore> {
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping PostgreSQL store test");
        return None;
    };
    let pool = db::create_pool(&url, 10).await.unwrap();
    db::ensure_schema(&pool).await.unwrap();
    Some(PgStore::new(pool))
}

#[tokio::test]
async fn usernames_are_unique() {
    let Some(store) = store().await else { return };
    let username = format!("user-{}", Uuid::new_v4());

    let saved = CredentialStore::save(&store, &username, "hash").await.unwrap();
    let found = store.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.id, saved.id);

    let err = CredentialStore::save(&store, &username, "other").await.unwrap_err();
    assert!(matches!(err, StoreError::UsernameTaken(_)));
}

#[tokio::test]
async fn polls_keep_option_order_and_count_votes() {
    let Some(store) = store().await else { return };
    let options = vec!["first".to_string(), "second".to_string(), "third".to_string()];

    let poll = PollStore::save(&store, "Order?", &options, "creator").await.unwrap();
    assert!(poll.options.iter().all(|option| option.votes == 0));

    let updated = store.record_vote(poll.id, 2).await.unwrap();
    let texts: Vec<_> = updated.options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
    assert_eq!(updated.options[2].votes, 1);

    let listed = store.find_all().await.unwrap();
    assert!(listed.iter().any(|p| p.id == poll.id && p.options[2].votes == 1));
}

#[tokio::test]
async fn vote_errors_distinguish_missing_poll_and_bad_index() {
    let Some(store) = store().await else { return };
    let poll = PollStore::save(&store, "Q", &["only".to_string()], "creator")
        .await
        .unwrap();

    let err = store.record_vote(poll.id, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::OptionOutOfRange { index: 1, len: 1 }));

    let err = store.record_vote(poll.id, -3).await.unwrap_err();
    assert!(matches!(err, StoreError::OptionOutOfRange { len: 1, .. }));

    let err = store.record_vote(Uuid::new_v4(), 0).await.unwrap_err();
    assert!(matches!(err, StoreError::PollNotFound(_)));
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let Some(store) = store().await else { return };
    let store = Arc::new(store);
    let poll = PollStore::save(store.as_ref(), "Race", &["a".to_string()], "creator")
        .await
        .unwrap();
    let id = poll.id;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.record_vote(id, 0).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let poll = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(poll.options[0].votes, 20);
}
