mod common;

use std::sync::Arc;

use deckforge::master::Card;
use deckforge::provider::{CachedDataProvider, SharedCache};
use deckforge::user::UserCard;

use common::MemoryProvider;

fn memory_provider() -> Arc<MemoryProvider> {
    Arc::new(MemoryProvider::new(
        common::base_master_data(),
        common::base_user_data(),
        common::base_music_meta(),
    ))
}

#[tokio::test]
async fn master_data_is_fetched_once() {
    let inner = memory_provider();
    let provider = CachedDataProvider::new(inner.clone(), Arc::new(SharedCache::new()));
    let first = provider.master::<Card>("cards").await.expect("cards");
    let second = provider.master::<Card>("cards").await.expect("cards");
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    assert_eq!(inner.master_fetch_count(), 1);
}

#[tokio::test]
async fn master_cache_is_shared_between_provider_instances() {
    let inner = memory_provider();
    let shared = Arc::new(SharedCache::new());
    let p1 = CachedDataProvider::new(inner.clone(), shared.clone());
    let p2 = CachedDataProvider::new(inner.clone(), shared);
    p1.master::<Card>("cards").await.expect("cards");
    p2.master::<Card>("cards").await.expect("cards");
    assert_eq!(inner.master_fetch_count(), 1);
}

#[tokio::test]
async fn concurrent_requests_share_one_fetch() {
    let inner = memory_provider();
    let provider = Arc::new(CachedDataProvider::new(
        inner.clone(),
        Arc::new(SharedCache::new()),
    ));
    let a = {
        let provider = provider.clone();
        tokio::spawn(async move { provider.master::<Card>("cards").await })
    };
    let b = {
        let provider = provider.clone();
        tokio::spawn(async move { provider.master::<Card>("cards").await })
    };
    a.await.expect("join").expect("cards");
    b.await.expect("join").expect("cards");
    assert_eq!(inner.master_fetch_count(), 1);
}

#[tokio::test]
async fn user_data_is_cached_per_provider_instance() {
    let inner = memory_provider();
    let shared = Arc::new(SharedCache::new());
    let p1 = CachedDataProvider::new(inner.clone(), shared.clone());
    let p2 = CachedDataProvider::new(inner.clone(), shared);
    p1.user::<Vec<UserCard>>("userCards").await.expect("cards");
    p1.user::<Vec<UserCard>>("userCards").await.expect("cards");
    assert_eq!(inner.user_fetch_count(), 1);
    p2.user::<Vec<UserCard>>("userCards").await.expect("cards");
    assert_eq!(inner.user_fetch_count(), 2);
}

#[tokio::test]
async fn missing_user_entry_is_none_not_error() {
    let provider = common::provider();
    let absent = provider
        .user_opt::<Vec<UserCard>>("userMysekaiCanvases")
        .await
        .expect("optional lookup");
    assert!(absent.is_none());
    assert!(provider
        .user::<Vec<UserCard>>("userMysekaiCanvases")
        .await
        .is_err());
}

#[tokio::test]
async fn missing_master_table_is_an_error() {
    let provider = common::provider();
    assert!(provider.master::<Card>("noSuchTable").await.is_err());
}

#[tokio::test]
async fn music_meta_decodes_and_caches() {
    let provider = common::provider();
    let metas = provider.music_meta().await.expect("music meta");
    assert_eq!(metas.len(), 1);
    assert_eq!(metas[0].music_id, 1);
    assert_eq!(metas[0].difficulty, "expert");
}
