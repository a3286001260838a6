//! Factory-driven writes: CommandRepository and the combined Repository.

use doc_repositories::{
    CancellationToken, Command, CommandRepository, Deleting, ExpressionsTable, Filter, QueryName,
    Reading, Repository, RepositoryError, SortKey,
};

use crate::support::{
    batch, by_id, by_ids, context, count, expressions, named, renamed, seeded_context, store,
    total, vehicle, Vehicle, READ_COUNT,
};

#[tokio::test]
async fn add_inserts_one() {
    let context = context();
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.add(&vehicle("add-1", "added"), &cancel).await.unwrap());
    assert_eq!(count(&context, &by_id("add-1")).await, 1);
}

#[tokio::test]
async fn add_many_inserts_every_document() {
    let context = seeded_context().await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let vehicles = batch("bulk-add", 5);
    assert!(repo.add_many(&vehicles, &cancel).await.unwrap());
    assert_eq!(count(&context, &named("bulk-add")).await, 5);
    assert_eq!(total(&context).await, READ_COUNT as u64 + 5);
}

#[tokio::test]
async fn add_many_of_nothing_is_false() {
    let context = context();
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(!repo.add_many(&[], &cancel).await.unwrap());
    assert_eq!(total(&context).await, 0);
}

#[tokio::test]
async fn update_replaces_existing() {
    let context = context();
    store(&context, &[vehicle("upd-1", "before")]).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.update(&vehicle("upd-1", "after"), &cancel).await.unwrap());
    assert_eq!(count(&context, &named("after")).await, 1);
    assert_eq!(count(&context, &named("before")).await, 0);
}

#[tokio::test]
async fn update_of_missing_key_inserts_nothing() {
    let context = seeded_context().await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let updated = repo
        .update(&vehicle("not-found", "NotFoundVehicle"), &cancel)
        .await
        .unwrap();

    assert!(!updated);
    assert_eq!(total(&context).await, READ_COUNT as u64);
    assert_eq!(count(&context, &by_id("not-found")).await, 0);
}

#[tokio::test]
async fn update_many_requires_every_document_modified() {
    let context = context();
    let stored = batch("to-update", 6);
    store(&context, &stored).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let changed = renamed(&stored, "updated");
    assert!(repo.update_many(&changed, &cancel).await.unwrap());
    let updated = Filter::new(|v: &Vehicle| v.name.ends_with("updated"));
    assert_eq!(count(&context, &updated).await, 6);

    // One missing key: the others still change but the batch reports false
    let mut with_missing = renamed(&stored, "again");
    with_missing.push(vehicle("not-found", "NotFoundVehicle"));
    assert!(!repo.update_many(&with_missing, &cancel).await.unwrap());
    let again = Filter::new(|v: &Vehicle| v.name.ends_with("again"));
    assert_eq!(count(&context, &again).await, 6);
    assert_eq!(count(&context, &by_id("not-found")).await, 0);
}

#[tokio::test]
async fn update_many_of_nothing_is_false() {
    let context = context();
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(!repo.update_many(&[], &cancel).await.unwrap());
}

#[tokio::test]
async fn delete_removes_by_key() {
    let context = context();
    store(&context, &[vehicle("del-1", "doomed")]).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.delete(&vehicle("del-1", "whatever"), &cancel).await.unwrap());
    assert!(!repo.delete(&vehicle("del-1", "whatever"), &cancel).await.unwrap());
    assert_eq!(total(&context).await, 0);
}

#[tokio::test]
async fn delete_many_with_a_missing_key_is_false() {
    let context = seeded_context().await;
    let to_delete = batch("to-delete", 7);
    store(&context, &to_delete[..6]).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    // Six of the seven keys exist
    assert!(!repo.delete_many(&to_delete, &cancel).await.unwrap());
    assert_eq!(count(&context, &by_ids(&to_delete)).await, 0);
    assert_eq!(total(&context).await, READ_COUNT as u64);
}

#[tokio::test]
async fn delete_many_with_every_key_present() {
    let context = context();
    let to_delete = batch("to-delete", 7);
    store(&context, &to_delete).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.delete_many(&to_delete, &cancel).await.unwrap());
    assert!(!repo.delete_many(&[], &cancel).await.unwrap());
    assert_eq!(total(&context).await, 0);
}

#[tokio::test]
async fn add_or_update_updates_existing_key() {
    let context = context();
    store(&context, &[vehicle("aou-1", "original")]).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo
        .add_or_update(&vehicle("aou-1", "changed"), &cancel)
        .await
        .unwrap());
    assert_eq!(total(&context).await, 1);
    assert_eq!(count(&context, &named("changed")).await, 1);
}

#[tokio::test]
async fn add_or_update_adds_missing_key() {
    let context = context();
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo
        .add_or_update(&vehicle("aou-2", "fresh"), &cancel)
        .await
        .unwrap());
    assert_eq!(count(&context, &by_id("aou-2")).await, 1);
}

#[tokio::test]
async fn add_or_update_with_duplicate_keys_does_nothing() {
    let context = context();
    store(
        &context,
        &[vehicle("dup", "first copy"), vehicle("dup", "second copy")],
    )
    .await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(!repo
        .add_or_update(&vehicle("dup", "third copy"), &cancel)
        .await
        .unwrap());
    assert_eq!(total(&context).await, 2);
    assert_eq!(count(&context, &named("third copy")).await, 0);
}

#[tokio::test]
async fn unmapped_write_intents_touch_nothing() {
    let context = seeded_context().await;
    let update_only = ExpressionsTable::new(
        Filter::new(|v: &Vehicle| v.name.contains("read-Name")),
        SortKey::new(|v: &Vehicle| v.name.clone()),
    )
    .with_document_filter(QueryName::UpdateOne, |target: &Vehicle| by_id(&target.id));
    let repo = CommandRepository::new(&context, update_only).unwrap();
    let cancel = CancellationToken::new();

    assert!(!repo
        .delete(&vehicle("no-such-id", "ghost"), &cancel)
        .await
        .unwrap());
    assert!(!repo.delete(&vehicle("read-3", ""), &cancel).await.unwrap());
    assert!(!repo
        .delete_many(&[vehicle("read-4", ""), vehicle("read-5", "")], &cancel)
        .await
        .unwrap());
    assert_eq!(total(&context).await, READ_COUNT as u64);

    // The mapped intent still works
    assert!(repo
        .update(&vehicle("read-3", "renamed"), &cancel)
        .await
        .unwrap());
    assert_eq!(count(&context, &named("renamed")).await, 1);
}

#[tokio::test]
async fn cancelled_writes_leave_the_store_alone() {
    let context = context();
    store(&context, &[vehicle("keep", "kept")]).await;
    let repo = CommandRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let new_vehicle = vehicle("new", "new");
    let kept = vehicle("keep", "renamed");
    assert_eq!(
        repo.add(&new_vehicle, &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.add_many(&batch("cancelled", 3), &cancel)
            .await
            .unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.update(&kept, &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.add_or_update(&new_vehicle, &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.delete(&kept, &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );

    assert_eq!(total(&context).await, 1);
    assert_eq!(count(&context, &named("kept")).await, 1);
}

// ============================================================================
// Repository (reads and writes over one factory)
// ============================================================================

#[tokio::test]
async fn combined_repository_reads_its_own_writes() {
    let context = seeded_context().await;
    let repo = Repository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let vehicles = batch("read-Name-extra", 3);
    assert!(repo.add_many(&vehicles, &cancel).await.unwrap());

    // The default count filter matches the new names too
    assert_eq!(
        repo.get_count(None, &cancel).await.unwrap(),
        READ_COUNT as u64 + 3
    );

    assert!(repo
        .update(&vehicle("read-Name-extra-0", "renamed"), &cancel)
        .await
        .unwrap());
    let found = repo.get(by_id("read-Name-extra-0"), &cancel).await.unwrap();
    assert_eq!(found.map(|v| v.name), Some("renamed".to_string()));

    assert!(repo.delete_many(&vehicles, &cancel).await.unwrap());
    assert_eq!(
        repo.get_count(None, &cancel).await.unwrap(),
        READ_COUNT as u64
    );
}
