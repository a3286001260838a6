//! Reads through the factory-driven and hook-driven repositories.

use doc_repositories::{
    CancellationToken, PageRequest, QueryRepository, Reading, ReadingRepository,
    RepositoryError, SortKey,
};

use crate::support::{
    by_id, expressions, named, seeded_context, VehicleQueries, READ_COUNT, READ_NAME,
};

fn names(vehicles: &[crate::support::Vehicle]) -> Vec<&str> {
    vehicles.iter().map(|v| v.name.as_str()).collect()
}

// ============================================================================
// QueryRepository
// ============================================================================

#[tokio::test]
async fn get_returns_first_match() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let found = repo.get(by_id("read-7"), &cancel).await.unwrap();
    assert_eq!(found.map(|v| v.name), Some(format!("{}-7", READ_NAME)));
}

#[tokio::test]
async fn get_without_match_is_none() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.get(by_id("missing"), &cancel).await.unwrap().is_none());
}

#[tokio::test]
async fn count_defaults_to_read_filter() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert_eq!(
        repo.get_count(None, &cancel).await.unwrap(),
        READ_COUNT as u64
    );
    // read-Name-1 and read-Name-10 .. read-Name-19
    assert_eq!(
        repo.get_count(Some(named("read-Name-1")), &cancel)
            .await
            .unwrap(),
        11
    );
}

#[tokio::test]
async fn page_skips_offset_and_takes_limit() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let page = repo
        .get_page(PageRequest::page(2, 2), &cancel)
        .await
        .unwrap();

    // Default sort is by name: read-Name-0, read-Name-1, read-Name-10, ...
    assert_eq!(names(&page), vec!["read-Name-10", "read-Name-11"]);
}

#[tokio::test]
async fn first_page_starts_at_the_beginning() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let page = repo
        .get_page(PageRequest::page(1, 3), &cancel)
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["read-Name-0", "read-Name-1", "read-Name-10"]);
}

#[tokio::test]
async fn default_page_returns_everything_sorted() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let page = repo
        .get_page(PageRequest::new().with_ascending(false), &cancel)
        .await
        .unwrap();

    assert_eq!(page.len(), READ_COUNT);
    assert_eq!(page[0].name, "read-Name-9");
    assert_eq!(page[READ_COUNT - 1].name, "read-Name-0");
}

#[tokio::test]
async fn page_with_filter_and_custom_key() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let request = PageRequest::page(1, 5)
        .with_filter(named("read-Name-2"))
        .with_order_by(SortKey::new(|v: &crate::support::Vehicle| v.id.len()))
        .with_ascending(false);
    let page = repo.get_page(request, &cancel).await.unwrap();

    // read-Name-2 and read-Name-20 .. read-Name-28, longest ids first
    assert_eq!(page.len(), 5);
    assert!(page.iter().all(|v| v.id.len() == "read-20".len()));
}

#[tokio::test]
async fn page_arguments_below_one_are_out_of_range() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let err = repo
        .get_page(PageRequest::page(0, 10), &cancel)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RepositoryError::OutOfRange {
            argument: "offset",
            value: 0
        }
    );

    let err = repo
        .get_page(PageRequest::page(1, 0), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::OutOfRange {
            argument: "limit",
            ..
        }
    ));
}

#[tokio::test]
async fn cancelled_reads_fail() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(
        repo.get(by_id("read-1"), &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.get_count(None, &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(
        repo.get_page(PageRequest::new(), &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
}

// ============================================================================
// ReadingRepository
// ============================================================================

#[tokio::test]
async fn hooks_supply_read_defaults() {
    let context = seeded_context().await;
    let repo = ReadingRepository::new(&context, VehicleQueries).unwrap();
    let cancel = CancellationToken::new();

    assert_eq!(
        repo.get_count(None, &cancel).await.unwrap(),
        READ_COUNT as u64
    );

    let page = repo
        .get_page(PageRequest::page(2, 2), &cancel)
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["read-Name-10", "read-Name-11"]);

    let found = repo.get(by_id("read-28"), &cancel).await.unwrap();
    assert_eq!(found.map(|v| v.id), Some("read-28".to_string()));
}

#[tokio::test]
async fn hook_repository_validates_pages() {
    let context = seeded_context().await;
    let repo = ReadingRepository::new(&context, VehicleQueries).unwrap();
    let cancel = CancellationToken::new();

    let err = repo
        .get_page(PageRequest::page(-1, 10), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::OutOfRange { .. }));
}
