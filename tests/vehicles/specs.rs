//! Specification adapters over the repositories.

use doc_repositories::{
    CancellationToken, Filter, QueryRepository, Repository, RepositoryError, SortBy,
    SortSpecification, SpecDeleting, SpecReading, Specification, SpecificationExt,
};

use crate::support::{expressions, seeded_context, total, Vehicle, READ_COUNT};

/// Vehicles whose name starts with a prefix.
struct NameStartsWith(&'static str);

impl Specification<Vehicle> for NameStartsWith {
    fn as_filter(&self) -> Filter<Vehicle> {
        let prefix = self.0;
        Filter::new(move |v: &Vehicle| v.name.starts_with(prefix))
    }
}

struct IdIs(&'static str);

impl Specification<Vehicle> for IdIs {
    fn as_filter(&self) -> Filter<Vehicle> {
        Filter::key_eq(self.0.to_string(), |v: &Vehicle| v.id.clone())
    }
}

#[tokio::test]
async fn get_by_specification() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let found = repo.get_by(&IdIs("read-12"), &cancel).await.unwrap();
    assert_eq!(found.map(|v| v.name), Some("read-Name-12".to_string()));
    assert!(repo
        .get_by(&IdIs("missing"), &cancel)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn count_by_composed_specifications() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    // read-Name-2, read-Name-20 .. read-Name-28
    let twenties: &dyn Specification<Vehicle> = &NameStartsWith("read-Name-2");
    assert_eq!(repo.get_count_by(Some(twenties), &cancel).await.unwrap(), 10);

    let twenties_but_not_25: &dyn Specification<Vehicle> =
        &NameStartsWith("read-Name-2").and(IdIs("read-25").not());
    assert_eq!(
        repo.get_count_by(Some(twenties_but_not_25), &cancel)
            .await
            .unwrap(),
        9
    );

    let ones_or_twos: &dyn Specification<Vehicle> =
        &NameStartsWith("read-Name-1").or(NameStartsWith("read-Name-2"));
    assert_eq!(
        repo.get_count_by(Some(ones_or_twos), &cancel)
            .await
            .unwrap(),
        21
    );

    assert_eq!(
        repo.get_count_by(None, &cancel).await.unwrap(),
        READ_COUNT as u64
    );
}

#[tokio::test]
async fn page_by_specification_and_sort() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let spec: &dyn Specification<Vehicle> = &NameStartsWith("read-Name-2");
    let sort: &dyn SortSpecification<Vehicle> =
        &SortBy::descending(|v: &Vehicle| v.name.clone());
    let page = repo
        .get_page_by(1, 3, Some(spec), Some(sort), &cancel)
        .await
        .unwrap();

    let names: Vec<&str> = page.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["read-Name-28", "read-Name-27", "read-Name-26"]);
}

#[tokio::test]
async fn page_by_without_sort_is_ascending_by_default_key() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let page = repo.get_page_by(2, 2, None, None, &cancel).await.unwrap();
    let names: Vec<&str> = page.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["read-Name-10", "read-Name-11"]);
}

#[tokio::test]
async fn page_by_rejects_out_of_range_arguments() {
    let context = seeded_context().await;
    let repo = QueryRepository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    let err = repo
        .get_page_by(0, 5, None, None, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::OutOfRange {
            argument: "offset",
            ..
        }
    ));

    let err = repo
        .get_page_by(1, 0, None, None, &cancel)
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
async fn delete_by_reads_then_deletes() {
    let context = seeded_context().await;
    let repo = Repository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo.delete_by(&IdIs("read-4"), &cancel).await.unwrap());
    assert!(!repo.delete_by(&IdIs("read-4"), &cancel).await.unwrap());
    assert_eq!(total(&context).await, READ_COUNT as u64 - 1);
}

#[tokio::test]
async fn delete_by_removes_only_the_first_match() {
    let context = seeded_context().await;
    let repo = Repository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();

    assert!(repo
        .delete_by(&NameStartsWith("read-Name-1"), &cancel)
        .await
        .unwrap());
    assert_eq!(total(&context).await, READ_COUNT as u64 - 1);
}

#[tokio::test]
async fn cancelled_delete_by_fails() {
    let context = seeded_context().await;
    let repo = Repository::new(&context, expressions()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(
        repo.delete_by(&IdIs("read-4"), &cancel).await.unwrap_err(),
        RepositoryError::Cancelled
    );
    assert_eq!(total(&context).await, READ_COUNT as u64);
}

#[test]
fn specifications_evaluate_directly() {
    let vehicle = crate::support::vehicle("read-3", "read-Name-3");

    assert!(IdIs("read-3").is_satisfied_by(&vehicle));
    assert!(!IdIs("read-3").not().is_satisfied_by(&vehicle));
    assert!(IdIs("x").or(NameStartsWith("read")).is_satisfied_by(&vehicle));
    assert!(!IdIs("x").and(NameStartsWith("read")).is_satisfied_by(&vehicle));
}
