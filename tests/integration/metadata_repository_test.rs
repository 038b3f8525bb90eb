// Metadata audit-trail persistence against an in-memory database:
// insert, recency ordering, and the generated -> expired sweep.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use stocksight::modules::reports::models::{
    Report, ReportMetadata, ReportStatus, ReportType, SalesReport, SalesSummary,
};
use stocksight::modules::reports::repositories::{MetadataRepository, SqliteMetadataRepository};

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

fn sample_report(total: rust_decimal::Decimal) -> Report {
    Report::Sales(SalesReport {
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        summary: SalesSummary {
            total_sales: total,
            total_orders: 3,
            average_order_value: dec!(10.00),
        },
        daily_sales: vec![],
        top_products: vec![],
        top_customers: vec![],
    })
}

fn sample_metadata(total: rust_decimal::Decimal) -> ReportMetadata {
    ReportMetadata::for_report(
        &sample_report(total),
        "pdf",
        "{}".to_string(),
        Some("SalesReport_20250630.pdf".to_string()),
        Some(2048),
        30,
    )
}

#[tokio::test]
async fn test_insert_and_list_round_trip() {
    let repo = SqliteMetadataRepository::new(test_pool().await);
    let metadata = sample_metadata(dec!(123.45));

    repo.insert(&metadata).await.unwrap();

    let listed = repo.list_recent(10).await.unwrap();
    assert_eq!(listed.len(), 1);
    let found = &listed[0];
    assert_eq!(found.id, metadata.id);
    assert_eq!(found.report_type, ReportType::Sales);
    assert_eq!(found.format, "pdf");
    assert_eq!(found.total_amount, dec!(123.45));
    assert_eq!(found.status, ReportStatus::Generated);
    assert_eq!(found.start_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    assert_eq!(found.file_name.as_deref(), Some("SalesReport_20250630.pdf"));
    assert_eq!(found.file_size, Some(2048));
}

#[tokio::test]
async fn test_list_recent_orders_newest_first_and_limits() {
    let repo = SqliteMetadataRepository::new(test_pool().await);

    for i in 0..5 {
        let mut metadata = sample_metadata(dec!(1.00));
        metadata.generated_at = Utc::now() - Duration::minutes(i);
        repo.insert(&metadata).await.unwrap();
    }

    let listed = repo.list_recent(3).await.unwrap();
    assert_eq!(listed.len(), 3);
    for pair in listed.windows(2) {
        assert!(pair[0].generated_at >= pair[1].generated_at);
    }
}

#[tokio::test]
async fn test_expire_overdue_flips_only_past_due_records() {
    let repo = SqliteMetadataRepository::new(test_pool().await);

    let mut overdue = sample_metadata(dec!(1.00));
    overdue.expires_at = Some(Utc::now() - Duration::hours(1));
    repo.insert(&overdue).await.unwrap();

    let fresh = sample_metadata(dec!(2.00));
    repo.insert(&fresh).await.unwrap();

    let flipped = repo.expire_overdue(Utc::now()).await.unwrap();
    assert_eq!(flipped, 1);

    let listed = repo.list_recent(10).await.unwrap();
    let overdue_row = listed.iter().find(|m| m.id == overdue.id).unwrap();
    let fresh_row = listed.iter().find(|m| m.id == fresh.id).unwrap();
    assert_eq!(overdue_row.status, ReportStatus::Expired);
    assert_eq!(fresh_row.status, ReportStatus::Generated);
}

#[tokio::test]
async fn test_expire_overdue_is_idempotent() {
    let repo = SqliteMetadataRepository::new(test_pool().await);

    let mut overdue = sample_metadata(dec!(1.00));
    overdue.expires_at = Some(Utc::now() - Duration::hours(1));
    repo.insert(&overdue).await.unwrap();

    assert_eq!(repo.expire_overdue(Utc::now()).await.unwrap(), 1);
    assert_eq!(repo.expire_overdue(Utc::now()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_records_without_expiry_never_expire() {
    let repo = SqliteMetadataRepository::new(test_pool().await);

    let mut keeper = sample_metadata(dec!(1.00));
    keeper.expires_at = None;
    repo.insert(&keeper).await.unwrap();

    assert_eq!(repo.expire_overdue(Utc::now()).await.unwrap(), 0);
    let listed = repo.list_recent(10).await.unwrap();
    assert_eq!(listed[0].status, ReportStatus::Generated);
}
