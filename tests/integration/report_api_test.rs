// End-to-end handler tests: unreachable upstream services must yield a
// zeroed report, not a failure; validation errors map to 400; format
// requests come back as file downloads.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use stocksight::config::UpstreamConfig;
use stocksight::modules::reports::controllers::{self, ReportContext};
use stocksight::modules::reports::repositories::{MetadataRepository, SqliteMetadataRepository};
use stocksight::modules::reports::services::ReportService;
use stocksight::modules::upstream::services::HttpUpstreamGateway;

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

/// Context wired to a closed port: every upstream fetch degrades to empty
async fn unreachable_context() -> ReportContext {
    let upstream = Arc::new(HttpUpstreamGateway::new(UpstreamConfig::for_tests(
        "http://127.0.0.1:1",
    )));
    let metadata: Arc<dyn MetadataRepository> =
        Arc::new(SqliteMetadataRepository::new(test_pool().await));

    ReportContext {
        service: Arc::new(ReportService::new(upstream, 10)),
        metadata,
        retention_days: 30,
    }
}

#[actix_web::test]
async fn test_sales_report_with_unreachable_upstream_is_zeroed() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(unreachable_context().await))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/sales")
        .set_json(json!({
            "start_date": "2025-06-01",
            "end_date": "2025-06-30"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["report_type"], "sales");
    assert_eq!(body["data"]["summary"]["total_orders"], 0);
    assert_eq!(body["data"]["summary"]["total_sales"], "0");
    // Gap-free inclusive series: one entry per day of June, all zero
    assert_eq!(body["data"]["daily_sales"].as_array().unwrap().len(), 30);
}

#[actix_web::test]
async fn test_inverted_range_is_rejected_with_400() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(unreachable_context().await))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/sales")
        .set_json(json!({
            "start_date": "2025-06-30",
            "end_date": "2025-06-01"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_unknown_report_type_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(unreachable_context().await))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/quarterly")
        .set_json(json!({}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_csv_download_has_attachment_headers() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(unreachable_context().await))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/sales")
        .set_json(json!({
            "start_date": "2025-06-01",
            "end_date": "2025-06-30",
            "format": "csv"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/csv"
    );
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"SalesReport_"));
    assert!(disposition.ends_with(".csv\""));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Metric,Value"));
}

#[actix_web::test]
async fn test_generated_reports_appear_in_history() {
    let context = unreachable_context().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(context))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/inventory")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri("/reports/history?limit=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let entries: serde_json::Value = test::read_body_json(resp).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["report_type"], "inventory");
    assert_eq!(entries[0]["format"], "json");
    assert_eq!(entries[0]["status"], "generated");
}

#[actix_web::test]
async fn test_invalid_format_is_rejected_before_generation() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(unreachable_context().await))
            .configure(controllers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/reports/sales")
        .set_json(json!({ "format": "docx" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
