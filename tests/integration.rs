//! Integration tests for the payroll service.
//!
//! This test suite drives the HTTP router end to end against an in-memory
//! store and covers:
//! - Successful uploads
//! - Duplicate submissions
//! - Malformed file names
//! - Invalid rows
//! - Job group defaulting
//! - Report contents, ordering and paging

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::service::PayrollService;
use payroll_engine::store::InMemoryStore;

// =============================================================================
// Test Helpers
// =============================================================================

const BOUNDARY: &str = "integration-boundary";
const HEADER: &str = "date,hours worked,employee id,job group\n";

fn create_test_app() -> (Router, InMemoryStore) {
    let config = ConfigLoader::load("./config/payroll.yaml")
        .expect("Failed to load config")
        .into_config();
    let store = InMemoryStore::with_rates(config.rates());
    let service = PayrollService::new(Arc::new(store.clone()), config.report);
    let router = create_router(AppState::new(service, config.server.max_upload_bytes));
    (router, store)
}

fn upload_request(filename: &str, rows: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{HEADER}{rows}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn upload(router: &Router, filename: &str, rows: &str) -> (StatusCode, Value) {
    send(router, upload_request(filename, rows)).await
}

async fn get_report(router: &Router, query: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/report{}", query))
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

fn report_entries(json: &Value) -> &Vec<Value> {
    json["payroll_report"]["employee_reports"]
        .as_array()
        .expect("employee_reports should be an array")
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_success() {
    let (router, store) = create_test_app();

    let (status, json) = upload(
        &router,
        "time-report-42.csv",
        "14/11/2023,7.5,1,A\n9/11/2023,4,2,B\n10/11/2023,4,2,B\n",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "message": "Upload successful",
            "submission_id": 42,
            "records_created": 3
        })
    );
    assert_eq!(store.work_log_count().await, 3);
    assert!(store.is_processed(42).await);
}

#[tokio::test]
async fn test_duplicate_upload_rejected_without_new_rows() {
    let (router, store) = create_test_app();
    let rows = "14/11/2023,7.5,1,A\n";

    let (first, _) = upload(&router, "time-report-42.csv", rows).await;
    let (second, json) = upload(&router, "time-report-42.csv", rows).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "DUPLICATE_SUBMISSION");
    assert_eq!(store.work_log_count().await, 1);
}

#[tokio::test]
async fn test_same_rows_under_new_submission_id_accepted() {
    let (router, store) = create_test_app();
    let rows = "14/11/2023,7.5,1,A\n";

    upload(&router, "time-report-1.csv", rows).await;
    let (status, _) = upload(&router, "time-report-2.csv", rows).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.work_log_count().await, 2);
}

#[tokio::test]
async fn test_malformed_filename_rejected_before_rows() {
    let (router, store) = create_test_app();

    let (status, json) = upload(&router, "abc.csv", "not a valid row\n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_SUBMISSION_ID");
    assert_eq!(store.work_log_count().await, 0);
}

#[tokio::test]
async fn test_negative_hours_rejects_whole_file() {
    let (router, store) = create_test_app();

    let (status, json) = upload(
        &router,
        "time-report-7.csv",
        "14/11/2023,7.5,1,A\n15/11/2023,-1,1,A\n",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_ROW");
    assert!(json["message"].as_str().unwrap().contains("line 3"));
    assert_eq!(store.work_log_count().await, 0);
    assert!(!store.is_processed(7).await);

    // The id was not consumed, so a corrected file is accepted.
    let (status, _) = upload(&router, "time-report-7.csv", "14/11/2023,7.5,1,A\n").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_date_rejected() {
    let (router, _) = create_test_app();

    for rows in ["31/02/2023,1,1,A\n", "2023-01-02,1,1,A\n", "02/01/23,1,1,A\n"] {
        let (status, json) = upload(&router, "time-report-8.csv", rows).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {:?}", rows);
        assert_eq!(json["code"], "INVALID_ROW");
    }
}

#[tokio::test]
async fn test_short_row_rejected() {
    let (router, _) = create_test_app();

    let (status, json) = upload(&router, "time-report-9.csv", "14/11/2023,7.5\n").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("found 2"));
}

#[tokio::test]
async fn test_header_only_file_rejected() {
    let (router, store) = create_test_app();

    let (status, json) = upload(&router, "time-report-10.csv", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMPTY_BATCH");
    assert!(!store.is_processed(10).await);
}

// =============================================================================
// Report
// =============================================================================

#[tokio::test]
async fn test_end_to_end_report() {
    let (router, _) = create_test_app();
    upload(
        &router,
        "time-report-42.csv",
        "02/01/2023,8,1,A\n18/01/2023,4,1,B\n",
    )
    .await;

    let (status, json) = get_report(&router, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "payroll_report": {
                "employee_reports": [
                    {
                        "employee_id": 1,
                        "pay_period": { "start_date": "2023-01-01", "end_date": "2023-01-15" },
                        "amount_paid": "$160.00"
                    },
                    {
                        "employee_id": 1,
                        "pay_period": { "start_date": "2023-01-16", "end_date": "2023-01-31" },
                        "amount_paid": "$120.00"
                    }
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_unknown_job_group_paid_at_group_a_rate() {
    let (router, _) = create_test_app();
    upload(&router, "time-report-1.csv", "02/01/2023,8,1,Z\n").await;

    let (_, json) = get_report(&router, "").await;

    assert_eq!(report_entries(&json)[0]["amount_paid"], "$160.00");
}

#[tokio::test]
async fn test_report_sorted_by_employee_then_period() {
    let (router, _) = create_test_app();
    upload(
        &router,
        "time-report-1.csv",
        "20/02/2024,1,2,A\n03/01/2024,1,1,A\n29/02/2024,1,1,B\n05/02/2024,1,2,A\n",
    )
    .await;

    let (_, json) = get_report(&router, "").await;
    let order: Vec<(u64, String, String)> = report_entries(&json)
        .iter()
        .map(|entry| {
            (
                entry["employee_id"].as_u64().unwrap(),
                entry["pay_period"]["start_date"].as_str().unwrap().to_string(),
                entry["pay_period"]["end_date"].as_str().unwrap().to_string(),
            )
        })
        .collect();

    assert_eq!(
        order,
        vec![
            (1, "2024-01-01".to_string(), "2024-01-15".to_string()),
            (1, "2024-02-16".to_string(), "2024-02-29".to_string()),
            (2, "2024-02-01".to_string(), "2024-02-15".to_string()),
            (2, "2024-02-16".to_string(), "2024-02-29".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_report_sums_across_uploads() {
    let (router, _) = create_test_app();
    upload(&router, "time-report-1.csv", "14/11/2023,7.5,1,A\n").await;
    upload(&router, "time-report-2.csv", "09/11/2023,4,1,A\n10/11/2023,4,1,B\n").await;

    let (_, json) = get_report(&router, "").await;
    let entries = report_entries(&json);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["amount_paid"], "$350.00");
}

#[tokio::test]
async fn test_report_paging_by_work_log() {
    let (router, _) = create_test_app();
    upload(
        &router,
        "time-report-1.csv",
        "03/01/2023,1,3,A\n01/01/2023,1,1,A\n02/01/2023,1,2,A\n",
    )
    .await;

    let (status, json) = get_report(&router, "?limit=2&offset=1").await;
    let employees: Vec<u64> = report_entries(&json)
        .iter()
        .map(|entry| entry["employee_id"].as_u64().unwrap())
        .collect();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(employees, vec![2, 3]);
}

#[tokio::test]
async fn test_report_invalid_offset_rejected() {
    let (router, _) = create_test_app();

    let (status, json) = get_report(&router, "?offset=-1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_health() {
    let (router, _) = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}
