use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Days, NaiveDate};
use configuration::Config;
use core_types::{Dataset, DatasetSchema, DatedRecord};
use registry::InMemoryRepository;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{AppState, build_router};

/// Ten days from 2024-01-01: `a` = 1..=10, `b` = 2a, `c` = 11 - a, `gappy` absent on odd days.
fn sample_dataset() -> Dataset {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let records = (1..=10u32)
        .map(|i| {
            let a = i as f64;
            let gappy = (i % 2 == 0).then_some(a);
            let date = start.checked_add_days(Days::new((i - 1) as u64)).unwrap();
            DatedRecord::new(date, vec![Some(a), Some(2.0 * a), Some(11.0 - a), gappy])
        })
        .collect();
    let schema =
        DatasetSchema::new(vec!["a".into(), "b".into(), "c".into(), "gappy".into()]).unwrap();
    Dataset::new("sample", "integration fixture", schema, records).unwrap()
}

fn app_with(config: Config) -> Router {
    let repo = Arc::new(InMemoryRepository::with_datasets([sample_dataset()]));
    build_router(Arc::new(AppState::new(repo, &config)))
}

fn app() -> Router {
    app_with(Config::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_open() {
    let request = Request::get("/api/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn summary_over_range() {
    let (status, body) =
        get_json(app(), "/api/datasets/sample/summary?param=a&from=2024-01-01&to=2024-01-05").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parameter"], "a");
    assert_eq!(body["from"], "2024-01-01");
    assert_eq!(body["mean"], 3.0);
    assert_eq!(body["median"], 3.0);
    assert_eq!(body["stddev"], 1.414214);
    assert_eq!(body["min"], 1.0);
    assert_eq!(body["max"], 5.0);
    assert_eq!(body["count"], 5);
    assert_eq!(body["anomalies"], 0);
    assert!(body["insight"].as_str().unwrap().starts_with("a averaged 3"));
}

#[tokio::test]
async fn summary_error_cases() {
    let (status, body) = get_json(app(), "/api/datasets/sample/summary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter 'param'");

    let (status, _) = get_json(app(), "/api/datasets/sample/summary?param=pressure").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(app(), "/api/datasets/missing/summary?param=a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        get_json(app(), "/api/datasets/sample/summary?param=a&from=2030-01-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data available in the requested range");

    let (status, _) = get_json(app(), "/api/datasets/sample/summary?param=a&from=01-01-2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trend_with_window() {
    let (status, body) = get_json(app(), "/api/datasets/sample/trend?param=a&window=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], 3);

    let averages: Vec<f64> = body["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["moving_average"].as_f64().unwrap())
        .collect();
    assert_eq!(averages, vec![1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    assert_eq!(body["points"][0]["date"], "2024-01-01");
}

#[tokio::test]
async fn trend_defaults_window_and_shows_gaps() {
    let (status, body) = get_json(app(), "/api/datasets/sample/trend?param=gappy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"], 7);

    let points = body["points"].as_array().unwrap();
    assert_eq!(points.len(), 10);
    assert_eq!(points[0]["value"], Value::Null);
    assert_eq!(points[0]["moving_average"], Value::Null);
    assert_eq!(points[1]["moving_average"], 2.0);
    assert_eq!(points[2]["moving_average"], 2.0);
}

#[tokio::test]
async fn trend_rejects_bad_window() {
    let (status, _) = get_json(app(), "/api/datasets/sample/trend?param=a&window=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn correlation_labels() {
    let (status, body) = get_json(app(), "/api/datasets/sample/correlation?x=a&y=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["r"], 1.0);
    assert_eq!(body["interpretation"], "Strong positive correlation");
    assert_eq!(body["count"], 10);

    let (_, body) = get_json(app(), "/api/datasets/sample/correlation?x=a&y=c").await;
    assert_eq!(body["r"], -1.0);
    assert_eq!(body["interpretation"], "Strong negative correlation");

    let (status, body) = get_json(app(), "/api/datasets/sample/correlation?x=a").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter 'y'");
}

#[tokio::test]
async fn csv_export() {
    let request = Request::get("/api/datasets/sample/export?param=gappy&from=2024-01-01&to=2024-01-03")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"sample_gappy.csv\""
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        String::from_utf8(body.to_vec()).unwrap(),
        "date,gappy\n2024-01-01,\n2024-01-02,2\n2024-01-03,\n"
    );
}

#[tokio::test]
async fn upload_then_query() {
    let app = app();
    let payload = json!({
        "id": "river",
        "description": "gauge",
        "parameters": ["level"],
        "records": [
            { "date": "2024-05-02", "values": { "level": 4.0 } },
            { "date": "2024-05-01", "values": { "level": 2.0 } }
        ]
    });
    let request = Request::post("/api/datasets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::CREATED);
    let info: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(info["records"], 2);
    assert_eq!(info["first_date"], "2024-05-01");

    let (status, body) = get_json(app.clone(), "/api/datasets/river/summary?param=level").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mean"], 3.0);

    let (_, list) = get_json(app, "/api/datasets").await;
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["river", "sample"]);
}

#[tokio::test]
async fn upload_rejects_invalid_payload() {
    let request = Request::post("/api/datasets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"id": "x", "parameters": ["a"], "records": [{"date": "nope"}]}"#))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::post("/api/datasets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_token_is_enforced_when_configured() {
    let mut config = Config::default();
    config.auth.tokens = vec!["secret".to_string()];
    let app = app_with(config);

    let (status, body) = get_json(app.clone(), "/api/datasets").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing or invalid bearer token");

    let request = Request::get("/api/datasets")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/api/datasets/sample")
        .header(header::AUTHORIZATION, "Bearer secret")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::get("/api/health").body(Body::empty()).unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upload_rejects_ids_unfit_for_urls() {
    for id in ["line\nid", "quote\"id", "has space"] {
        let payload = json!({
            "id": id,
            "parameters": ["level"],
            "records": [{ "date": "2024-05-01", "values": { "level": 1.0 } }]
        });
        let request = Request::post("/api/datasets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{id:?}");
    }
}

#[tokio::test]
async fn export_file_name_is_sanitised() {
    let app = app();
    let payload = json!({
        "id": "quirky",
        "parameters": ["flow \"peak\""],
        "records": [{ "date": "2024-05-01", "values": { "flow \"peak\"": 1.5 } }]
    });
    let request = Request::post("/api/datasets")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::get("/api/datasets/quirky/export?param=flow%20%22peak%22")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"quirky_flow__peak_.csv\""
    );
}
