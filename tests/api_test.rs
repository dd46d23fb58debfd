mod common;

use axum::http::{Method, StatusCode};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{app_with, missing_scan, send, send_json, FakeGenerator, FakeNutrition, RECIPE_JSON};
use rust_recipe_agent::scanner::ScanSource;
use rust_recipe_agent::RecipeOrchestrator;

fn orchestrator(nutrition: Arc<FakeNutrition>, generator: FakeGenerator) -> RecipeOrchestrator {
    RecipeOrchestrator::new(nutrition, Arc::new(generator))
}

fn default_app() -> axum::Router {
    app_with(
        orchestrator(Arc::new(FakeNutrition::default()), FakeGenerator::replying(RECIPE_JSON)),
        missing_scan(),
    )
}

fn scan_file(contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("scan-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn generate_recipes_merges_nutrition_and_preferences() {
    let nutrition = Arc::new(FakeNutrition::default());
    let generator = FakeGenerator::replying(RECIPE_JSON);
    let app = app_with(orchestrator(nutrition.clone(), generator.clone()), missing_scan());

    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/generate-recipes",
        Some(r#"{"items":["egg","rice"],"preferences":{"restrictions":["vegetarian"],"cuisine":"any"}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());

    let data = &body["data"];
    assert_eq!(data["ingredients"]["provided"], serde_json::json!(["egg", "rice"]));
    let nutrition_names: Vec<_> = data["ingredients"]["nutrition"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(nutrition_names, vec!["egg", "rice"]);

    assert_eq!(data["recipe"]["name"], "Vegetable Egg Fried Rice");
    assert_eq!(data["recipe"]["nutritionEstimate"]["calories"], "520");
    assert_eq!(data["recipe"]["preferences"]["restrictions"], serde_json::json!(["vegetarian"]));
    assert_eq!(data["recipe"]["preferences"]["cuisine"], "any");

    assert_eq!(nutrition.calls.load(Ordering::SeqCst), 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generate_recipes_defaults_missing_preferences() {
    let (status, body) = send_json(
        default_app(),
        Method::POST,
        "/api/generate-recipes",
        Some(r#"{"items":["Eggs","egg","rice"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ingredients"]["provided"], serde_json::json!(["Eggs", "rice"]));
    assert_eq!(body["data"]["recipe"]["preferences"]["restrictions"], serde_json::json!([]));
    assert_eq!(body["data"]["recipe"]["preferences"]["cuisine"], "any");
}

#[tokio::test]
async fn empty_items_are_rejected_without_calls() {
    let nutrition = Arc::new(FakeNutrition::default());
    let generator = FakeGenerator::replying(RECIPE_JSON);

    for payload in [r#"{"items":[]}"#, r#"{"items":["  "]}"#] {
        let app = app_with(orchestrator(nutrition.clone(), generator.clone()), missing_scan());
        let (status, body) = send_json(app, Method::POST, "/api/generate-recipes", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["kind"], "validation_error");
    }

    assert_eq!(nutrition.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn long_ingredient_lists_are_accepted() {
    let nutrition = Arc::new(FakeNutrition::default());
    let app = app_with(
        orchestrator(nutrition.clone(), FakeGenerator::replying(RECIPE_JSON)),
        missing_scan(),
    );
    let items: Vec<String> = (0..51).map(|i| format!("item{}", i)).collect();
    let payload = serde_json::json!({ "items": items }).to_string();

    let (status, body) = send_json(app, Method::POST, "/api/generate-recipes", Some(&payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ingredients"]["provided"].as_array().unwrap().len(), 51);
    assert_eq!(nutrition.calls.load(Ordering::SeqCst), 51);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    for payload in [r#"{"items":"egg"}"#, r#"{"items":[1,2]}"#, "not json", "{}"] {
        let (status, body) = send_json(default_app(), Method::POST, "/api/generate-recipes", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["error"]["kind"], "validation_error");
    }

    let (status, body) = send_json(default_app(), Method::POST, "/api/nutrition", Some(r#"{"items":"milk"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
}

#[tokio::test]
async fn upstream_failure_fails_the_whole_request() {
    let nutrition = Arc::new(FakeNutrition {
        failing: HashSet::from(["rice".to_string()]),
        ..Default::default()
    });
    let app = app_with(orchestrator(nutrition, FakeGenerator::replying(RECIPE_JSON)), missing_scan());

    let (status, body) = send_json(app, Method::POST, "/api/generate-recipes", Some(r#"{"items":["egg","rice"]}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "upstream_error");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn prose_reply_is_a_parse_error() {
    let app = app_with(
        orchestrator(
            Arc::new(FakeNutrition::default()),
            FakeGenerator::replying("Sure! Here is a recipe: boil the egg."),
        ),
        missing_scan(),
    );

    let (status, body) = send_json(app, Method::POST, "/api/generate-recipes", Some(r#"{"items":["egg"]}"#)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["kind"], "parse_error");
}

#[tokio::test(start_paused = true)]
async fn slow_services_time_out() {
    let nutrition = Arc::new(FakeNutrition {
        delay: Some(Duration::from_secs(300)),
        ..Default::default()
    });
    let orchestrator = orchestrator(nutrition, FakeGenerator::replying(RECIPE_JSON)).with_timeout(Duration::from_secs(5));

    let (status, body) = send_json(
        app_with(orchestrator, missing_scan()),
        Method::POST,
        "/api/generate-recipes",
        Some(r#"{"items":["egg"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["kind"], "timeout_error");
}

#[tokio::test]
async fn nutrition_endpoint_keeps_order_and_duplicates() {
    let (status, body) = send_json(
        default_app(),
        Method::POST,
        "/api/nutrition",
        Some(r#"{"items":["milk","egg","milk"]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["nutritionData"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["milk", "egg", "milk"]);
    assert_eq!(body["nutritionData"][0]["calories"], 70.0);
}

#[tokio::test]
async fn health_reports_service_configuration() {
    let (status, body) = send_json(default_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["config"]["nutritionix"]["configured"], true);
    assert_eq!(body["config"]["nebius"]["configured"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn extract_endpoint_cleans_scan_text() {
    let (status, body) = send_json(
        default_app(),
        Method::POST,
        "/api/extract",
        Some(r#"{"text":"1. Tomatoes - 3 large\n2. Onion (1 medium)\nHere is your list:"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredients"], serde_json::json!(["tomatoes", "onion"]));
}

#[tokio::test]
async fn scan_is_served_unchanged() {
    let raw = r#"{"raw_output": "1. Eggs - 6\n2. Milk", "device": "pi-cam"}"#;
    let path = scan_file(raw);
    let app = app_with(
        orchestrator(Arc::new(FakeNutrition::default()), FakeGenerator::replying(RECIPE_JSON)),
        ScanSource::File(path.clone()),
    );

    let (status, bytes) = send(app.clone(), Method::GET, "/api/scan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, raw.as_bytes());

    let (status, body) = send_json(app, Method::GET, "/api/scan/ingredients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredients"], serde_json::json!(["eggs", "milk"]));

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn missing_or_broken_scan_is_reported() {
    let (status, body) = send_json(default_app(), Method::GET, "/api/scan", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "scan_not_found");

    let path = scan_file("{ not json");
    let app = app_with(
        orchestrator(Arc::new(FakeNutrition::default()), FakeGenerator::replying(RECIPE_JSON)),
        ScanSource::File(path.clone()),
    );
    let (status, body) = send_json(app, Method::GET, "/api/scan/ingredients", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["kind"], "scan_invalid");

    std::fs::remove_file(path).ok();
}
