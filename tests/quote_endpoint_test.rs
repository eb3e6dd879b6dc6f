//! HTTP contract tests for the quote endpoint: envelope shape, camelCase
//! keys, status-code mapping, and byte-level response determinism.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use platter::api::{create_router, AppState};
use platter::datasource::{MockDeliveryQuoteProvider, MockDistanceResolver, ProviderError};
use platter::db::repo::TenantProfile;
use platter::domain::{
    AppliedOptionRule, ChoiceAdjustment, ChoiceId, DeliveryProviderKind, DeliverySettings,
    DistanceUnit, ItemId, MenuItem, Money, OptionChoice, OptionDef, OptionId, PricingTier,
    TaxKind, TaxRule, TaxScope, TenantId,
};
use platter::orchestration::PricingOrchestrator;
use platter::{init_db, Repository};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

fn money(s: &str) -> Money {
    Money::from_str_canonical(s).unwrap()
}

fn tenant() -> TenantId {
    TenantId::new("t-pizzeria".to_string())
}

async fn setup_test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    repo.upsert_tenant(
        &tenant(),
        &TenantProfile {
            name: "Testaurant".to_string(),
            address: "1 Main St".to_string(),
            currency: "EUR".to_string(),
            currency_symbol: "€".to_string(),
        },
    )
    .await
    .unwrap();
    repo.upsert_menu_item(
        &tenant(),
        &MenuItem {
            id: ItemId::new("item-margherita".to_string()),
            name: "Margherita".to_string(),
            price: money("10.00"),
        },
    )
    .await
    .unwrap();
    repo.upsert_option(
        &tenant(),
        &OptionDef {
            id: OptionId::new("opt-size".to_string()),
            name: "Size".to_string(),
            choices: vec![OptionChoice {
                id: ChoiceId::new("ch-large".to_string()),
                name: "Large".to_string(),
            }],
            multi_select: false,
            min_selections: 0,
            max_selections: 1,
            allow_quantity: false,
            min_quantity: 1,
            max_quantity: 1,
        },
    )
    .await
    .unwrap();
    repo.upsert_option_rule(
        &tenant(),
        &ItemId::new("item-margherita".to_string()),
        &AppliedOptionRule {
            option_id: OptionId::new("opt-size".to_string()),
            required: false,
            order: 0,
            choice_adjustments: vec![ChoiceAdjustment {
                choice_id: ChoiceId::new("ch-large".to_string()),
                price_adjustment: money("2.50"),
                is_available: true,
                is_default: false,
            }],
        },
    )
    .await
    .unwrap();
    repo.replace_tax_rules(
        &tenant(),
        &[TaxRule {
            name: "VAT".to_string(),
            enabled: true,
            rate: money("8"),
            kind: TaxKind::Percentage,
            scope: TaxScope::EntireOrder,
        }],
    )
    .await
    .unwrap();
    repo.upsert_delivery_settings(
        &tenant(),
        &DeliverySettings {
            enabled: true,
            distance_unit: DistanceUnit::Km,
            maximum_radius: money("10"),
            provider: DeliveryProviderKind::Local,
            pricing_tiers: vec![PricingTier {
                name: "Standard".to_string(),
                distance_covered: money("10"),
                base_fee: money("5.00"),
                additional_fee_per_unit: money("1.00"),
                is_default: true,
            }],
        },
    )
    .await
    .unwrap();

    let orchestrator = Arc::new(PricingOrchestrator::new(
        repo.clone(),
        Arc::new(MockDistanceResolver::with_distance(money("5"))),
        Arc::new(MockDeliveryQuoteProvider::failing(ProviderError::Other(
            "not used".to_string(),
        ))),
        None,
    ));

    let app = create_router(AppState { repo, orchestrator });
    (app, temp_dir)
}

fn quote_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/orders/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delivery_body() -> Value {
    json!({
        "tenantId": "t-pizzeria",
        "orderType": "delivery",
        "items": [{
            "itemId": "item-margherita",
            "quantity": 2,
            "choices": [{"optionId": "opt-size", "choiceId": "ch-large"}]
        }],
        "dropoffAddress": "2 Side St",
        "tip": 2.00
    })
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Recursively assert every object key is camelCase (no underscores).
fn assert_all_keys_camel_case(value: &Value, path: &str) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                assert!(
                    !key.contains('_'),
                    "key '{}' at {} is not camelCase",
                    key,
                    path
                );
                assert_all_keys_camel_case(child, &format!("{}.{}", path, key));
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                assert_all_keys_camel_case(child, &format!("{}[{}]", path, i));
            }
        }
        _ => {}
    }
}

#[tokio::test]
async fn test_quote_success_envelope_and_breakdown() {
    let (app, _temp) = setup_test_app().await;

    let response = app.oneshot(quote_request(&delivery_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], true);

    let data = &body["data"];
    // 2 x (10.00 + 2.50) = 25.00, 8% tax, 5.00 local delivery, 2.00 tip.
    assert_eq!(data["subtotal"], 25.0);
    assert_eq!(data["tax"], 2.0);
    assert_eq!(data["deliveryFee"], 5.0);
    assert_eq!(data["tip"], 2.0);
    assert_eq!(data["total"], 34.0);
    assert_eq!(data["currency"], "EUR");
    assert_eq!(data["orderType"], "delivery");
    assert_eq!(data["items"][0]["unitPrice"], 12.5);
    assert_eq!(data["delivery"]["tierUsed"], "Standard");
    assert_eq!(data["fingerprint"].as_str().unwrap().len(), 32);
    assert!(data["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quote_response_keys_are_camel_case() {
    let (app, _temp) = setup_test_app().await;

    let response = app.oneshot(quote_request(&delivery_body())).await.unwrap();
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_all_keys_camel_case(&body, "$");
}

#[tokio::test]
async fn test_identical_requests_return_identical_bytes() {
    let (app, _temp) = setup_test_app().await;

    let first = app
        .clone()
        .oneshot(quote_request(&delivery_body()))
        .await
        .unwrap();
    let second = app.oneshot(quote_request(&delivery_body())).await.unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_bytes(first).await, body_bytes(second).await);
}

#[tokio::test]
async fn test_empty_cart_is_bad_request() {
    let (app, _temp) = setup_test_app().await;

    let body = json!({
        "tenantId": "t-pizzeria",
        "orderType": "pickup",
        "items": []
    });
    let response = app.oneshot(quote_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "cart is empty");
}

#[tokio::test]
async fn test_unknown_tenant_is_unprocessable() {
    let (app, _temp) = setup_test_app().await;

    let body = json!({
        "tenantId": "t-ghost",
        "orderType": "pickup",
        "items": [{"itemId": "item-margherita", "quantity": 1, "choices": []}]
    });
    let response = app.oneshot(quote_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("unknown tenant"));
}

#[tokio::test]
async fn test_radius_rejection_carries_literal_message() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.unwrap();
    let repo = Arc::new(Repository::new(pool));
    repo.upsert_tenant(
        &tenant(),
        &TenantProfile {
            name: "Testaurant".to_string(),
            address: "1 Main St".to_string(),
            currency: "EUR".to_string(),
            currency_symbol: "€".to_string(),
        },
    )
    .await
    .unwrap();
    repo.upsert_menu_item(
        &tenant(),
        &MenuItem {
            id: ItemId::new("item-margherita".to_string()),
            name: "Margherita".to_string(),
            price: money("10.00"),
        },
    )
    .await
    .unwrap();
    repo.upsert_delivery_settings(
        &tenant(),
        &DeliverySettings {
            enabled: true,
            distance_unit: DistanceUnit::Km,
            maximum_radius: money("10"),
            provider: DeliveryProviderKind::Local,
            pricing_tiers: vec![PricingTier {
                name: "Standard".to_string(),
                distance_covered: money("10"),
                base_fee: money("5.00"),
                additional_fee_per_unit: money("1.00"),
                is_default: true,
            }],
        },
    )
    .await
    .unwrap();

    let orchestrator = Arc::new(PricingOrchestrator::new(
        repo.clone(),
        Arc::new(MockDistanceResolver::with_distance(money("12"))),
        Arc::new(MockDeliveryQuoteProvider::failing(ProviderError::Other(
            "not used".to_string(),
        ))),
        None,
    ));
    let app = create_router(AppState { repo, orchestrator });

    let body = json!({
        "tenantId": "t-pizzeria",
        "orderType": "delivery",
        "items": [{"itemId": "item-margherita", "quantity": 1, "choices": []}],
        "dropoffAddress": "2 Side St"
    });
    let response = app.oneshot(quote_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "2 Side St is outside the 10km delivery radius"
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _temp) = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "ok");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
