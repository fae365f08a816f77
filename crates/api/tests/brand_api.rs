//! Integration tests for the brand style-analysis endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use carousel_db::models::brand::CreateBrand;
use carousel_db::repositories::BrandRepo;
use carousel_gateway::fake::ScriptedGateway;
use common::{body_json, post_empty, test_token};
use sqlx::PgPool;

async fn seed_brand_with_example(pool: &PgPool) -> i64 {
    let brand = BrandRepo::create(
        pool,
        &CreateBrand {
            name: "Aurora".into(),
            palette: vec!["#101010".into()],
            ..CreateBrand::default()
        },
    )
    .await
    .unwrap();
    BrandRepo::add_example(pool, brand.id, "https://cdn/example.png", None)
        .await
        .unwrap();
    brand.id
}

// ---------------------------------------------------------------------------
// Test: an upstream rate limit passes through as 429
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_limited_style_analysis_returns_429(pool: PgPool) {
    let brand_id = seed_brand_with_example(&pool).await;
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_text_failure(429);
    let app = common::build_test_app(pool, Arc::clone(&gateway));

    let token = test_token();
    let response = post_empty(
        app,
        &format!("/api/v1/brands/{brand_id}/style-analysis"),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// ---------------------------------------------------------------------------
// Test: a successful analysis returns the styleGuide envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn style_analysis_returns_style_guide(pool: PgPool) {
    let brand_id = seed_brand_with_example(&pool).await;
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_text(r#"{"preset_id": "minimal-01", "recommended_templates": ["t1"]}"#);
    let app = common::build_test_app(pool, Arc::clone(&gateway));

    let token = test_token();
    let response = post_empty(
        app,
        &format!("/api/v1/brands/{brand_id}/style-analysis"),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["styleGuide"]["preset_id"], "minimal-01");
}
