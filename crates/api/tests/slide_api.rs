//! Integration tests for the per-slide pipeline endpoints, driven through
//! the full router with a scripted gateway.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use carousel_db::models::brand::CreateBrand;
use carousel_db::models::post::CreatePost;
use carousel_db::models::slide::{CreateSlide, Slide};
use carousel_db::repositories::{BrandRepo, PostRepo, ProjectRepo, SlideRepo};
use carousel_gateway::fake::ScriptedGateway;
use common::{body_json, post_empty, post_json};
use serde_json::json;
use sqlx::PgPool;

async fn seed_slide(pool: &PgPool) -> Slide {
    let brand = BrandRepo::create(
        pool,
        &CreateBrand {
            name: "Aurora".into(),
            palette: vec!["#101010".into()],
            visual_tone: Some("minimal".into()),
            ..CreateBrand::default()
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(pool, brand.id, "Q3 launch").await.unwrap();
    let post = PostRepo::create(
        pool,
        &CreatePost {
            project_id: project.id,
            raw_post_text: "Why consistency beats intensity".into(),
            content_type: "frase".into(),
            caption: None,
            hashtags: vec![],
        },
    )
    .await
    .unwrap();
    SlideRepo::create(
        pool,
        &CreateSlide {
            post_id: post.id,
            slide_index: 0,
            slide_text: "Consistency beats intensity".into(),
            layout_preset: None,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: brief endpoint 404s for a missing slide
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn brief_for_missing_slide_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool, Arc::new(ScriptedGateway::new()));
    let response = post_empty(app, "/api/v1/slides/9999/brief", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Slide"));
}

// ---------------------------------------------------------------------------
// Test: variations without prompts return 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn variations_without_prompts_return_400(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let app = common::build_test_app(pool, Arc::new(ScriptedGateway::new()));

    let response = post_empty(app, &format!("/api/v1/slides/{}/variations", slide.id), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("prompt"));
}

// ---------------------------------------------------------------------------
// Test: an upstream rate limit on a single-shot stage is a server error
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_limited_brief_returns_500_with_upstream_status(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.push_text_failure(429);
    let app = common::build_test_app(pool, Arc::clone(&gateway));

    let response = post_empty(app, &format!("/api/v1/slides/{}/brief", slide.id), None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("429"));
}

// ---------------------------------------------------------------------------
// Test: rank without generations returns 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rank_without_generations_returns_400(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let app = common::build_test_app(pool, Arc::new(ScriptedGateway::new()));

    let response = post_empty(app, &format!("/api/v1/slides/{}/rank", slide.id), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: the full brief -> prompts -> variations -> rank flow over HTTP
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn full_slide_flow_selects_a_winner(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = Arc::new(ScriptedGateway::new());
    let app = common::build_test_app(pool, Arc::clone(&gateway));

    // Brief.
    gateway.push_text(r#"{"theme": "discipline", "emotion": "resolve"}"#);
    let response = post_empty(
        app.clone(),
        &format!("/api/v1/slides/{}/brief", slide.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["brief"]["theme"], "discipline");

    // Prompts.
    gateway.push_text(r#"{"variants": [{"prompt": "stoic runner at dawn"}]}"#);
    let response = post_json(
        app.clone(),
        &format!("/api/v1/slides/{}/prompts", slide.id),
        json!({ "n_variants": 1 }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);

    // Variations (unscripted image calls succeed with a stub payload).
    let response = post_json(
        app.clone(),
        &format!("/api/v1/slides/{}/variations", slide.id),
        json!({ "n_variations": 1 }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    let generation_id = body["generations"][0]["id"].as_i64().unwrap();
    assert_eq!(body["generations"][0]["is_selected"], false);

    // Rank.
    gateway.push_text(format!(
        r#"{{"rankings": [{{"id": {generation_id}, "score": 88, "reason": "on brief"}}],
            "best_id": {generation_id}}}"#
    ));
    let response = post_empty(app, &format!("/api/v1/slides/{}/rank", slide.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], false);
    assert_eq!(body["best"]["id"], generation_id);
    assert_eq!(body["best"]["is_selected"], true);
    assert_eq!(body["best"]["ranking_score"], 88);
}
