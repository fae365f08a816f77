//! End-to-end pipeline tests against a real database and scripted gateway.

use assert_matches::assert_matches;
use carousel_core::ranking::{FALLBACK_SCORE, FALLBACK_REASON};
use carousel_db::models::brand::CreateBrand;
use carousel_db::models::image_generation::CreateImageGeneration;
use carousel_db::models::image_prompt::CreateImagePrompt;
use carousel_db::models::post::CreatePost;
use carousel_db::models::slide::{CreateSlide, Slide};
use carousel_db::repositories::{
    BrandRepo, ImageGenerationRepo, ImagePromptRepo, PostRepo, ProjectRepo, QualityMetricsRepo,
    SlideRepo, VisualBriefRepo,
};
use carousel_gateway::fake::ScriptedGateway;
use carousel_gateway::GeneratedImage;
use carousel_pipeline::variations::VariationParams;
use carousel_pipeline::{brief, download, prompts, ranking, style, variations, PipelineError};
use carousel_storage::MemoryStorage;
use sqlx::PgPool;
use std::io::Read;

/// Brand -> project -> post -> cover slide fixture.
async fn seed_slide(pool: &PgPool) -> Slide {
    let brand = BrandRepo::create(
        pool,
        &CreateBrand {
            name: "Aurora".into(),
            palette: vec!["#111111".into()],
            visual_tone: Some("minimal".into()),
            dont_rules: Some("no clip art".into()),
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
            raw_post_text: "5 habits of productive teams".into(),
            content_type: "educativo".into(),
            caption: Some("Save this for later".into()),
            hashtags: vec!["#productivity".into()],
        },
    )
    .await
    .unwrap();
    SlideRepo::create(
        pool,
        &CreateSlide {
            post_id: post.id,
            slide_index: 0,
            slide_text: "Habit one: plan tomorrow today".into(),
            layout_preset: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_prompt(pool: &PgPool, slide_id: i64) {
    ImagePromptRepo::replace_for_slide(
        pool,
        slide_id,
        &[CreateImagePrompt {
            prompt: "sunrise over a desk".into(),
            negative_prompt: Some("text".into()),
            model_hint: "cheap".into(),
            variant_index: 0,
        }],
    )
    .await
    .unwrap();
}

async fn seed_generation(pool: &PgPool, slide_id: i64, url: &str) -> i64 {
    ImageGenerationRepo::create(
        pool,
        &CreateImageGeneration {
            slide_id,
            prompt_id: None,
            model_used: "google/gemini-2.5-flash-image".into(),
            image_url: url.into(),
            thumb_url: None,
            width: Some(1080),
            height: Some(1350),
            seed: None,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Brief generator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn brief_upserts_and_overwrites(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();

    // First call: model omits palette and text flags, defaults apply.
    gateway.push_text(r#"Here you go: {"theme": "dawn", "emotion": "hope"}"#);
    let first = brief::generate_brief(&pool, &gateway, slide.id).await.unwrap();
    assert_eq!(first.theme.as_deref(), Some("dawn"));
    assert_eq!(first.palette.0, vec!["#111111".to_string()]);
    assert!(first.text_on_image);
    assert_eq!(first.text_limit_words, 10);

    // Second call replaces the brief in place.
    gateway.push_text(r#"{"theme": "dusk", "text_on_image": false, "text_limit_words": 4}"#);
    let second = brief::generate_brief(&pool, &gateway, slide.id).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.theme.as_deref(), Some("dusk"));
    assert!(!second.text_on_image);
    assert_eq!(second.text_limit_words, 4);

    // The cover marker reached the model.
    let sent = gateway.text_prompts.lock().unwrap();
    assert!(sent[0].contains("COVER slide"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn brief_fails_without_json_in_reply(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();
    gateway.push_text("I could not produce a brief, sorry.");

    let err = brief::generate_brief(&pool, &gateway, slide.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Extraction { stage: "brief" });
    assert!(VisualBriefRepo::find_by_slide(&pool, slide.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn brief_for_missing_slide_is_not_found(pool: PgPool) {
    let gateway = ScriptedGateway::new();
    let err = brief::generate_brief(&pool, &gateway, 9999).await.unwrap_err();
    assert_matches!(err, PipelineError::NotFound { entity: "Slide", .. });
}

// ---------------------------------------------------------------------------
// Prompt builder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn prompt_builder_replaces_prior_set(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();
    gateway.push_text(r#"{"theme": "dawn"}"#);
    brief::generate_brief(&pool, &gateway, slide.id).await.unwrap();

    gateway.push_text(r#"{"variants": [{"prompt": "a"}, {"prompt": "b", "negative_prompt": "x"}]}"#);
    let first = prompts::build_prompts(&pool, &gateway, slide.id, Some(2)).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].negative_prompt.as_deref(), Some("x"));

    // Unparseable reply degrades to one deterministic fallback variant.
    gateway.push_text("no structured output");
    let second = prompts::build_prompts(&pool, &gateway, slide.id, Some(2)).await.unwrap();
    assert_eq!(second.len(), 1);
    assert!(second[0].prompt.contains("dawn"));

    let stored = ImagePromptRepo::list_by_slide(&pool, slide.id).await.unwrap();
    assert_eq!(stored.len(), 1, "replacement must drop the prior set");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn prompt_builder_requires_brief(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();
    let err = prompts::build_prompts(&pool, &gateway, slide.id, None).await.unwrap_err();
    assert_matches!(err, PipelineError::NotFound { entity: "VisualBrief", .. });
}

// ---------------------------------------------------------------------------
// Variation generator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn two_variations_create_two_unselected_rows(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    seed_prompt(&pool, slide.id).await;
    let gateway = ScriptedGateway::new();
    let storage = MemoryStorage::new();
    gateway.push_image(GeneratedImage::stub());
    gateway.push_image(GeneratedImage::stub());

    let params = VariationParams {
        n_variations: Some(2),
        ..VariationParams::default()
    };
    let batch = variations::generate_variations(&pool, &gateway, &storage, slide.id, &params)
        .await
        .unwrap();

    assert_eq!(batch.count, 2);
    assert_eq!(batch.generations.len(), 2);
    assert!(batch.generations.iter().all(|g| !g.is_selected));
    assert_eq!(storage.len(), 2);

    // Every upstream prompt carries the mandatory brand token block.
    let sent = gateway.image_prompts.lock().unwrap();
    assert_eq!(sent.len(), 2);
    for (model, prompt) in sent.iter() {
        assert_eq!(model, "google/gemini-2.5-flash-image");
        assert!(prompt.starts_with("BRAND TOKENS: palette #111111"));
        assert!(prompt.contains("NEGATIVES: no clip art"));
        assert!(prompt.contains("sunrise over a desk"));
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rate_limited_variation_is_skipped_not_retried(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    seed_prompt(&pool, slide.id).await;
    let gateway = ScriptedGateway::new();
    let storage = MemoryStorage::new();
    gateway.push_image_failure(429);
    gateway.push_image(GeneratedImage::stub());

    let params = VariationParams {
        n_variations: Some(2),
        ..VariationParams::default()
    };
    let batch = variations::generate_variations(&pool, &gateway, &storage, slide.id, &params)
        .await
        .unwrap();

    // The 429 variation is lost; the call still succeeds with the rest.
    assert_eq!(batch.count, 1);
    assert_eq!(gateway.image_prompts.lock().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn high_tier_selects_premium_model(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    seed_prompt(&pool, slide.id).await;
    let gateway = ScriptedGateway::new();
    let storage = MemoryStorage::new();

    let params = VariationParams {
        quality_tier: Some("high".into()),
        n_variations: Some(1),
        ..VariationParams::default()
    };
    let batch = variations::generate_variations(&pool, &gateway, &storage, slide.id, &params)
        .await
        .unwrap();
    assert_eq!(batch.generations[0].model_used, "google/gemini-2.5-pro-image");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn variations_without_prompts_fail(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();
    let storage = MemoryStorage::new();

    let err = variations::generate_variations(
        &pool,
        &gateway,
        &storage,
        slide.id,
        &VariationParams::default(),
    )
    .await
    .unwrap_err();
    assert_matches!(err, PipelineError::Validation(msg) if msg.contains("prompt builder"));
}

// ---------------------------------------------------------------------------
// Ranking & selection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ranking_selects_best_and_records_metrics(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let loser = seed_generation(&pool, slide.id, "https://cdn/a.png").await;
    let winner = seed_generation(&pool, slide.id, "https://cdn/b.png").await;

    let gateway = ScriptedGateway::new();
    gateway.push_text(format!(
        r#"{{"rankings": [
            {{"id": {loser}, "score": 55, "reason": "flat"}},
            {{"id": {winner}, "score": 91, "reason": "strong cover", "adherence": 5,
              "legibility": 4, "brand_consistency": 5, "premium_look": 4,
              "publish_readiness": 5, "publish_ready": true}}
        ], "best_id": {winner}}}"#
    ));

    let result = ranking::rank_and_select(&pool, &gateway, slide.id).await.unwrap();
    assert!(!result.fallback);
    assert_eq!(result.best.id, winner);
    assert_eq!(result.best.ranking_score, Some(91));

    let selected = ImageGenerationRepo::find_selected(&pool, slide.id).await.unwrap().unwrap();
    assert_eq!(selected.id, winner);
    let other = ImageGenerationRepo::find_by_id(&pool, loser).await.unwrap().unwrap();
    assert!(!other.is_selected);
    assert_eq!(other.ranking_score, Some(55));

    let metrics = QualityMetricsRepo::find_by_slide(&pool, slide.id).await.unwrap().unwrap();
    assert_eq!(metrics.adherence, 5);
    assert_eq!(metrics.legibility, 4);
    assert!(metrics.publish_ready);

    // Re-ranking keeps the at-most-one-selected invariant.
    gateway.push_text(format!(
        r#"{{"rankings": [{{"id": {loser}, "score": 80}}], "best_id": {loser}}}"#
    ));
    let rerun = ranking::rank_and_select(&pool, &gateway, slide.id).await.unwrap();
    assert_eq!(rerun.best.id, loser);
    assert_eq!(ImageGenerationRepo::count_selected(&pool, slide.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparseable_ranking_reply_falls_back_to_most_recent(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    seed_generation(&pool, slide.id, "https://cdn/old.png").await;
    let newest = seed_generation(&pool, slide.id, "https://cdn/new.png").await;

    let gateway = ScriptedGateway::new();
    gateway.push_text("the second one looked nicer to me");

    let result = ranking::rank_and_select(&pool, &gateway, slide.id).await.unwrap();
    assert!(result.fallback);
    assert!(result.rankings.is_none());
    assert!(result.metrics.is_none());
    assert_eq!(result.best.id, newest);
    assert_eq!(result.best.ranking_score, Some(FALLBACK_SCORE));
    assert_eq!(result.best.ranking_reason.as_deref(), Some(FALLBACK_REASON));
    assert_eq!(ImageGenerationRepo::count_selected(&pool, slide.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ranking_without_generations_fails(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let gateway = ScriptedGateway::new();
    let err = ranking::rank_and_select(&pool, &gateway, slide.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Validation(msg) if msg.contains("Generate variations"));
}

// ---------------------------------------------------------------------------
// Download assembler
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn download_packages_selected_images_and_caption(pool: PgPool) {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let slide = seed_slide(&pool).await;
    let generation = seed_generation(&pool, slide.id, "https://cdn/final.png").await;
    let mut tx = pool.begin().await.unwrap();
    ImageGenerationRepo::select_winner(&mut *tx, slide.id, generation).await.unwrap();
    tx.commit().await.unwrap();

    let gateway = ScriptedGateway::new();
    let bundle = download::assemble_download(&pool, &gateway, slide.post_id).await.unwrap();

    assert_eq!(bundle.filename, format!("post_{}.zip", slide.post_id));
    assert_eq!(bundle.image_urls, vec!["https://cdn/final.png".to_string()]);

    let bytes = BASE64.decode(bundle.zip_base64.as_bytes()).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"slide_01.png".to_string()));
    assert!(names.contains(&"caption.txt".to_string()));

    let mut caption = String::new();
    archive.by_name("caption.txt").unwrap().read_to_string(&mut caption).unwrap();
    assert_eq!(caption, "Save this for later\n\n#productivity");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn download_for_missing_content_is_not_found(pool: PgPool) {
    let gateway = ScriptedGateway::new();
    let err = download::assemble_download(&pool, &gateway, 424242).await.unwrap_err();
    assert_matches!(err, PipelineError::NotFound { entity: "Content", .. });
}

// ---------------------------------------------------------------------------
// Brand style analysis
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn style_analysis_requires_examples(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let brand_id = SlideRepo::find_chain(&pool, slide.id).await.unwrap().unwrap().brand.id;

    let gateway = ScriptedGateway::new();
    let err = style::analyze_brand_style(&pool, &gateway, brand_id).await.unwrap_err();
    assert_matches!(err, PipelineError::Validation(msg) if msg.contains("example"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn style_analysis_surfaces_rate_limit(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let brand_id = SlideRepo::find_chain(&pool, slide.id).await.unwrap().unwrap().brand.id;
    BrandRepo::add_example(&pool, brand_id, "https://cdn/example.png", None).await.unwrap();

    let gateway = ScriptedGateway::new();
    gateway.push_text_failure(429);

    let err = style::analyze_brand_style(&pool, &gateway, brand_id).await.unwrap_err();
    assert_matches!(err, PipelineError::RateLimited(_));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn style_analysis_stores_guide_and_clears_dirty_flag(pool: PgPool) {
    let slide = seed_slide(&pool).await;
    let brand_id = SlideRepo::find_chain(&pool, slide.id).await.unwrap().unwrap().brand.id;
    BrandRepo::add_example(&pool, brand_id, "https://cdn/example.png", None).await.unwrap();
    BrandRepo::mark_style_guide_dirty(&pool, brand_id).await.unwrap();

    let gateway = ScriptedGateway::new();
    gateway.push_text(r##"{"preset_id": "minimal-01", "confirmed_palette": ["#111111"]}"##);

    let guide = style::analyze_brand_style(&pool, &gateway, brand_id).await.unwrap();
    assert_eq!(guide["preset_id"], "minimal-01");

    let brand = BrandRepo::find_by_id(&pool, brand_id).await.unwrap().unwrap();
    assert!(!brand.template_sets_dirty);
    assert_eq!(brand.template_sets_dirty_count, 0);
    assert_eq!(brand.style_guide.unwrap()["preset_id"], "minimal-01");
    assert!(brand.template_sets_updated_at.is_some());
}
