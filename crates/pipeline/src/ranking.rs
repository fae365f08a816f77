//! Ranking & selection engine.
//!
//! Asks the text model to score the slide's recent candidates against the
//! rubric and name a best one, then flips selection inside one transaction:
//! deselect everything for the slide, then mark the winner. When the reply
//! has no parseable JSON the engine degrades to a deterministic fallback
//! (most recent candidate, fixed score) so the stage always terminates with
//! exactly one selection.

use carousel_core::ranking::{
    clamp_score, decide_winner, parse_ranking_reply, CandidateRanking, FALLBACK_REASON,
    FALLBACK_SCORE, RUBRIC,
};
use carousel_core::tier::MODEL_TEXT;
use carousel_core::types::DbId;
use carousel_db::models::image_generation::{ImageGeneration, RankingUpdate};
use carousel_db::models::quality_metrics::{QualityMetrics, UpsertQualityMetrics};
use carousel_db::models::visual_brief::VisualBrief;
use carousel_db::repositories::{
    ImageGenerationRepo, QualityMetricsRepo, SlideRepo, VisualBriefRepo,
};
use carousel_gateway::AiGateway;
use sqlx::PgPool;

use crate::error::PipelineError;

/// How many recent candidates are considered (newest first).
pub const RANKING_CANDIDATE_LIMIT: i64 = 10;

/// Result of one ranking run.
#[derive(Debug)]
pub struct RankingResult {
    /// The generation now marked selected.
    pub best: ImageGeneration,
    /// All candidates with fresh scores, when the reply parsed.
    pub rankings: Option<Vec<ImageGeneration>>,
    /// Metrics recorded for the winner, when the reply carried sub-scores.
    pub metrics: Option<QualityMetrics>,
    /// True when the deterministic fallback path ran.
    pub fallback: bool,
}

/// Rank a slide's candidates and select exactly one.
pub async fn rank_and_select(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    slide_id: DbId,
) -> Result<RankingResult, PipelineError> {
    let candidates =
        ImageGenerationRepo::list_recent(pool, slide_id, RANKING_CANDIDATE_LIMIT).await?;
    if candidates.is_empty() {
        return Err(PipelineError::Validation(
            "No generations to rank for this slide. Generate variations first.".into(),
        ));
    }

    // Optional context: ranking proceeds without a brief, just blinder.
    let brief = VisualBriefRepo::find_by_slide(pool, slide_id).await?;
    let tone = SlideRepo::find_chain(pool, slide_id)
        .await?
        .and_then(|chain| chain.brand.visual_tone.clone());

    let instruction = build_ranking_instruction(brief.as_ref(), tone.as_deref(), &candidates);
    let reply = gateway.generate_text(MODEL_TEXT, &instruction).await?;

    let candidate_ids: Vec<DbId> = candidates.iter().map(|g| g.id).collect();

    match parse_ranking_reply(&reply) {
        Some(outcome) => {
            let winner_id = decide_winner(&outcome, &candidate_ids).ok_or_else(|| {
                PipelineError::Internal("winner decision on empty candidate set".into())
            })?;

            let mut tx = pool.begin().await?;
            ImageGenerationRepo::deselect_all(&mut *tx, slide_id).await?;
            for entry in &outcome.rankings {
                if !candidate_ids.contains(&entry.id) {
                    continue;
                }
                let update = RankingUpdate {
                    generation_id: entry.id,
                    ranking_score: clamp_score(entry.score),
                    ranking_reason: entry.reason.clone(),
                    is_selected: entry.id == winner_id,
                };
                ImageGenerationRepo::apply_ranking(&mut *tx, slide_id, &update).await?;
            }
            // The winner may not appear in the rankings list; the flag is
            // set regardless.
            ImageGenerationRepo::select_winner(&mut *tx, slide_id, winner_id).await?;
            tx.commit().await?;

            let metrics = match outcome.rankings.iter().find(|r| r.id == winner_id) {
                Some(winner_entry) => Some(
                    QualityMetricsRepo::upsert(pool, slide_id, &metrics_from(winner_entry))
                        .await?,
                ),
                None => None,
            };

            let best = ImageGenerationRepo::find_by_id(pool, winner_id)
                .await?
                .ok_or(PipelineError::NotFound {
                    entity: "ImageGeneration",
                    id: winner_id,
                })?;
            let rankings =
                ImageGenerationRepo::list_recent(pool, slide_id, RANKING_CANDIDATE_LIMIT).await?;

            tracing::info!(slide_id, winner_id, "[ranking] Winner selected");
            Ok(RankingResult {
                best,
                rankings: Some(rankings),
                metrics,
                fallback: false,
            })
        }
        None => {
            // Deterministic fallback: most recent candidate wins with a
            // fixed score, so the pipeline still ends with one selection.
            let winner_id = candidate_ids[0];
            tracing::warn!(
                slide_id,
                winner_id,
                "[ranking] Unparseable ranking reply, falling back to most recent generation",
            );

            let mut tx = pool.begin().await?;
            ImageGenerationRepo::deselect_all(&mut *tx, slide_id).await?;
            let update = RankingUpdate {
                generation_id: winner_id,
                ranking_score: FALLBACK_SCORE,
                ranking_reason: Some(FALLBACK_REASON.to_string()),
                is_selected: true,
            };
            ImageGenerationRepo::apply_ranking(&mut *tx, slide_id, &update).await?;
            tx.commit().await?;

            let best = ImageGenerationRepo::find_by_id(pool, winner_id)
                .await?
                .ok_or(PipelineError::NotFound {
                    entity: "ImageGeneration",
                    id: winner_id,
                })?;
            Ok(RankingResult {
                best,
                rankings: None,
                metrics: None,
                fallback: true,
            })
        }
    }
}

/// Convert the winner's rubric sub-scores into a metrics upsert, clamping
/// each into 0-5.
fn metrics_from(entry: &CandidateRanking) -> UpsertQualityMetrics {
    let sub = |v: Option<i16>| v.unwrap_or(0).clamp(0, 5);
    UpsertQualityMetrics {
        adherence: sub(entry.adherence),
        legibility: sub(entry.legibility),
        brand_consistency: sub(entry.brand_consistency),
        premium_look: sub(entry.premium_look),
        publish_readiness: sub(entry.publish_readiness),
        publish_ready: entry.publish_ready.unwrap_or(false),
    }
}

/// Build the rubric instruction. Candidates are passed as (id, model, url)
/// tuples only — the model never sees pixel data, so its judgment is
/// approximate by construction.
fn build_ranking_instruction(
    brief: Option<&VisualBrief>,
    tone: Option<&str>,
    candidates: &[ImageGeneration],
) -> String {
    let mut out = String::from(
        "Score each candidate image for an Instagram carousel slide from 0 to 100 and pick the best.\n",
    );

    out.push_str("Criteria (each judged 0-5):\n");
    for criterion in RUBRIC {
        out.push_str(&format!(
            "- {} (weight {:.2}): {}\n",
            criterion.key, criterion.weight, criterion.description
        ));
    }

    if let Some(tone) = tone {
        out.push_str(&format!("\nBrand tone: {tone}\n"));
    }
    if let Some(brief) = brief {
        out.push_str(&format!(
            "Brief: theme={}, emotion={}, style={}\n",
            brief.theme.as_deref().unwrap_or("-"),
            brief.emotion.as_deref().unwrap_or("-"),
            brief.style.as_deref().unwrap_or("-"),
        ));
    }

    out.push_str("\nCandidates:\n");
    for generation in candidates {
        out.push_str(&format!(
            "- id={} model={} url={}\n",
            generation.id, generation.model_used, generation.image_url
        ));
    }

    out.push_str(
        "\nAnswer with a single JSON object: {\"rankings\": [{\"id\", \"score\", \"reason\", \
         \"adherence\", \"legibility\", \"brand_consistency\", \"premium_look\", \
         \"publish_readiness\", \"publish_ready\"}], \"best_id\": number}.\n",
    );
    out
}
