//! Ranking rubric constants and decision logic.
//!
//! The ranking model scores each candidate generation 0-100 against five
//! 0-5 sub-criteria and names a `best_id`. Parsing its reply is best-effort:
//! when no JSON object can be extracted the engine falls back to the most
//! recent candidate with a fixed score so the pipeline always terminates
//! with exactly one selection.

use serde::Deserialize;

use crate::extraction::extract_json_object;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Rubric
// ---------------------------------------------------------------------------

/// One sub-criterion of the ranking rubric (scored 0-5).
pub struct RubricCriterion {
    pub key: &'static str,
    pub weight: f64,
    pub description: &'static str,
}

/// The five sub-criteria, in the order they appear in the rubric prompt.
pub const RUBRIC: &[RubricCriterion] = &[
    RubricCriterion {
        key: "adherence",
        weight: 0.30,
        description: "adherence to the visual brief (theme, metaphor, style)",
    },
    RubricCriterion {
        key: "legibility",
        weight: 0.20,
        description: "room and contrast for overlaid text",
    },
    RubricCriterion {
        key: "brand_consistency",
        weight: 0.20,
        description: "palette and tone consistency with the brand",
    },
    RubricCriterion {
        key: "premium_look",
        weight: 0.15,
        description: "overall production quality, no artifacts",
    },
    RubricCriterion {
        key: "publish_readiness",
        weight: 0.15,
        description: "could be published as-is",
    },
];

/// Score assigned to the fallback winner when the ranking reply is unparseable.
pub const FALLBACK_SCORE: i32 = 70;

/// Reason recorded for the fallback winner.
pub const FALLBACK_REASON: &str =
    "Automatically selected most recent generation: ranking response could not be parsed";

/// Clamp a raw model score into the 0-100 range.
pub fn clamp_score(raw: i64) -> i32 {
    raw.clamp(0, 100) as i32
}

// ---------------------------------------------------------------------------
// Parsed reply
// ---------------------------------------------------------------------------

/// Per-candidate entry in the ranking reply.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRanking {
    pub id: DbId,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub adherence: Option<i16>,
    #[serde(default)]
    pub legibility: Option<i16>,
    #[serde(default)]
    pub brand_consistency: Option<i16>,
    #[serde(default)]
    pub premium_look: Option<i16>,
    #[serde(default)]
    pub publish_readiness: Option<i16>,
    #[serde(default)]
    pub publish_ready: Option<bool>,
}

/// The ranking model's full reply.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingOutcome {
    #[serde(default)]
    pub rankings: Vec<CandidateRanking>,
    #[serde(default)]
    pub best_id: Option<DbId>,
}

/// Parse the free-form ranking reply. `None` means the fallback path applies.
pub fn parse_ranking_reply(text: &str) -> Option<RankingOutcome> {
    let value = extract_json_object(text)?;
    serde_json::from_value(value).ok()
}

/// Decide the winning candidate id.
///
/// Prefers an explicit `best_id` that names a known candidate, then the
/// highest-scored ranked candidate that is known, then the first candidate
/// (candidates are ordered most recent first).
pub fn decide_winner(outcome: &RankingOutcome, candidates: &[DbId]) -> Option<DbId> {
    if let Some(best) = outcome.best_id {
        if candidates.contains(&best) {
            return Some(best);
        }
    }
    outcome
        .rankings
        .iter()
        .filter(|r| candidates.contains(&r.id))
        .max_by_key(|r| r.score)
        .map(|r| r.id)
        .or_else(|| candidates.first().copied())
}
