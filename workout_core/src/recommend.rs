//! Deterministic exercise recommendations for a training day.
//!
//! Scoring rules:
//! - Exercises the user cannot equip are dropped (bodyweight always counts)
//! - Already-chosen exercises are excluded outright
//! - +3 per primary muscle and +1 per secondary muscle in the day's tags,
//!   -5 when nothing matches
//! - -2 when the movement pattern repeats one already chosen
//! - Fatigue: -2 / -1 per primary muscle with high / moderate recent volume
//! - +0.5 for beginner exercises
//!
//! Ties keep catalog order, so identical inputs always give identical output.

use crate::catalog::equipment_available;
use crate::config::RecommendationConfig;
use crate::{Catalog, Difficulty, ExerciseTemplate, RecommendationContext};

/// Score assigned to exercises already in the day's list
pub const EXCLUDED_SCORE: f64 = -1000.0;

/// Candidates at or below this score are never returned
const RETAIN_ABOVE: f64 = -100.0;

/// A catalog entry with its score and a short explanation
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredExercise<'a> {
    pub exercise: &'a ExerciseTemplate,
    pub score: f64,
    pub reason: String,
}

fn count_matches(muscles: &[String], day_tags: &[String]) -> Vec<String> {
    muscles
        .iter()
        .filter(|m| day_tags.contains(*m))
        .cloned()
        .collect()
}

fn fatigue_penalty(
    exercise: &ExerciseTemplate,
    ctx: &RecommendationContext,
    config: &RecommendationConfig,
) -> f64 {
    exercise
        .primary_muscles
        .iter()
        .map(|muscle| {
            let volume = ctx.volume_for(muscle);
            if volume > config.high_fatigue_volume {
                2.0
            } else if volume > config.moderate_fatigue_volume {
                1.0
            } else {
                0.0
            }
        })
        .sum()
}

/// Score every equipment-compatible catalog entry, in catalog order
pub fn score_candidates<'a>(
    ctx: &RecommendationContext,
    catalog: &'a Catalog,
    config: &RecommendationConfig,
) -> Vec<ScoredExercise<'a>> {
    let available: Vec<&ExerciseTemplate> = catalog
        .iter()
        .filter(|e| equipment_available(e, &ctx.equipment))
        .collect();

    // Patterns of chosen exercises, as far as the equipment filter can see them
    let chosen_patterns: Vec<&str> = available
        .iter()
        .filter(|e| ctx.existing_exercises.contains(&e.name))
        .filter_map(|e| e.movement_pattern.as_deref())
        .collect();

    available
        .into_iter()
        .map(|exercise| {
            if ctx.existing_exercises.contains(&exercise.name) {
                return ScoredExercise {
                    exercise,
                    score: EXCLUDED_SCORE,
                    reason: "Already added".into(),
                };
            }

            let mut score = 0.0;
            let mut reasons = Vec::new();

            let primary = count_matches(&exercise.primary_muscles, &ctx.day_tags);
            let secondary = count_matches(&exercise.secondary_muscles, &ctx.day_tags);
            score += 3.0 * primary.len() as f64;
            score += secondary.len() as f64;

            if !primary.is_empty() {
                reasons.push(format!("Targets {}", primary.join(", ")));
            }
            if primary.is_empty() && secondary.is_empty() {
                score -= 5.0;
                reasons.push("Low relevance".to_string());
            }

            if let Some(pattern) = exercise.movement_pattern.as_deref() {
                if chosen_patterns.contains(&pattern) {
                    score -= 2.0;
                    reasons.push("Similar movement pattern".to_string());
                }
            }

            let fatigue = fatigue_penalty(exercise, ctx, config);
            score -= fatigue;
            if fatigue > 0.0 {
                reasons.push("Muscle group fatigued".to_string());
            }

            if exercise.difficulty == Some(Difficulty::Beginner) {
                score += 0.5;
            }

            let reason = if reasons.is_empty() {
                "Good match".to_string()
            } else {
                reasons.join(", ")
            };

            ScoredExercise {
                exercise,
                score,
                reason,
            }
        })
        .collect()
}

/// Best-scoring candidates, highest first, at most `config.max_results`
pub fn rank<'a>(
    ctx: &RecommendationContext,
    catalog: &'a Catalog,
    config: &RecommendationConfig,
) -> Vec<ScoredExercise<'a>> {
    let mut scored: Vec<_> = score_candidates(ctx, catalog, config)
        .into_iter()
        .filter(|s| s.score > RETAIN_ABOVE)
        .collect();

    // sort_by is stable: equal scores keep catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(config.max_results);

    tracing::debug!(
        "Ranked {} candidates for tags {:?}",
        scored.len(),
        ctx.day_tags
    );
    scored
}

/// Recommend exercises using explicit scorer parameters
pub fn recommend_with<'a>(
    ctx: &RecommendationContext,
    catalog: &'a Catalog,
    config: &RecommendationConfig,
) -> Vec<&'a ExerciseTemplate> {
    rank(ctx, catalog, config)
        .into_iter()
        .map(|s| s.exercise)
        .collect()
}

/// Recommend up to five exercises with the default parameters
pub fn recommend<'a>(ctx: &RecommendationContext, catalog: &'a Catalog) -> Vec<&'a ExerciseTemplate> {
    recommend_with(ctx, catalog, &RecommendationConfig::default())
}
