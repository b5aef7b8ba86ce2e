//! Rule-based fit scoring.
//!
//! Each signal is bucketed by a fixed threshold ladder, then the sub-scores are
//! combined with fixed weights. Everything here is pure and total over
//! validated [`ScoreInputs`]; range checks happen before this module.

use creatorfit_core::{CreatorScore, Grade, SCORING_ALGORITHM_VERSION};

use crate::types::ScoreInputs;

/// `(minimum, score)` rungs, highest first. Values below every rung get the floor.
type Ladder = [(f64, i16); 3];

const ENGAGEMENT_LADDER: Ladder = [(0.06, 100), (0.03, 70), (0.015, 45)];
const ENGAGEMENT_FLOOR: i16 = 20;

const CONSISTENCY_LADDER: Ladder = [(4.0, 100), (2.0, 70), (1.0, 40)];
const CONSISTENCY_FLOOR: i16 = 20;

const NICHE_LADDER: Ladder = [(0.75, 100), (0.6, 75), (0.45, 55)];
const NICHE_FLOOR: i16 = 35;

const REACH_LADDER: Ladder = [(1.2, 100), (0.8, 75), (0.5, 55)];
const REACH_FLOOR: i16 = 35;

const FRAUD_RULE_PENALTY: i16 = 10;
const MAX_FRAUD_PENALTY: i16 = 30;

/// Weights in percent: engagement, reach, consistency, niche, fraud.
const WEIGHTS_WITH_REACH: [i32; 5] = [30, 25, 20, 15, 10];
/// Weights in percent: engagement, consistency, niche, fraud.
const WEIGHTS_WITHOUT_REACH: [i32; 4] = [40, 25, 20, 15];

fn ladder_score(value: f64, ladder: &Ladder, floor: i16) -> i16 {
    ladder
        .iter()
        .find(|(min, _)| value >= *min)
        .map_or(floor, |(_, score)| *score)
}

/// `(likes + comments) / followers`; zero followers yields `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(followers: u64, likes: u64, comments: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    likes.saturating_add(comments) as f64 / followers as f64
}

/// Posts per week derived from a 30-day post count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn posts_per_week(content_count_30d: u64) -> f64 {
    content_count_30d as f64 / 4.0
}

/// Always one of 20, 45, 70, 100.
#[must_use]
pub fn engagement_score(er: f64) -> i16 {
    ladder_score(er, &ENGAGEMENT_LADDER, ENGAGEMENT_FLOOR)
}

/// Always one of 20, 40, 70, 100.
#[must_use]
pub fn consistency_score(posts_per_week: f64) -> i16 {
    ladder_score(posts_per_week, &CONSISTENCY_LADDER, CONSISTENCY_FLOOR)
}

/// Always one of 35, 55, 75, 100.
#[must_use]
pub fn niche_score(confidence: f64) -> i16 {
    ladder_score(confidence, &NICHE_LADDER, NICHE_FLOOR)
}

/// `None` when reach data is unavailable; never a substitute number.
#[must_use]
pub fn reach_score(reach_ratio: Option<f64>) -> Option<i16> {
    reach_ratio.map(|r| ladder_score(r, &REACH_LADDER, REACH_FLOOR))
}

/// Sum of the triggered heuristics, 10 each, in `0..=30`.
#[must_use]
pub fn fraud_penalty(followers: u64, er: f64, content_count_30d: u64) -> i16 {
    let rules = [
        followers > 20_000 && er < 0.008,
        followers > 50_000 && content_count_30d < 4,
        er > 0.12 && content_count_30d < 6,
    ];
    let triggered = rules.iter().filter(|hit| **hit).count();
    let penalty = i16::try_from(triggered).unwrap_or(i16::MAX);
    penalty
        .saturating_mul(FRAUD_RULE_PENALTY)
        .min(MAX_FRAUD_PENALTY)
}

/// Weighted total in `0..=100`.
///
/// Computed exactly in hundredths of a point and rounded half up, so
/// `65.5` becomes `66`.
#[must_use]
pub fn total_score(
    engagement: i16,
    reach: Option<i16>,
    consistency: i16,
    niche: i16,
    fraud_penalty: i16,
) -> i16 {
    let (er, cons, niche, fraud) = (
        i32::from(engagement),
        i32::from(consistency),
        i32::from(niche),
        i32::from(fraud_penalty),
    );

    let hundredths = match reach {
        Some(reach) => {
            let [w_er, w_reach, w_cons, w_niche, w_fraud] = WEIGHTS_WITH_REACH;
            w_er * er + w_reach * i32::from(reach) + w_cons * cons + w_niche * niche
                - w_fraud * fraud
        }
        None => {
            let [w_er, w_cons, w_niche, w_fraud] = WEIGHTS_WITHOUT_REACH;
            w_er * er + w_cons * cons + w_niche * niche - w_fraud * fraud
        }
    };

    let rounded = (hundredths + 50).div_euclid(100).clamp(0, 100);
    i16::try_from(rounded).unwrap_or(0)
}

/// `A` at 80 and above, `B` at 60 and above, otherwise `C`.
#[must_use]
pub fn grade(total: i16) -> Grade {
    if total >= 80 {
        Grade::A
    } else if total >= 60 {
        Grade::B
    } else {
        Grade::C
    }
}

/// Score one creator from validated signals and the classifier confidence.
#[must_use]
pub fn score_creator(inputs: &ScoreInputs, niche_confidence: f64) -> CreatorScore {
    let er = engagement_rate(inputs.followers, inputs.likes, inputs.comments);

    let engagement = engagement_score(er);
    let reach = reach_score(inputs.reach_ratio);
    let consistency = consistency_score(posts_per_week(inputs.content_count_30d));
    let niche = niche_score(niche_confidence);
    let fraud_penalty = fraud_penalty(inputs.followers, er, inputs.content_count_30d);
    let total = total_score(engagement, reach, consistency, niche, fraud_penalty);

    CreatorScore {
        engagement,
        reach,
        consistency,
        niche,
        fraud_penalty,
        total,
        grade: grade(total),
        algorithm_version: SCORING_ALGORITHM_VERSION.to_string(),
    }
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
