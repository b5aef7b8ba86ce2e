use super::*;

fn inputs(followers: u64, likes: u64, comments: u64, content: u64) -> ScoreInputs {
    ScoreInputs {
        followers,
        likes,
        comments,
        content_count_30d: content,
        reach_ratio: None,
    }
}

/// 0.000, 0.001, ... up to 0.300.
fn rate_grid() -> impl Iterator<Item = f64> {
    (0..=300).map(|i| f64::from(i) / 1000.0)
}

// ---------------------------------------------------------------------------
// Ladders
// ---------------------------------------------------------------------------

#[test]
fn engagement_score_is_monotonic_and_bucketed() {
    let mut previous = 0;
    for er in rate_grid() {
        let score = engagement_score(er);
        assert!([20, 45, 70, 100].contains(&score), "er {er} -> {score}");
        assert!(score >= previous, "not monotonic at er {er}");
        previous = score;
    }
}

#[test]
fn engagement_score_boundaries() {
    assert_eq!(engagement_score(0.0), 20);
    assert_eq!(engagement_score(0.0149), 20);
    assert_eq!(engagement_score(0.015), 45);
    assert_eq!(engagement_score(0.03), 70);
    assert_eq!(engagement_score(0.055), 70);
    assert_eq!(engagement_score(0.06), 100);
}

#[test]
fn niche_score_is_monotonic_and_bucketed() {
    let mut previous = 0;
    for i in 0..=100 {
        let confidence = f64::from(i) / 100.0;
        let score = niche_score(confidence);
        assert!([35, 55, 75, 100].contains(&score), "c {confidence} -> {score}");
        assert!(score >= previous, "not monotonic at c {confidence}");
        previous = score;
    }
    assert_eq!(niche_score(0.45), 55);
    assert_eq!(niche_score(0.6), 75);
    assert_eq!(niche_score(0.75), 100);
}

#[test]
fn consistency_score_boundaries() {
    assert_eq!(consistency_score(posts_per_week(0)), 20);
    assert_eq!(consistency_score(posts_per_week(3)), 20);
    assert_eq!(consistency_score(posts_per_week(4)), 40);
    assert_eq!(consistency_score(posts_per_week(8)), 70);
    assert_eq!(consistency_score(posts_per_week(16)), 100);
}

#[test]
fn reach_score_distinguishes_unavailable_from_zero() {
    assert_eq!(reach_score(None), None);
    assert_eq!(reach_score(Some(0.0)), Some(35));
    assert_eq!(reach_score(Some(0.5)), Some(55));
    assert_eq!(reach_score(Some(0.8)), Some(75));
    assert_eq!(reach_score(Some(1.2)), Some(100));
}

#[test]
fn zero_followers_yield_zero_engagement_rate() {
    assert!(engagement_rate(0, 500, 20).abs() < f64::EPSILON);
    assert!((engagement_rate(1000, 50, 5) - 0.055).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Fraud penalty
// ---------------------------------------------------------------------------

#[test]
fn fraud_penalty_sums_exactly_the_triggered_rules() {
    // No rule.
    assert_eq!(fraud_penalty(1_000, 0.05, 8), 0);
    // Big account, dead engagement.
    assert_eq!(fraud_penalty(20_001, 0.007, 8), 10);
    // Very big account, barely posting.
    assert_eq!(fraud_penalty(50_001, 0.05, 3), 10);
    // Implausible engagement with little content.
    assert_eq!(fraud_penalty(1_000, 0.13, 5), 10);
    // First two together.
    assert_eq!(fraud_penalty(60_000, 0.001, 2), 20);
    // Second and third together.
    assert_eq!(fraud_penalty(60_000, 0.2, 2), 20);
}

#[test]
fn fraud_penalty_thresholds_are_strict() {
    assert_eq!(fraud_penalty(20_000, 0.001, 8), 0);
    assert_eq!(fraud_penalty(50_000, 0.05, 3), 0);
    assert_eq!(fraud_penalty(1_000, 0.12, 5), 0);
    assert_eq!(fraud_penalty(1_000, 0.13, 6), 0);
}

#[test]
fn fraud_penalty_is_always_within_bounds() {
    for followers in [0, 10_000, 20_001, 50_001, 1_000_000] {
        for er in rate_grid() {
            for content in [0, 3, 5, 10] {
                let p = fraud_penalty(followers, er, content);
                assert!((0..=30).contains(&p));
                assert_eq!(p % 10, 0);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Total and grade
// ---------------------------------------------------------------------------

#[test]
fn total_rounds_half_up() {
    // 0.40*70 + 0.25*70 + 0.20*100 = 65.5
    assert_eq!(total_score(70, None, 70, 100, 0), 66);
}

#[test]
fn total_uses_reach_weights_when_available() {
    // 0.30*100 + 0.25*100 + 0.20*100 + 0.15*100 - 0.10*0 = 90
    assert_eq!(total_score(100, Some(100), 100, 100, 0), 90);
    // Same sub-scores without reach: 0.40*100 + 0.25*100 + 0.20*100 = 85
    assert_eq!(total_score(100, None, 100, 100, 0), 85);
}

#[test]
fn total_is_always_within_bounds() {
    let subscores = [20, 35, 40, 45, 55, 70, 75, 100];
    let reaches = [None, Some(35), Some(55), Some(75), Some(100)];
    for er in subscores {
        for cons in subscores {
            for niche in subscores {
                for reach in reaches {
                    for fraud in [0, 10, 20, 30] {
                        let total = total_score(er, reach, cons, niche, fraud);
                        assert!((0..=100).contains(&total));
                    }
                }
            }
        }
    }
    assert_eq!(total_score(0, Some(0), 0, 0, 30), 0);
    assert_eq!(total_score(100, None, 100, 100, 0), 85);
}

#[test]
fn grade_boundaries_are_exact() {
    assert_eq!(grade(79), Grade::B);
    assert_eq!(grade(80), Grade::A);
    assert_eq!(grade(59), Grade::C);
    assert_eq!(grade(60), Grade::B);
    assert_eq!(grade(0), Grade::C);
    assert_eq!(grade(100), Grade::A);
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn worked_example_scores_sixty_six_b() {
    let score = score_creator(&inputs(1000, 50, 5, 8), 1.0);

    assert_eq!(score.engagement, 70);
    assert_eq!(score.reach, None);
    assert_eq!(score.consistency, 70);
    assert_eq!(score.niche, 100);
    assert_eq!(score.fraud_penalty, 0);
    assert_eq!(score.total, 66);
    assert_eq!(score.grade, Grade::B);
    assert_eq!(score.algorithm_version, SCORING_ALGORITHM_VERSION);
}

#[test]
fn reach_changes_the_formula() {
    let mut with_reach = inputs(1000, 50, 5, 8);
    with_reach.reach_ratio = Some(1.5);

    let score = score_creator(&with_reach, 1.0);
    assert_eq!(score.reach, Some(100));
    // 0.30*70 + 0.25*100 + 0.20*70 + 0.15*100 = 75
    assert_eq!(score.total, 75);
    assert_eq!(score.grade, Grade::B);
}

#[test]
fn zero_followers_do_not_panic() {
    let score = score_creator(&inputs(0, 0, 0, 0), 0.0);
    assert_eq!(score.engagement, 20);
    assert_eq!(score.fraud_penalty, 0);
    // 0.40*20 + 0.25*20 + 0.20*35 = 20
    assert_eq!(score.total, 20);
    assert_eq!(score.grade, Grade::C);
}
