//! Keyword-dictionary niche classifier.

use creatorfit_core::{
    NicheClassification, Taxonomy, ZeroHitPolicy, CLASSIFIER_MODEL_VERSION, GENERAL_NICHE,
    MAX_EVIDENCE_KEYWORDS,
};

struct NicheHits<'a> {
    tag: &'a str,
    hits: usize,
    evidence: Vec<&'a str>,
}

/// Classify a creator from their bio and declared category.
///
/// Both inputs are joined and lowercased; every keyword of every niche is
/// matched as a substring and counted at most once. Niches are ranked by hit
/// count with ties going to the earlier taxonomy entry.
///
/// When the best niche has no hits the result is `general` with confidence
/// `0.0`. Under [`ZeroHitPolicy::DeclaredCategory`] a declared category that
/// names a known niche tag is used instead.
#[must_use]
pub fn classify(
    taxonomy: &Taxonomy,
    policy: ZeroHitPolicy,
    bio: &str,
    declared_category: &str,
) -> NicheClassification {
    let text = format!("{bio} {declared_category}").to_lowercase();

    let mut ranked: Vec<NicheHits<'_>> = taxonomy
        .niches()
        .iter()
        .map(|niche| {
            let matched: Vec<&str> = niche
                .keywords
                .iter()
                .map(String::as_str)
                .filter(|kw| text.contains(kw))
                .collect();
            NicheHits {
                tag: niche.tag.as_str(),
                hits: matched.len(),
                evidence: matched,
            }
        })
        .collect();

    // Stable: equal counts keep taxonomy order.
    ranked.sort_by(|a, b| b.hits.cmp(&a.hits));

    let total_hits: usize = ranked.iter().map(|n| n.hits).sum();

    let Some(top) = ranked.first().filter(|n| n.hits > 0) else {
        return NicheClassification {
            primary_niche: zero_hit_niche(taxonomy, policy, declared_category),
            secondary_niches: Vec::new(),
            confidence: 0.0,
            evidence_keywords: Vec::new(),
            model_version: CLASSIFIER_MODEL_VERSION.to_string(),
        };
    };

    let secondary_niches = ranked
        .get(1)
        .filter(|n| n.hits > 0)
        .map(|n| vec![n.tag.to_string()])
        .unwrap_or_default();

    NicheClassification {
        primary_niche: top.tag.to_string(),
        secondary_niches,
        confidence: confidence(top.hits, total_hits),
        evidence_keywords: top
            .evidence
            .iter()
            .take(MAX_EVIDENCE_KEYWORDS)
            .map(|kw| (*kw).to_string())
            .collect(),
        model_version: CLASSIFIER_MODEL_VERSION.to_string(),
    }
}

fn zero_hit_niche(taxonomy: &Taxonomy, policy: ZeroHitPolicy, declared_category: &str) -> String {
    match policy {
        ZeroHitPolicy::General => GENERAL_NICHE.to_string(),
        ZeroHitPolicy::DeclaredCategory => {
            let declared = declared_category.trim().to_lowercase();
            if taxonomy.is_known_tag(&declared) {
                declared
            } else {
                GENERAL_NICHE.to_string()
            }
        }
    }
}

/// `primary / total`, with a zero total treated as 1, rounded to 2 decimals.
#[allow(clippy::cast_precision_loss)]
fn confidence(primary_hits: usize, total_hits: usize) -> f64 {
    let denominator = total_hits.max(1) as f64;
    let raw = primary_hits as f64 / denominator;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
