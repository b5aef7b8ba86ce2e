//! Qualification command handlers for the CLI.

use creatorfit_core::{AppConfig, CreatorStatus, SignalsMode, Taxonomy, ZeroHitPolicy};
use creatorfit_qualify::{classify, map_brand_targets, run_qualification, SignalsSource};
use uuid::Uuid;

/// Run and persist one qualification for the creator with `public_id`.
///
/// `demo` forces the placeholder signals regardless of configuration.
///
/// # Errors
///
/// Returns an error if the id is malformed, the creator does not exist, or the
/// pipeline rejects the run.
pub(crate) async fn run_qualify(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    taxonomy: &Taxonomy,
    public_id: &str,
    demo: bool,
) -> anyhow::Result<()> {
    let public_id = Uuid::parse_str(public_id.trim())
        .map_err(|_| anyhow::anyhow!("'{public_id}' is not a valid creator id"))?;

    let creator = creatorfit_db::get_creator_by_public_id(pool, public_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("creator '{public_id}' not found"))?;

    let mode = if demo {
        SignalsMode::Demo
    } else {
        config.signals_mode
    };
    let signals = SignalsSource::from_mode(mode, pool.clone());

    let run = run_qualification(pool, &signals, taxonomy, config.zero_hit_policy, creator.id).await?;
    let q = &run.qualification;

    println!("creator      {} ({})", creator.name, creator.public_id);
    println!("run          {}", run.run_id);
    println!(
        "niche        {} (confidence {:.2})",
        q.classification.primary_niche, q.classification.confidence
    );
    if !q.classification.evidence_keywords.is_empty() {
        println!("evidence     {}", q.classification.evidence_keywords.join(", "));
    }
    println!(
        "score        {} / grade {}  [engagement {}, reach {}, consistency {}, niche {}, penalty {}]",
        q.score.total,
        q.score.grade,
        q.score.engagement,
        q.score
            .reach
            .map_or_else(|| "n/a".to_string(), |r| r.to_string()),
        q.score.consistency,
        q.score.niche,
        q.score.fraud_penalty,
    );
    println!("local        {}", q.brand_targets.local.join(", "));
    println!("ecommerce    {}", q.brand_targets.ecommerce.join(", "));
    println!("status       {}", run.status);

    Ok(())
}

/// Print the classification and brand targets for free text.
pub(crate) fn run_classify(
    taxonomy: &Taxonomy,
    bio: &str,
    category: &str,
    use_declared_category: bool,
) {
    let policy = if use_declared_category {
        ZeroHitPolicy::DeclaredCategory
    } else {
        ZeroHitPolicy::General
    };

    let classification = classify(taxonomy, policy, bio, category);
    let targets = map_brand_targets(taxonomy, &classification.primary_niche);

    println!("primary      {}", classification.primary_niche);
    println!(
        "secondary    {}",
        classification
            .secondary_niches
            .first()
            .map_or("-", String::as_str)
    );
    println!("confidence   {:.2}", classification.confidence);
    println!("evidence     {}", classification.evidence_keywords.join(", "));
    println!("segment      {}", targets.niche_segment);
    println!("local        {}", targets.local.join(", "));
    println!("ecommerce    {}", targets.ecommerce.join(", "));
}

/// Print the creator overview as a table.
///
/// # Errors
///
/// Returns an error if `status` is unknown or the query fails.
pub(crate) async fn run_creators_list(
    pool: &sqlx::PgPool,
    status: Option<&str>,
    limit: i64,
) -> anyhow::Result<()> {
    let status = status
        .map(str::parse::<CreatorStatus>)
        .transpose()?
        .map(CreatorStatus::as_str);

    let rows = creatorfit_db::list_creators_overview(pool, status, limit).await?;
    if rows.is_empty() {
        println!("no creators found");
        return Ok(());
    }

    println!(
        "{:<38}{:<24}{:<15}{:<12}{:<7}GRADE",
        "PUBLIC ID", "NAME", "STATUS", "NICHE", "SCORE"
    );
    for row in &rows {
        println!(
            "{:<38}{:<24}{:<15}{:<12}{:<7}{}",
            row.public_id,
            truncate(&row.name, 22),
            row.status,
            row.primary_niche.as_deref().unwrap_or("-"),
            row.total_score
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
            row.grade.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Min Park", 22), "Min Park");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("김하은김하은", 4), "김하은~");
    }
}
