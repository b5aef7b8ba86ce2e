use creatorfit_core::{BrandTargets, Taxonomy};

/// Brand categories for a niche. Unknown tags resolve to the `general` entry,
/// so every tag yields non-empty `local` and `ecommerce` lists.
#[must_use]
pub fn map_brand_targets(taxonomy: &Taxonomy, niche: &str) -> BrandTargets {
    let (segment, lists) = taxonomy.brand_targets(niche);
    BrandTargets {
        niche_segment: segment.to_string(),
        local: lists.local.clone(),
        ecommerce: lists.ecommerce.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creatorfit_core::GENERAL_NICHE;

    #[test]
    fn every_classifier_tag_maps_to_non_empty_lists() {
        let taxonomy = Taxonomy::builtin();
        let tags = taxonomy
            .niches()
            .iter()
            .map(|n| n.tag.clone())
            .chain(std::iter::once(GENERAL_NICHE.to_string()));

        for tag in tags {
            let targets = map_brand_targets(&taxonomy, &tag);
            assert_eq!(targets.niche_segment, tag);
            assert!(!targets.local.is_empty(), "{tag} has no local targets");
            assert!(!targets.ecommerce.is_empty(), "{tag} has no ecommerce targets");
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_general() {
        let taxonomy = Taxonomy::builtin();
        let targets = map_brand_targets(&taxonomy, "underwater-basket-weaving");

        assert_eq!(targets.niche_segment, GENERAL_NICHE);
        assert_eq!(&targets.local, &taxonomy.general_targets().local);
        assert_eq!(&targets.ecommerce, &taxonomy.general_targets().ecommerce);
    }

    #[test]
    fn food_keeps_table_order() {
        let targets = map_brand_targets(&Taxonomy::builtin(), "food");
        assert_eq!(targets.local.first().map(String::as_str), Some("restaurants"));
        assert_eq!(targets.ecommerce.first().map(String::as_str), Some("meal kits"));
    }
}
