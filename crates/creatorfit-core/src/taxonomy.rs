//! Niche keyword dictionaries and brand-target tables.
//!
//! The table order is the classifier's tie-break order: when two niches match
//! the same number of keywords, the one listed first wins. The built-in order is
//! `food, cafe, beauty, fashion, fitness, travel, parenting, pets, home, tech,
//! gaming, education`. `general` is not a keyword entry; it is the fallback tag
//! with its own brand targets.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Fallback niche tag used when nothing matched or a tag is unknown.
pub const GENERAL_NICHE: &str = "general";

type BuiltinNiche = (
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
);

/// `(tag, keywords, local targets, e-commerce targets)`.
///
/// Keywords are lowercase and matched as substrings, so avoid short English
/// fragments that occur inside unrelated words (`cat`, `mom`, `hair`).
const BUILTIN_NICHES: &[BuiltinNiche] = &[
    (
        "food",
        &[
            "food", "restaurant", "sushi", "ramen", "bbq", "recipe", "cooking", "chef",
            "dessert", "bakery", "맛집", "먹방", "요리", "레시피", "맛스타그램",
        ],
        &["restaurants", "bakeries", "food trucks", "specialty grocers"],
        &["meal kits", "packaged snacks", "sauces & condiments", "kitchenware"],
    ),
    (
        "cafe",
        &["cafe", "café", "coffee", "latte", "barista", "brunch", "카페", "커피", "브런치"],
        &["independent cafes", "dessert shops", "brunch spots"],
        &["specialty coffee beans", "home brewing gear", "tea & beverages"],
    ),
    (
        "beauty",
        &[
            "beauty", "makeup", "skincare", "cosmetic", "nails", "haircare", "뷰티",
            "메이크업", "화장품", "스킨케어", "네일",
        ],
        &["hair salons", "nail studios", "skin clinics", "beauty retail stores"],
        &["skincare", "color cosmetics", "hair care", "beauty devices"],
    ),
    (
        "fashion",
        &[
            "fashion", "ootd", "outfit", "streetwear", "vintage", "styling", "패션", "코디",
            "데일리룩", "옷스타그램",
        ],
        &["boutiques", "vintage shops", "tailors", "shoe stores"],
        &["d2c apparel", "accessories", "footwear", "jewelry"],
    ),
    (
        "fitness",
        &[
            "fitness", "gym", "workout", "pilates", "yoga", "running", "crossfit", "운동",
            "헬스", "필라테스", "요가", "러닝", "오운완",
        ],
        &["gyms", "pilates studios", "yoga studios", "healthy restaurants"],
        &["activewear", "supplements", "home fitness equipment", "wearables"],
    ),
    (
        "travel",
        &["travel", "wanderlust", "hotel", "backpacking", "여행", "호텔", "여행스타그램"],
        &["hotels", "guesthouses", "tour operators", "local attractions"],
        &["luggage", "travel accessories", "booking platforms", "outdoor gear"],
    ),
    (
        "parenting",
        &[
            "parenting", "momlife", "mommy", "dadlife", "baby", "toddler", "육아", "아기",
            "엄마", "아빠",
        ],
        &["kids cafes", "family restaurants", "learning centers", "pediatric clinics"],
        &["baby care", "kids apparel", "toys", "educational products"],
    ),
    (
        "pets",
        &[
            "puppy", "kitten", "dogstagram", "catstagram", "petstagram", "반려견", "강아지",
            "고양이", "반려동물",
        ],
        &["pet cafes", "groomers", "veterinary clinics", "pet hotels"],
        &["pet food", "pet supplies", "pet wellness", "pet apparel"],
    ),
    (
        "home",
        &["interior", "homedecor", "home decor", "diy", "houseplant", "인테리어", "집꾸미기", "살림"],
        &["furniture stores", "flower shops", "home improvement stores"],
        &["home decor", "furniture", "kitchen & dining", "cleaning products"],
    ),
    (
        "tech",
        &["tech", "gadget", "unboxing", "iphone", "coding", "developer", "테크", "전자기기", "언박싱"],
        &["electronics stores", "repair shops", "co-working spaces"],
        &["consumer electronics", "mobile accessories", "software subscriptions"],
    ),
    (
        "gaming",
        &["gaming", "gamer", "esports", "twitch", "게임", "게이머", "스트리머"],
        &["pc bangs", "board game cafes", "arcades"],
        &["gaming peripherals", "games & consoles", "energy drinks"],
    ),
    (
        "education",
        &["study", "student", "teacher", "tutor", "english", "공부", "스터디", "영어", "교육"],
        &["academies", "bookstores", "study cafes"],
        &["online courses", "stationery", "books", "language apps"],
    ),
];

const GENERAL_LOCAL: &[&str] = &[
    "local restaurants & cafes",
    "beauty salons",
    "fitness studios",
    "retail boutiques",
];

const GENERAL_ECOMMERCE: &[&str] = &[
    "lifestyle goods",
    "d2c apparel",
    "home & living",
    "health supplements",
];

/// Ordered brand-category suggestions for one niche.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandTargetLists {
    pub local: Vec<String>,
    pub ecommerce: Vec<String>,
}

/// One niche: its tag, its keyword dictionary and its brand targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicheEntry {
    pub tag: String,
    pub keywords: Vec<String>,
    pub brand_targets: BrandTargetLists,
}

/// On-disk shape of a taxonomy override file.
#[derive(Debug, Deserialize)]
pub struct TaxonomyFile {
    pub niches: Vec<NicheEntry>,
    pub general: BrandTargetLists,
}

/// Read-only lookup tables shared by the classifier and the brand mapper.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    niches: Vec<NicheEntry>,
    general: BrandTargetLists,
}

impl Taxonomy {
    /// The compiled-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        let niches = BUILTIN_NICHES
            .iter()
            .map(|(tag, keywords, local, ecommerce)| NicheEntry {
                tag: (*tag).to_string(),
                keywords: to_strings(keywords),
                brand_targets: BrandTargetLists {
                    local: to_strings(local),
                    ecommerce: to_strings(ecommerce),
                },
            })
            .collect();

        Self {
            niches,
            general: BrandTargetLists {
                local: to_strings(GENERAL_LOCAL),
                ecommerce: to_strings(GENERAL_ECOMMERCE),
            },
        }
    }

    /// Build a taxonomy from a parsed file, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the tables are inconsistent.
    pub fn from_file(file: TaxonomyFile) -> Result<Self, ConfigError> {
        validate_taxonomy(&file)?;
        Ok(Self {
            niches: file.niches,
            general: file.general,
        })
    }

    /// Niche entries in tie-break order.
    #[must_use]
    pub fn niches(&self) -> &[NicheEntry] {
        &self.niches
    }

    #[must_use]
    pub fn general_targets(&self) -> &BrandTargetLists {
        &self.general
    }

    /// Whether `tag` names a keyword niche or `general`.
    #[must_use]
    pub fn is_known_tag(&self, tag: &str) -> bool {
        tag == GENERAL_NICHE || self.niches.iter().any(|n| n.tag == tag)
    }

    /// Brand targets for `tag`, falling back to `general` for unknown tags.
    ///
    /// Returns the segment actually used together with its lists.
    #[must_use]
    pub fn brand_targets(&self, tag: &str) -> (&str, &BrandTargetLists) {
        self.niches
            .iter()
            .find(|n| n.tag == tag)
            .map_or((GENERAL_NICHE, &self.general), |n| {
                (n.tag.as_str(), &n.brand_targets)
            })
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a taxonomy override from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: TaxonomyFile = serde_yaml::from_str(&content)?;
    Taxonomy::from_file(file)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn validate_taxonomy(file: &TaxonomyFile) -> Result<(), ConfigError> {
    if file.niches.is_empty() {
        return Err(ConfigError::Validation(
            "taxonomy must define at least one niche".to_string(),
        ));
    }

    validate_targets(GENERAL_NICHE, &file.general)?;

    let mut seen_tags = HashSet::new();
    for niche in &file.niches {
        let tag = niche.tag.as_str();
        if tag.trim().is_empty() {
            return Err(ConfigError::Validation(
                "niche tag must be non-empty".to_string(),
            ));
        }
        if tag.trim() != tag {
            return Err(ConfigError::Validation(format!(
                "niche tag '{tag}' has surrounding whitespace"
            )));
        }
        if tag == GENERAL_NICHE {
            return Err(ConfigError::Validation(format!(
                "'{GENERAL_NICHE}' is the fallback niche and cannot have keywords"
            )));
        }
        if !seen_tags.insert(tag) {
            return Err(ConfigError::Validation(format!(
                "duplicate niche tag: '{tag}'"
            )));
        }
        if niche.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "niche '{tag}' has no keywords"
            )));
        }
        let mut seen_keywords = HashSet::new();
        for keyword in &niche.keywords {
            if keyword.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "niche '{tag}' has an empty keyword"
                )));
            }
            if *keyword != keyword.to_lowercase() {
                return Err(ConfigError::Validation(format!(
                    "niche '{tag}' keyword '{keyword}' must be lowercase"
                )));
            }
            if !seen_keywords.insert(keyword.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "niche '{tag}' lists keyword '{keyword}' twice"
                )));
            }
        }
        validate_targets(tag, &niche.brand_targets)?;
    }

    Ok(())
}

fn validate_targets(tag: &str, targets: &BrandTargetLists) -> Result<(), ConfigError> {
    if targets.local.is_empty() || targets.ecommerce.is_empty() {
        return Err(ConfigError::Validation(format!(
            "niche '{tag}' must have non-empty local and ecommerce brand targets"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "taxonomy_test.rs"]
mod tests;
