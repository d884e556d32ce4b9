use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Multiplier applied when a profile has nothing to say.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

static NEUTRAL_PROFILE: CityBiasProfile = CityBiasProfile {
    western: NEUTRAL_MULTIPLIER,
    ethnic: NEUTRAL_MULTIPLIER,
    streetwear: NEUTRAL_MULTIPLIER,
    luxury: NEUTRAL_MULTIPLIER,
    budget: NEUTRAL_MULTIPLIER,
    colors: BTreeMap::new(),
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CityBiasProfile {
    pub western: f64,
    pub ethnic: f64,
    pub streetwear: f64,
    pub luxury: f64,
    pub budget: f64,
    pub colors: BTreeMap<String, f64>,
}

impl Default for CityBiasProfile {
    fn default() -> Self {
        NEUTRAL_PROFILE.clone()
    }
}

impl CityBiasProfile {
    pub fn neutral() -> &'static CityBiasProfile {
        &NEUTRAL_PROFILE
    }

    pub fn color_multiplier(&self, color: &str) -> f64 {
        self.colors.get(color).copied().unwrap_or(NEUTRAL_MULTIPLIER)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ProfileBook(pub BTreeMap<String, CityBiasProfile>);

impl ProfileBook {
    pub fn profile(&self, city: &str) -> &CityBiasProfile {
        self.0.get(city).unwrap_or(CityBiasProfile::neutral())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CityBiasProfile)> {
        self.0.iter()
    }
}

/// Which category groups and price buckets each profile multiplier applies to.
///
/// A group listed in `neutral` has no style affinity; every group in the
/// catalog must appear in at least one of `western`, `ethnic`, `streetwear`
/// or `neutral`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StyleRules {
    pub western: BTreeSet<String>,
    pub ethnic: BTreeSet<String>,
    pub streetwear: BTreeSet<String>,
    pub neutral: BTreeSet<String>,
    pub luxury_prone: BTreeSet<String>,
    pub budget_prone: BTreeSet<String>,
    pub luxury_tier: BTreeSet<String>,
    pub budget_tier: BTreeSet<String>,
}

impl StyleRules {
    pub fn is_classified(&self, group: &str) -> bool {
        self.western.contains(group)
            || self.ethnic.contains(group)
            || self.streetwear.contains(group)
            || self.neutral.contains(group)
    }

    /// Style multiplier for a group. The three checks are independent, so a
    /// group in several families picks up each multiplier in turn.
    pub fn style_multiplier(&self, group: &str, profile: &CityBiasProfile) -> f64 {
        let mut mult = NEUTRAL_MULTIPLIER;
        if self.western.contains(group) {
            mult *= profile.western;
        }
        if self.ethnic.contains(group) {
            mult *= profile.ethnic;
        }
        if self.streetwear.contains(group) {
            mult *= profile.streetwear;
        }
        mult
    }

    pub fn price_multiplier(&self, bucket: &str, group: &str, profile: &CityBiasProfile) -> f64 {
        let mut mult = NEUTRAL_MULTIPLIER;
        if self.luxury_tier.contains(bucket) && self.luxury_prone.contains(group) {
            mult *= profile.luxury;
        }
        if self.budget_tier.contains(bucket) && self.budget_prone.contains(group) {
            mult *= profile.budget;
        }
        mult
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unlisted_city_and_color_are_neutral() {
        let mut book = ProfileBook::default();
        book.0.insert(
            "Mumbai".into(),
            CityBiasProfile {
                western: 1.3,
                colors: [("Black".to_string(), 1.2)].into_iter().collect(),
                ..CityBiasProfile::default()
            },
        );
        assert_eq!(book.profile("Nowhere"), CityBiasProfile::neutral());
        let mumbai = book.profile("Mumbai");
        assert_eq!(mumbai.color_multiplier("Black"), 1.2);
        assert_eq!(mumbai.color_multiplier("Teal"), NEUTRAL_MULTIPLIER);
    }

    #[test]
    fn missing_profile_fields_deserialize_as_neutral() {
        let profile: CityBiasProfile = serde_json::from_str(r#"{"luxury": 1.5}"#).unwrap();
        assert_eq!(profile.luxury, 1.5);
        assert_eq!(profile.western, NEUTRAL_MULTIPLIER);
        assert!(profile.colors.is_empty());
    }

    #[test]
    fn style_multipliers_compound_across_families() {
        let rules = StyleRules {
            western: set(&["Fusion"]),
            ethnic: set(&["Fusion", "Ethnic"]),
            ..StyleRules::default()
        };
        let profile = CityBiasProfile {
            western: 2.0,
            ethnic: 0.5,
            streetwear: 3.0,
            ..CityBiasProfile::default()
        };
        assert_eq!(rules.style_multiplier("Fusion", &profile), 1.0);
        assert_eq!(rules.style_multiplier("Ethnic", &profile), 0.5);
        assert_eq!(rules.style_multiplier("Other", &profile), 1.0);
    }

    #[test]
    fn price_multiplier_needs_tier_and_prone_group() {
        let rules = StyleRules {
            luxury_prone: set(&["Occasion"]),
            budget_prone: set(&["Street"]),
            luxury_tier: set(&["P6"]),
            budget_tier: set(&["P1"]),
            ..StyleRules::default()
        };
        let profile = CityBiasProfile {
            luxury: 1.4,
            budget: 0.8,
            ..CityBiasProfile::default()
        };
        assert_eq!(rules.price_multiplier("P6", "Occasion", &profile), 1.4);
        assert_eq!(rules.price_multiplier("P6", "Street", &profile), 1.0);
        assert_eq!(rules.price_multiplier("P1", "Street", &profile), 0.8);
        assert_eq!(rules.price_multiplier("P3", "Occasion", &profile), 1.0);
    }
}
