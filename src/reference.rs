use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use crate::error::{TrendError, TrendResult};
use crate::profiles::{CityBiasProfile, ProfileBook, StyleRules};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    pub name: String,
    /// Apparel market size in ₹ billions.
    pub market_bn: f64,
    pub region: String,
    pub tier: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubCategory {
    pub name: String,
    pub group: String,
    pub search_phrase: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceBucket {
    pub label: String,
    pub low: u32,
    pub high: u32,
    pub midpoint: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Color {
    pub name: String,
    pub hex: String,
    pub family: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReferenceData {
    pub cities: Vec<City>,
    pub subcategories: Vec<SubCategory>,
    pub price_buckets: Vec<PriceBucket>,
    pub colors: Vec<Color>,
    pub styles: StyleRules,
    pub profiles: ProfileBook,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    data: ReferenceData,
    city_idx: HashMap<String, usize>,
    subcategory_idx: HashMap<String, usize>,
    bucket_idx: HashMap<String, usize>,
    color_idx: HashMap<String, usize>,
    max_market_bn: f64,
}

impl Catalog {
    pub fn new(data: ReferenceData) -> TrendResult<Self> {
        let city_idx = index("city", data.cities.iter().map(|c| c.name.as_str()))?;
        let subcategory_idx = index(
            "sub-category",
            data.subcategories.iter().map(|s| s.name.as_str()),
        )?;
        let bucket_idx = index(
            "price bucket",
            data.price_buckets.iter().map(|b| b.label.as_str()),
        )?;
        let color_idx = index("color", data.colors.iter().map(|c| c.name.as_str()))?;

        let mut max_market_bn = 0.0_f64;
        for city in &data.cities {
            if !city.market_bn.is_finite() || city.market_bn <= 0.0 {
                return Err(TrendError::InvalidCatalog(format!(
                    "city '{}' has non-positive market size {}",
                    city.name, city.market_bn
                )));
            }
            max_market_bn = max_market_bn.max(city.market_bn);
        }

        validate_buckets(&data.price_buckets)?;
        validate_styles(&data)?;
        warn_orphan_profiles(&data, &city_idx, &color_idx);

        Ok(Self {
            data,
            city_idx,
            subcategory_idx,
            bucket_idx,
            color_idx,
            max_market_bn,
        })
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn styles(&self) -> &StyleRules {
        &self.data.styles
    }

    pub fn profile(&self, city: &str) -> &CityBiasProfile {
        self.data.profiles.profile(city)
    }

    /// Largest market in the catalog; geo scores are relative to it.
    pub fn reference_max_market_bn(&self) -> f64 {
        self.max_market_bn
    }

    pub fn city(&self, name: &str) -> TrendResult<&City> {
        self.city_idx
            .get(name)
            .map(|&i| &self.data.cities[i])
            .ok_or_else(|| TrendError::unknown("city", name))
    }

    pub fn subcategory(&self, name: &str) -> TrendResult<&SubCategory> {
        self.subcategory_idx
            .get(name)
            .map(|&i| &self.data.subcategories[i])
            .ok_or_else(|| TrendError::unknown("sub-category", name))
    }

    pub fn price_bucket(&self, label: &str) -> TrendResult<&PriceBucket> {
        self.bucket_idx
            .get(label)
            .map(|&i| &self.data.price_buckets[i])
            .ok_or_else(|| TrendError::unknown("price bucket", label))
    }

    pub fn color(&self, name: &str) -> TrendResult<&Color> {
        self.color_idx
            .get(name)
            .map(|&i| &self.data.colors[i])
            .ok_or_else(|| TrendError::unknown("color", name))
    }

    pub fn groups(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.data
            .subcategories
            .iter()
            .map(|s| s.group.as_str())
            .filter(|g| seen.insert(*g))
            .collect()
    }

    pub fn subcategories_in(&self, group: &str) -> TrendResult<Vec<&SubCategory>> {
        let subs: Vec<_> = self
            .data
            .subcategories
            .iter()
            .filter(|s| s.group == group)
            .collect();
        if subs.is_empty() {
            return Err(TrendError::unknown("group", group));
        }
        Ok(subs)
    }

    pub fn colors_in(&self, family: &str) -> TrendResult<Vec<&Color>> {
        let colors: Vec<_> = self
            .data
            .colors
            .iter()
            .filter(|c| c.family == family)
            .collect();
        if colors.is_empty() {
            return Err(TrendError::unknown("color family", family));
        }
        Ok(colors)
    }
}

fn index<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> TrendResult<HashMap<String, usize>> {
    let mut idx = HashMap::new();
    for (i, id) in ids.enumerate() {
        if idx.insert(id.to_string(), i).is_some() {
            return Err(TrendError::InvalidCatalog(format!("duplicate {kind} '{id}'")));
        }
    }
    if idx.is_empty() {
        return Err(TrendError::InvalidCatalog(format!("no {kind} entries")));
    }
    Ok(idx)
}

fn validate_buckets(buckets: &[PriceBucket]) -> TrendResult<()> {
    for b in buckets {
        if !(b.low <= b.midpoint && b.midpoint <= b.high) {
            return Err(TrendError::InvalidCatalog(format!(
                "price bucket '{}' needs low <= midpoint <= high",
                b.label
            )));
        }
    }
    let mut sorted: Vec<_> = buckets.iter().collect();
    sorted.sort_by_key(|b| b.low);
    for pair in sorted.windows(2) {
        if pair[1].low <= pair[0].high {
            return Err(TrendError::InvalidCatalog(format!(
                "price buckets '{}' and '{}' overlap",
                pair[0].label, pair[1].label
            )));
        }
    }
    Ok(())
}

fn validate_styles(data: &ReferenceData) -> TrendResult<()> {
    let styles = &data.styles;
    let groups: BTreeSet<&str> = data.subcategories.iter().map(|s| s.group.as_str()).collect();
    for group in &groups {
        if !styles.is_classified(group) {
            return Err(TrendError::InvalidCatalog(format!(
                "group '{group}' has no style family; list it under western, ethnic, streetwear or neutral"
            )));
        }
    }
    for (set_name, set) in [
        ("luxury_prone", &styles.luxury_prone),
        ("budget_prone", &styles.budget_prone),
    ] {
        if let Some(g) = set.iter().find(|g| !groups.contains(g.as_str())) {
            return Err(TrendError::InvalidCatalog(format!(
                "{set_name} names unknown group '{g}'"
            )));
        }
    }
    for (set_name, set) in [
        ("luxury_tier", &styles.luxury_tier),
        ("budget_tier", &styles.budget_tier),
    ] {
        if let Some(b) = set
            .iter()
            .find(|b| !data.price_buckets.iter().any(|p| &p.label == *b))
        {
            return Err(TrendError::InvalidCatalog(format!(
                "{set_name} names unknown price bucket '{b}'"
            )));
        }
    }
    Ok(())
}

fn warn_orphan_profiles(
    data: &ReferenceData,
    cities: &HashMap<String, usize>,
    colors: &HashMap<String, usize>,
) {
    for (city, profile) in data.profiles.iter() {
        if !cities.contains_key(city) {
            warn!(city = %city, "bias profile for a city that is not in the catalog");
        }
        for color in profile.colors.keys() {
            if !colors.contains_key(color) {
                warn!(city = %city, color = %color, "bias profile names an unknown color");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_reference;

    #[test]
    fn builtin_catalog_validates() {
        let catalog = Catalog::new(builtin_reference()).unwrap();
        assert_eq!(catalog.data().cities.len(), 10);
        assert_eq!(catalog.groups().len(), 6);
        assert!(catalog.reference_max_market_bn() > 0.0);
        let largest = catalog
            .data()
            .cities
            .iter()
            .map(|c| c.market_bn)
            .fold(0.0, f64::max);
        assert_eq!(catalog.reference_max_market_bn(), largest);
    }

    #[test]
    fn unknown_ids_are_invalid_arguments() {
        let catalog = Catalog::new(builtin_reference()).unwrap();
        assert!(matches!(catalog.city("Atlantis"), Err(TrendError::InvalidArgument(_))));
        assert!(matches!(catalog.subcategory("toga"), Err(TrendError::InvalidArgument(_))));
        assert!(matches!(catalog.price_bucket("free"), Err(TrendError::InvalidArgument(_))));
        assert!(matches!(catalog.color("Octarine"), Err(TrendError::InvalidArgument(_))));
        assert!(catalog.subcategories_in("Space Suits").is_err());
        assert!(catalog.colors_in("Ultraviolets").is_err());
    }

    #[test]
    fn unclassified_group_is_rejected() {
        let mut data = builtin_reference();
        data.subcategories.push(SubCategory {
            name: "swimsuit".into(),
            group: "Swimwear".into(),
            search_phrase: "swimsuit India".into(),
        });
        let err = Catalog::new(data).unwrap_err();
        assert!(matches!(err, TrendError::InvalidCatalog(msg) if msg.contains("Swimwear")));
    }

    #[test]
    fn overlapping_buckets_are_rejected() {
        let mut data = builtin_reference();
        let first = data.price_buckets[0].clone();
        data.price_buckets.push(PriceBucket {
            label: "overlap".into(),
            low: first.low,
            high: first.high,
            midpoint: first.midpoint,
        });
        assert!(matches!(Catalog::new(data), Err(TrendError::InvalidCatalog(_))));
    }

    #[test]
    fn duplicate_city_is_rejected() {
        let mut data = builtin_reference();
        let dup = data.cities[0].clone();
        data.cities.push(dup);
        assert!(matches!(Catalog::new(data), Err(TrendError::InvalidCatalog(_))));
    }

    #[test]
    fn tier_sets_must_name_known_buckets() {
        let mut data = builtin_reference();
        data.styles.luxury_tier.insert("Couture".into());
        assert!(matches!(Catalog::new(data), Err(TrendError::InvalidCatalog(_))));
    }

    #[test]
    fn group_and_family_expansion() {
        let catalog = Catalog::new(builtin_reference()).unwrap();
        let ethnic = catalog.subcategories_in("Ethnic Wear").unwrap();
        assert!(ethnic.iter().all(|s| s.group == "Ethnic Wear"));
        assert!(ethnic.iter().any(|s| s.name == "Saree"));
        let metallics = catalog.colors_in("Metallics").unwrap();
        assert!(metallics.iter().any(|c| c.name == "Gold"));
    }
}
