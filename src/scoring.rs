use serde::Serialize;
use std::sync::Arc;

use crate::error::TrendResult;
use crate::reference::Catalog;
use crate::rng::KeyedRng;

pub const GEO_WEIGHT: f64 = 0.20;
pub const CATEGORY_WEIGHT: f64 = 0.35;
pub const PRICE_WEIGHT: f64 = 0.25;
pub const COLOR_WEIGHT: f64 = 0.20;

const SUB_SCORE_JITTER: f64 = 6.0;
const GEO_JITTER: f64 = 8.0;
const GEO_BASE: f64 = 70.0;
const COMPOSITE_JITTER: f64 = 3.0;

const VELOCITY_TAG: &str = "velocity";
const VELOCITY_MEAN: f64 = 8.0;
const VELOCITY_STD: f64 = 22.0;
pub const VELOCITY_MIN: i32 = -35;
pub const VELOCITY_MAX: i32 = 65;

pub const SCORE_MIN: f64 = 5.0;
pub const GEO_MIN: f64 = 10.0;
pub const SCORE_MAX: f64 = 100.0;

/// `score_norm` is `None` until the record has been through a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCombination {
    pub city: String,
    pub subcategory: String,
    pub group: String,
    pub price_bucket: String,
    pub color: String,
    pub color_hex: String,
    pub geo_score: i32,
    pub cat_score: i32,
    pub price_score: i32,
    pub color_score: i32,
    pub composite: f64,
    pub velocity: i32,
    pub score_norm: Option<f64>,
}

impl ScoredCombination {
    pub fn with_score_norm(self, score_norm: f64) -> Self {
        Self {
            score_norm: Some(score_norm),
            ..self
        }
    }

    pub fn rank_key(&self) -> f64 {
        self.score_norm.unwrap_or(f64::NEG_INFINITY)
    }
}

#[derive(Debug, Clone)]
pub struct Scorer {
    catalog: Arc<Catalog>,
}

impl Scorer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn score(
        &self,
        city: &str,
        subcategory: &str,
        price_bucket: &str,
        color: &str,
    ) -> TrendResult<ScoredCombination> {
        let catalog = &*self.catalog;
        let city_row = catalog.city(city)?;
        let sub = catalog.subcategory(subcategory)?;
        let bucket = catalog.price_bucket(price_bucket)?;
        let color_row = catalog.color(color)?;

        let group = sub.group.as_str();
        let profile = catalog.profile(city);
        let styles = catalog.styles();

        let keys = [city, subcategory, price_bucket, color];
        let mut rng = KeyedRng::from_keys(&keys)?;

        // Draw order is part of the output contract: category, price, color, geo, composite.
        let cat_base = rng.uniform_int(30, 72) as f64 * styles.style_multiplier(group, profile);
        let cat_score = clamp_score(cat_base + rng.gaussian(0.0, SUB_SCORE_JITTER), SCORE_MIN);

        let price_base = rng.uniform_int(25, 70) as f64
            * styles.price_multiplier(&bucket.label, group, profile);
        let price_score = clamp_score(price_base + rng.gaussian(0.0, SUB_SCORE_JITTER), SCORE_MIN);

        let color_base = rng.uniform_int(20, 72) as f64 * profile.color_multiplier(&color_row.name);
        let color_score = clamp_score(color_base + rng.gaussian(0.0, SUB_SCORE_JITTER), SCORE_MIN);

        let market_weight = city_row.market_bn / catalog.reference_max_market_bn();
        let geo_score = clamp_score(
            GEO_BASE * market_weight + rng.gaussian(0.0, GEO_JITTER),
            GEO_MIN,
        );

        let pairs = [
            (geo_score as f64, GEO_WEIGHT),
            (cat_score as f64, CATEGORY_WEIGHT),
            (price_score as f64, PRICE_WEIGHT),
            (color_score as f64, COLOR_WEIGHT),
        ];
        let composite = (weighted_sum(&pairs) + rng.gaussian(0.0, COMPOSITE_JITTER))
            .clamp(SCORE_MIN, SCORE_MAX);

        let velocity = velocity_for(&keys)?;

        Ok(ScoredCombination {
            city: city_row.name.clone(),
            subcategory: sub.name.clone(),
            group: sub.group.clone(),
            price_bucket: bucket.label.clone(),
            color: color_row.name.clone(),
            color_hex: color_row.hex.clone(),
            geo_score,
            cat_score,
            price_score,
            color_score,
            composite,
            velocity,
            score_norm: None,
        })
    }
}

/// Seeded from the combination keys plus a tag, so it shares no draws with
/// the sub-scores.
pub fn velocity_for(keys: &[&str; 4]) -> TrendResult<i32> {
    let tagged = [keys[0], keys[1], keys[2], keys[3], VELOCITY_TAG];
    let mut rng = KeyedRng::from_keys(&tagged)?;
    let v = rng
        .gaussian(VELOCITY_MEAN, VELOCITY_STD)
        .clamp(VELOCITY_MIN as f64, VELOCITY_MAX as f64);
    Ok(v as i32)
}

fn clamp_score(raw: f64, min: f64) -> i32 {
    raw.clamp(min, SCORE_MAX) as i32
}

fn weighted_sum(pairs: &[(f64, f64)]) -> f64 {
    pairs.iter().map(|(s, w)| s * w).sum()
}
