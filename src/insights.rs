use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::profiles::StyleRules;
use crate::scoring::ScoredCombination;

const HOT_ABOVE: f64 = 65.0;
const RISING_ABOVE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Heat {
    Hot,
    Rising,
    Cool,
}

impl Heat {
    pub fn for_score(score: f64) -> Self {
        if score > HOT_ABOVE {
            Heat::Hot
        } else if score > RISING_ABOVE {
            Heat::Rising
        } else {
            Heat::Cool
        }
    }
}

impl fmt::Display for Heat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heat::Hot => "hot",
            Heat::Rising => "rising",
            Heat::Cool => "cool",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    City,
    Group,
    Subcategory,
    PriceBucket,
    Color,
}

impl Dimension {
    pub fn key<'a>(&self, r: &'a ScoredCombination) -> &'a str {
        match self {
            Dimension::City => &r.city,
            Dimension::Group => &r.group,
            Dimension::Subcategory => &r.subcategory,
            Dimension::PriceBucket => &r.price_bucket,
            Dimension::Color => &r.color,
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "city" => Ok(Dimension::City),
            "group" => Ok(Dimension::Group),
            "subcategory" => Ok(Dimension::Subcategory),
            "price" | "pricebucket" => Ok(Dimension::PriceBucket),
            "color" | "colour" => Ok(Dimension::Color),
            other => Err(format!(
                "unknown dimension '{other}' (expected city, group, subcategory, price or color)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leader {
    pub label: String,
    pub score: f64,
    pub heat: Heat,
}

impl Leader {
    fn new(label: &str, score: f64) -> Self {
        let score = round1(score);
        Self {
            label: label.to_string(),
            score,
            heat: Heat::for_score(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub top_city: Leader,
    pub top_group: Leader,
    pub weakest_group: Leader,
    pub top_price_bucket: Leader,
    pub top_color: Leader,
    pub top_color_hex: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    Geography,
    Category,
    Price,
    Color,
    Momentum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

fn mean_by<'a, K, V>(records: &'a [ScoredCombination], key: K, value: V) -> Vec<(&'a str, f64)>
where
    K: Fn(&'a ScoredCombination) -> &'a str,
    V: Fn(&ScoredCombination) -> f64,
{
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for r in records {
        let k = key(r);
        let entry = sums.entry(k).or_insert_with(|| {
            order.push(k);
            (0.0, 0)
        });
        entry.0 += value(r);
        entry.1 += 1;
    }
    order
        .into_iter()
        .map(|k| {
            let (sum, n) = sums[k];
            (k, sum / n as f64)
        })
        .collect()
}

/// Highest mean; the first key wins ties.
fn best(means: &[(&str, f64)]) -> Option<(String, f64)> {
    means
        .iter()
        .fold(None::<&(&str, f64)>, |acc, m| match acc {
            Some(a) if a.1 >= m.1 => Some(a),
            _ => Some(m),
        })
        .map(|(k, v)| (k.to_string(), *v))
}

fn worst(means: &[(&str, f64)]) -> Option<(String, f64)> {
    means
        .iter()
        .fold(None::<&(&str, f64)>, |acc, m| match acc {
            Some(a) if a.1 <= m.1 => Some(a),
            _ => Some(m),
        })
        .map(|(k, v)| (k.to_string(), *v))
}

pub fn summarize(all: &[ScoredCombination]) -> Option<Summary> {
    let norm = |r: &ScoredCombination| r.score_norm.unwrap_or(r.composite);
    let cities = mean_by(all, |r| r.city.as_str(), norm);
    let groups = mean_by(all, |r| r.group.as_str(), |r| r.cat_score as f64);
    let buckets = mean_by(all, |r| r.price_bucket.as_str(), |r| r.price_score as f64);
    let colors = mean_by(all, |r| r.color.as_str(), |r| r.color_score as f64);

    let (city, city_score) = best(&cities)?;
    let (top_group, top_group_score) = best(&groups)?;
    let (weak_group, weak_group_score) = worst(&groups)?;
    let (bucket, bucket_score) = best(&buckets)?;
    let (color, color_score) = best(&colors)?;
    let top_color_hex = all
        .iter()
        .find(|r| r.color == color)
        .map(|r| r.color_hex.clone())
        .unwrap_or_default();

    Some(Summary {
        top_city: Leader::new(&city, city_score),
        top_group: Leader::new(&top_group, top_group_score),
        weakest_group: Leader::new(&weak_group, weak_group_score),
        top_price_bucket: Leader::new(&bucket, bucket_score),
        top_color: Leader::new(&color, color_score),
        top_color_hex,
    })
}

fn leading_cities_for_tier(
    all: &[ScoredCombination],
    tier: &BTreeSet<String>,
    n: usize,
) -> Vec<String> {
    let in_tier: Vec<ScoredCombination> = all
        .iter()
        .filter(|r| tier.contains(&r.price_bucket))
        .cloned()
        .collect();
    let mut means = mean_by(&in_tier, |r| r.city.as_str(), |r| r.price_score as f64);
    // Stable: equal means keep first-seen order.
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means.into_iter().take(n).map(|(c, _)| c.to_string()).collect()
}

pub fn insights(all: &[ScoredCombination], rules: &StyleRules) -> Vec<Insight> {
    let mut out = Vec::new();
    let Some(summary) = summarize(all) else {
        return out;
    };

    out.push(Insight {
        kind: InsightKind::Geography,
        text: format!(
            "{} leads all fashion interest; consider targeting it first.",
            summary.top_city.label
        ),
    });

    if summary.top_group.label != summary.weakest_group.label {
        let gap = (summary.top_group.score - summary.weakest_group.score).round() as i64;
        out.push(Insight {
            kind: InsightKind::Category,
            text: format!(
                "{} outperforms {} by {} pts across the selected cities.",
                summary.top_group.label, summary.weakest_group.label, gap
            ),
        });
    }

    let budget = leading_cities_for_tier(all, &rules.budget_tier, 2);
    if !budget.is_empty() {
        out.push(Insight {
            kind: InsightKind::Price,
            text: format!(
                "Budget segment strongest in {}: high-volume, low-ASP opportunity.",
                budget.join(", ")
            ),
        });
    }
    let luxury = leading_cities_for_tier(all, &rules.luxury_tier, 2);
    if !luxury.is_empty() {
        out.push(Insight {
            kind: InsightKind::Price,
            text: format!(
                "Luxury tier peaks in {}: premium positioning viable here.",
                luxury.join(", ")
            ),
        });
    }

    out.push(Insight {
        kind: InsightKind::Color,
        text: format!(
            "{} leads colour searches; work it into seasonal product drops.",
            summary.top_color.label
        ),
    });

    let rising = all.iter().filter(|r| r.velocity > 0).count();
    let pct = rising as f64 / all.len() as f64 * 100.0;
    out.push(Insight {
        kind: InsightKind::Momentum,
        text: format!(
            "{pct:.0}% of combinations are accelerating versus four weeks ago."
        ),
    });

    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// `cells[row][col]`; `None` where the pair never occurs.
    pub cells: Vec<Vec<Option<f64>>>,
}

pub fn heatmap(all: &[ScoredCombination], rows: Dimension, cols: Dimension) -> Heatmap {
    let mut row_ids: Vec<String> = Vec::new();
    let mut col_ids: Vec<String> = Vec::new();
    let mut sums: HashMap<(usize, usize), (f64, usize)> = HashMap::new();
    for r in all {
        let ri = position_or_push(&mut row_ids, rows.key(r));
        let ci = position_or_push(&mut col_ids, cols.key(r));
        let entry = sums.entry((ri, ci)).or_insert((0.0, 0));
        entry.0 += r.score_norm.unwrap_or(r.composite);
        entry.1 += 1;
    }
    let cells = (0..row_ids.len())
        .map(|ri| {
            (0..col_ids.len())
                .map(|ci| sums.get(&(ri, ci)).map(|(s, n)| round1(s / *n as f64)))
                .collect()
        })
        .collect();
    Heatmap {
        rows: row_ids,
        cols: col_ids,
        cells,
    }
}

fn position_or_push(ids: &mut Vec<String>, id: &str) -> usize {
    match ids.iter().position(|x| x == id) {
        Some(i) => i,
        None => {
            ids.push(id.to_string());
            ids.len() - 1
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
