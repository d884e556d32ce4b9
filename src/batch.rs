use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{TrendError, TrendResult};
use crate::scoring::{ScoredCombination, Scorer};

/// `score_norm` given to every record when the batch has no spread.
pub const DEGENERATE_SCORE_NORM: f64 = 50.0;

/// The four dimension sets to cross. Sets are ordered, which fixes the
/// enumeration order: city, then sub-category, then price bucket, then color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cities: BTreeSet<String>,
    pub subcategories: BTreeSet<String>,
    pub price_buckets: BTreeSet<String>,
    pub colors: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, S>(cities: I, subcategories: I, price_buckets: I, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            subcategories: subcategories.into_iter().map(Into::into).collect(),
            price_buckets: price_buckets.into_iter().map(Into::into).collect(),
            colors: colors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn combination_count(&self) -> usize {
        [
            self.cities.len(),
            self.subcategories.len(),
            self.price_buckets.len(),
            self.colors.len(),
        ]
        .into_iter()
        .fold(1usize, |acc, n| acc.saturating_mul(n))
    }

    pub fn ensure_within(&self, cap: usize) -> TrendResult<()> {
        let count = self.combination_count();
        if count > cap {
            return Err(TrendError::InvalidArgument(format!(
                "selection expands to {count} combinations, above the limit of {cap}; narrow a dimension"
            )));
        }
        Ok(())
    }

    fn ensure_non_empty(&self) -> TrendResult<()> {
        for (name, set) in [
            ("cities", &self.cities),
            ("sub-categories", &self.subcategories),
            ("price buckets", &self.price_buckets),
            ("colors", &self.colors),
        ] {
            if set.is_empty() {
                return Err(TrendError::InvalidArgument(format!(
                    "no {name} selected; nothing to evaluate"
                )));
            }
        }
        Ok(())
    }

    fn combinations(&self) -> Vec<[&str; 4]> {
        let mut out = Vec::with_capacity(self.combination_count());
        for city in &self.cities {
            for sub in &self.subcategories {
                for bucket in &self.price_buckets {
                    for color in &self.colors {
                        out.push([city.as_str(), sub.as_str(), bucket.as_str(), color.as_str()]);
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    scorer: Scorer,
    parallel: bool,
}

impl Evaluator {
    pub fn new(scorer: Scorer) -> Self {
        Self {
            scorer,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Performs no capping; see [`Selection::ensure_within`].
    pub fn evaluate(&self, selection: &Selection) -> TrendResult<Vec<ScoredCombination>> {
        selection.ensure_non_empty()?;
        let combos = selection.combinations();
        debug!(
            combinations = combos.len(),
            parallel = self.parallel,
            "evaluating selection"
        );

        let score = |[city, sub, bucket, color]: &[&str; 4]| {
            self.scorer.score(city, sub, bucket, color)
        };
        // Both paths collect in enumeration order.
        let scored: Vec<ScoredCombination> = if self.parallel {
            combos.par_iter().map(score).collect::<TrendResult<_>>()?
        } else {
            combos.iter().map(score).collect::<TrendResult<_>>()?
        };

        Ok(normalize(scored))
    }
}

pub fn normalize(scored: Vec<ScoredCombination>) -> Vec<ScoredCombination> {
    let (min, max) = scored
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.composite), hi.max(r.composite))
        });
    debug!(min, max, records = scored.len(), "normalizing composite scores");

    let spread = max - min;
    scored
        .into_iter()
        .map(|r| {
            let norm = if spread > 0.0 {
                round1((r.composite - min) / spread * 100.0)
            } else {
                DEGENERATE_SCORE_NORM
            };
            r.with_score_norm(norm)
        })
        .collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_reference;
    use crate::reference::Catalog;
    use std::sync::Arc;

    fn evaluator() -> Evaluator {
        Evaluator::new(Scorer::new(Arc::new(Catalog::new(builtin_reference()).unwrap())))
    }

    fn selection() -> Selection {
        Selection::new(
            vec!["Mumbai", "Delhi", "Jaipur"],
            vec!["Saree", "Jeans", "Cargo Pants"],
            vec!["Under ₹500", "₹10,000+"],
            vec!["Black", "Gold"],
        )
    }

    #[test]
    fn cartesian_product_is_complete() {
        let sel = Selection::new(
            vec!["Mumbai", "Delhi"],
            vec!["Saree", "Jeans"],
            vec!["Under ₹500"],
            vec!["Black"],
        );
        let out = evaluator().evaluate(&sel).unwrap();
        assert_eq!(out.len(), 4);
        let pairs: BTreeSet<(String, String)> = out
            .iter()
            .map(|r| (r.city.clone(), r.subcategory.clone()))
            .collect();
        assert_eq!(pairs.len(), 4);
    }

    #[test]
    fn enumeration_order_is_sorted() {
        let out = evaluator().evaluate(&selection()).unwrap();
        let keys: Vec<_> = out
            .iter()
            .map(|r| {
                (
                    r.city.clone(),
                    r.subcategory.clone(),
                    r.price_bucket.clone(),
                    r.color.clone(),
                )
            })
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(out.len(), 36);
    }

    #[test]
    fn normalization_spans_zero_to_hundred() {
        let out = evaluator().evaluate(&selection()).unwrap();
        let norms: Vec<f64> = out.iter().map(|r| r.score_norm.unwrap()).collect();
        assert!(norms.iter().all(|n| (0.0..=100.0).contains(n)));
        let top = out
            .iter()
            .max_by(|a, b| a.composite.total_cmp(&b.composite))
            .unwrap();
        let bottom = out
            .iter()
            .min_by(|a, b| a.composite.total_cmp(&b.composite))
            .unwrap();
        assert_eq!(top.score_norm, Some(100.0));
        assert_eq!(bottom.score_norm, Some(0.0));
    }

    #[test]
    fn single_record_batch_uses_fallback() {
        let sel = Selection::new(vec!["Pune"], vec!["Khadi"], vec!["Under ₹500"], vec!["Ivory"]);
        let out = evaluator().evaluate(&sel).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].score_norm, Some(DEGENERATE_SCORE_NORM));
    }

    #[test]
    fn equal_composites_use_fallback() {
        let base = evaluator().scorer().score("Pune", "Khadi", "Under ₹500", "Ivory").unwrap();
        let out = normalize(vec![base.clone(), base.clone(), base]);
        assert!(out.iter().all(|r| r.score_norm == Some(DEGENERATE_SCORE_NORM)));
    }

    #[test]
    fn normalization_is_relative_to_the_batch() {
        let ev = evaluator();
        let wide = ev.evaluate(&selection()).unwrap();
        let narrow = ev
            .evaluate(&Selection::new(
                vec!["Mumbai"],
                vec!["Saree", "Jeans"],
                vec!["Under ₹500"],
                vec!["Black"],
            ))
            .unwrap();
        let find = |batch: &[ScoredCombination]| {
            batch
                .iter()
                .find(|r| {
                    r.city == "Mumbai"
                        && r.subcategory == "Saree"
                        && r.price_bucket == "Under ₹500"
                        && r.color == "Black"
                })
                .cloned()
                .unwrap()
        };
        assert_eq!(find(&wide).composite, find(&narrow).composite);
        // Two-record batch: one end is 0, the other 100.
        let narrow_norm = find(&narrow).score_norm.unwrap();
        assert!(narrow_norm == 0.0 || narrow_norm == 100.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let ev = evaluator();
        let seq = ev.evaluate(&selection()).unwrap();
        let par = ev.clone().parallel(true).evaluate(&selection()).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn empty_dimension_is_rejected() {
        let mut sel = selection();
        sel.colors.clear();
        assert!(matches!(
            evaluator().evaluate(&sel),
            Err(TrendError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_identifier_in_selection_is_rejected() {
        let mut sel = selection();
        sel.cities.insert("Atlantis".into());
        assert!(evaluator().evaluate(&sel).is_err());
        assert!(evaluator().parallel(true).evaluate(&sel).is_err());
    }

    #[test]
    fn cap_is_checked_by_caller() {
        let sel = selection();
        assert_eq!(sel.combination_count(), 36);
        assert!(sel.ensure_within(36).is_ok());
        assert!(matches!(sel.ensure_within(35), Err(TrendError::InvalidArgument(_))));
    }
}
