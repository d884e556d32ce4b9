use std::sync::Arc;

use crate::batch::{Evaluator, Selection};
use crate::error::TrendResult;
use crate::ranking::rank;
use crate::reference::{Catalog, ReferenceData};
use crate::scoring::{ScoredCombination, Scorer};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBatch {
    pub ranked: Vec<ScoredCombination>,
    pub all: Vec<ScoredCombination>,
}

#[derive(Debug, Clone)]
pub struct TrendEngine {
    evaluator: Evaluator,
}

impl TrendEngine {
    pub fn new(reference: ReferenceData) -> TrendResult<Self> {
        let catalog = Arc::new(Catalog::new(reference)?);
        Ok(Self {
            evaluator: Evaluator::new(Scorer::new(catalog)),
        })
    }

    pub fn parallel(self, parallel: bool) -> Self {
        Self {
            evaluator: self.evaluator.parallel(parallel),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.evaluator.scorer().catalog()
    }

    pub fn score(
        &self,
        city: &str,
        subcategory: &str,
        price_bucket: &str,
        color: &str,
    ) -> TrendResult<ScoredCombination> {
        self.evaluator
            .scorer()
            .score(city, subcategory, price_bucket, color)
    }

    pub fn evaluate(&self, selection: &Selection) -> TrendResult<Vec<ScoredCombination>> {
        self.evaluator.evaluate(selection)
    }

    pub fn evaluate_and_rank(
        &self,
        selection: &Selection,
        min_velocity: i32,
        top_n: usize,
    ) -> TrendResult<RankedBatch> {
        let all = self.evaluate(selection)?;
        let ranked = rank(&all, min_velocity, top_n);
        Ok(RankedBatch { ranked, all })
    }
}
