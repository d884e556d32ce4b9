pub mod batch;
pub mod builtin;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod insights;
pub mod profiles;
pub mod ranking;
pub mod reference;
pub mod rng;
pub mod scoring;

pub use batch::{DEGENERATE_SCORE_NORM, Evaluator, Selection};
pub use engine::{RankedBatch, TrendEngine};
pub use error::{TrendError, TrendResult};
pub use ranking::rank;
pub use reference::{Catalog, City, Color, PriceBucket, ReferenceData, SubCategory};
pub use scoring::{ScoredCombination, Scorer};
