//! pricing::export — flat recommendation record for downstream export.
//!
//! The export layer persists one `{product_id, recommended_price, ci_lower,
//! ci_upper}` row per action; this module only produces the record, not
//! the file.
use crate::pricing::optimizer::OptimizationResult;
use serde::{Deserialize, Serialize};

/// One exported recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub product_id: String,
    pub recommended_price: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl RecommendationRecord {
    pub fn from_result(product_id: impl Into<String>, result: &OptimizationResult) -> Self {
        let ci = result.price_interval();
        RecommendationRecord {
            product_id: product_id.into(),
            recommended_price: result.best_price(),
            ci_lower: ci.lower(),
            ci_upper: ci.upper(),
        }
    }
}
