pub mod analyzer;
pub mod sensitivity;

pub use analyzer::{
    calculate_npv, payback_month, CashFlowEntry, MigrationRequest, Recommendation,
    RecommendationLevel, RoiAnalyzer, RoiResult,
};
pub use sensitivity::{SensitivityPoint, SensitivityRange, SensitivityReport};
