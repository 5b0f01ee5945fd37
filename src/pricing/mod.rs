pub mod calculator;
pub mod catalog;
pub mod models;
pub mod tables;

pub use calculator::{validate_tokens, validate_volume, CostCalculator};
pub use catalog::{framework_catalog, model_catalog, FrameworkInfo, ModelInfo};
pub use models::{
    CostBreakdown, DevelopmentProfile, Framework, FrameworkProfile, MigrationSavings,
    ModelPricing, ModelProvider, RiskScenario,
};
pub use tables::{CostTier, PricingTables, RoiAssumptions};
