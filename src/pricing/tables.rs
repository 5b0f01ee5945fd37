//! Pricing and ROI constants.
//!
//! Every number the calculators use lives here. The defaults are the 2025
//! pricing tables; a `[pricing]` or `[roi]` section in the configuration file
//! replaces any table wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CalcError;
use crate::pricing::models::{
    DevelopmentProfile, Framework, FrameworkProfile, ModelPricing, ModelProvider, RiskScenario,
};

/// A volume bracket: `base + (volume - offset) * per_request` while `volume < up_to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTier {
    /// Exclusive upper bound; `None` means unbounded
    #[serde(default)]
    pub up_to: Option<u64>,
    pub base: f64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub per_request: f64,
}

impl CostTier {
    pub const fn flat(up_to: Option<u64>, base: f64) -> Self {
        Self {
            up_to,
            base,
            offset: 0,
            per_request: 0.0,
        }
    }

    pub const fn scaled(up_to: Option<u64>, base: f64, offset: u64, per_request: f64) -> Self {
        Self {
            up_to,
            base,
            offset,
            per_request,
        }
    }

    pub fn covers(&self, volume: u64) -> bool {
        self.up_to.map_or(true, |limit| volume < limit)
    }

    pub fn cost(&self, volume: u64) -> f64 {
        self.base + volume.saturating_sub(self.offset) as f64 * self.per_request
    }
}

/// Pick the first tier covering `volume` and price it
pub fn tier_cost(tiers: &[CostTier], volume: u64, kind: &str) -> Result<f64, CalcError> {
    tiers
        .iter()
        .find(|tier| tier.covers(volume))
        .map(|tier| tier.cost(volume))
        .ok_or_else(|| {
            CalcError::missing(format!(
                "no {} cost tier covers {} requests/month",
                kind, volume
            ))
        })
}

/// Check tiers are in ascending order with only the last one unbounded
pub fn validate_tiers(tiers: &[CostTier], kind: &str) -> Result<(), CalcError> {
    if tiers.is_empty() {
        return Err(CalcError::missing(format!("no {} cost tiers configured", kind)));
    }

    let mut previous: Option<u64> = None;
    for (idx, tier) in tiers.iter().enumerate() {
        non_negative(tier.base, || format!("{} tier {} base cost", kind, idx))?;
        non_negative(tier.per_request, || format!("{} tier {} per-request cost", kind, idx))?;
        match (tier.up_to, previous) {
            (None, _) if idx + 1 != tiers.len() => {
                return Err(CalcError::invalid(format!(
                    "{} tier {} is unbounded but is not the last tier",
                    kind, idx
                )));
            }
            (Some(limit), Some(prev)) if limit <= prev => {
                return Err(CalcError::invalid(format!(
                    "{} tiers must be in ascending order (tier {} ends at {} after {})",
                    kind, idx, limit, prev
                )));
            }
            _ => {}
        }
        previous = tier.up_to;
    }

    Ok(())
}

/// Reject NaN, infinities and negative numbers
fn non_negative(value: f64, what: impl FnOnce() -> String) -> Result<(), CalcError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid(format!(
            "{} must be a finite non-negative number, got {}",
            what(),
            value
        )))
    }
}

fn positive(value: f64, what: impl FnOnce() -> String) -> Result<(), CalcError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid(format!(
            "{} must be a finite positive number, got {}",
            what(),
            value
        )))
    }
}

/// Token prices, framework profiles and volume tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTables {
    /// Share of tokens billed at the input rate when blending prices
    pub input_token_share: f64,
    pub models: BTreeMap<ModelProvider, ModelPricing>,
    pub frameworks: BTreeMap<Framework, FrameworkProfile>,
    pub infrastructure_tiers: Vec<CostTier>,
    pub monitoring_tiers: Vec<CostTier>,
}

impl Default for PricingTables {
    fn default() -> Self {
        let models = BTreeMap::from([
            (ModelProvider::OpenAiGpt4o, ModelPricing::new(5.00, 20.00)),
            (ModelProvider::OpenAiGpt4oMini, ModelPricing::new(0.15, 0.60)),
            (ModelProvider::Claude35Sonnet, ModelPricing::new(3.00, 15.00)),
            (ModelProvider::LocalLlm, ModelPricing::new(0.05, 0.05)),
        ]);

        let frameworks = BTreeMap::from([
            (
                Framework::SemanticKernel,
                framework_profile(1180, 620, 0.96, 1.04, "Enterprise integration"),
            ),
            (
                Framework::AutoGen,
                framework_profile(1320, 780, 0.93, 1.12, "Research & development"),
            ),
            (
                Framework::CrewAi,
                framework_profile(1450, 850, 0.90, 1.15, "Multi-agent systems"),
            ),
            (
                Framework::LangChain,
                framework_profile(1580, 950, 0.87, 1.16, "Flexible applications"),
            ),
            (
                Framework::LangGraph,
                framework_profile(1680, 1080, 0.84, 1.20, "Stateful workflows"),
            ),
        ]);

        Self {
            input_token_share: 0.6,
            models,
            frameworks,
            infrastructure_tiers: vec![
                CostTier::flat(Some(1_000), 35.0),
                CostTier::scaled(Some(10_000), 85.0, 1_000, 0.01),
                CostTier::scaled(Some(100_000), 320.0, 10_000, 0.005),
                CostTier::scaled(None, 850.0, 100_000, 0.002),
            ],
            monitoring_tiers: vec![
                CostTier::flat(Some(1_000), 15.0),
                CostTier::flat(Some(10_000), 45.0),
                CostTier::flat(Some(100_000), 125.0),
                CostTier::flat(None, 250.0),
            ],
        }
    }
}

fn framework_profile(
    input_tokens: u64,
    output_tokens: u64,
    efficiency_score: f64,
    overhead_multiplier: f64,
    description: &str,
) -> FrameworkProfile {
    FrameworkProfile {
        input_tokens,
        output_tokens,
        efficiency_score,
        overhead_multiplier,
        description: description.to_string(),
    }
}

impl PricingTables {
    pub fn model(&self, model: ModelProvider) -> Result<&ModelPricing, CalcError> {
        self.models
            .get(&model)
            .ok_or_else(|| CalcError::missing(format!("no pricing for model {}", model)))
    }

    pub fn framework(&self, framework: Framework) -> Result<&FrameworkProfile, CalcError> {
        self.frameworks
            .get(&framework)
            .ok_or_else(|| CalcError::missing(format!("no profile for framework {}", framework)))
    }

    pub fn infrastructure_cost(&self, volume: u64) -> Result<f64, CalcError> {
        tier_cost(&self.infrastructure_tiers, volume, "infrastructure")
    }

    pub fn monitoring_cost(&self, volume: u64) -> Result<f64, CalcError> {
        tier_cost(&self.monitoring_tiers, volume, "monitoring")
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if !(0.0..=1.0).contains(&self.input_token_share) {
            return Err(CalcError::invalid(format!(
                "input_token_share must be within 0..=1, got {}",
                self.input_token_share
            )));
        }
        for (model, pricing) in &self.models {
            non_negative(pricing.input_cost, || format!("model {} input price", model))?;
            non_negative(pricing.output_cost, || format!("model {} output price", model))?;
        }
        for (framework, profile) in &self.frameworks {
            positive(profile.overhead_multiplier, || {
                format!("framework {} overhead multiplier", framework)
            })?;
            non_negative(profile.efficiency_score, || {
                format!("framework {} efficiency score", framework)
            })?;
        }
        validate_tiers(&self.infrastructure_tiers, "infrastructure")?;
        validate_tiers(&self.monitoring_tiers, "monitoring")?;
        Ok(())
    }
}

/// Development cost and discounting assumptions for migration analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiAssumptions {
    /// Annual rate; converted to a monthly rate for NPV
    pub discount_rate: f64,
    pub default_horizon_months: u32,
    pub default_team_size: u32,
    pub default_timeline_months: u32,
    pub default_complexity_factor: f64,
    pub development: BTreeMap<Framework, DevelopmentProfile>,
    pub risk_factors: BTreeMap<RiskScenario, f64>,
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        let development = BTreeMap::from([
            (
                Framework::SemanticKernel,
                development_profile(
                    25_000.0,
                    0.8,
                    "Lower complexity due to enterprise tooling and documentation",
                ),
            ),
            (
                Framework::AutoGen,
                development_profile(35_000.0, 1.1, "Medium complexity, advanced multi-agent features"),
            ),
            (
                Framework::CrewAi,
                development_profile(30_000.0, 1.0, "Balanced complexity and capabilities"),
            ),
            (
                Framework::LangChain,
                development_profile(
                    40_000.0,
                    1.3,
                    "Higher complexity due to extensive customization needs",
                ),
            ),
            (
                Framework::LangGraph,
                development_profile(
                    45_000.0,
                    1.4,
                    "Highest complexity due to stateful workflow management",
                ),
            ),
        ]);

        let risk_factors = BTreeMap::from([
            (RiskScenario::Startup, 1.3),
            (RiskScenario::Growth, 1.1),
            (RiskScenario::Enterprise, 0.9),
            (RiskScenario::Research, 1.2),
        ]);

        Self {
            discount_rate: 0.10,
            default_horizon_months: 36,
            default_team_size: 5,
            default_timeline_months: 6,
            default_complexity_factor: 1.0,
            development,
            risk_factors,
        }
    }
}

fn development_profile(base_cost: f64, complexity_multiplier: f64, description: &str) -> DevelopmentProfile {
    DevelopmentProfile {
        base_cost,
        complexity_multiplier,
        description: description.to_string(),
    }
}

impl RoiAssumptions {
    pub fn development(&self, framework: Framework) -> Result<&DevelopmentProfile, CalcError> {
        self.development.get(&framework).ok_or_else(|| {
            CalcError::missing(format!("no development cost profile for framework {}", framework))
        })
    }

    pub fn risk_factor(&self, scenario: RiskScenario) -> Result<f64, CalcError> {
        self.risk_factors
            .get(&scenario)
            .copied()
            .ok_or_else(|| CalcError::missing(format!("no risk factor for scenario {}", scenario)))
    }

    /// Monthly rate equivalent to the annual discount rate
    pub fn monthly_discount_rate(&self) -> f64 {
        (1.0 + self.discount_rate).powf(1.0 / 12.0) - 1.0
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if !(0.0..1.0).contains(&self.discount_rate) {
            return Err(CalcError::invalid(format!(
                "discount_rate must be within 0..1, got {}",
                self.discount_rate
            )));
        }
        if self.default_horizon_months == 0 {
            return Err(CalcError::invalid("default_horizon_months must be at least 1"));
        }
        if self.default_team_size == 0 {
            return Err(CalcError::invalid("default_team_size must be at least 1"));
        }
        if self.default_timeline_months == 0 {
            return Err(CalcError::invalid("default_timeline_months must be at least 1"));
        }
        positive(self.default_complexity_factor, || "default_complexity_factor".to_string())?;
        for (framework, profile) in &self.development {
            non_negative(profile.base_cost, || {
                format!("framework {} development base cost", framework)
            })?;
            positive(profile.complexity_multiplier, || {
                format!("framework {} complexity multiplier", framework)
            })?;
        }
        for (scenario, factor) in &self.risk_factors {
            positive(*factor, || format!("risk factor for {}", scenario))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_cover_every_enum() {
        let tables = PricingTables::default();
        for model in ModelProvider::ALL {
            assert!(tables.model(model).is_ok());
        }
        for framework in Framework::ALL {
            assert!(tables.framework(framework).is_ok());
        }

        let roi = RoiAssumptions::default();
        for framework in Framework::ALL {
            assert!(roi.development(framework).is_ok());
        }
        for scenario in RiskScenario::ALL {
            assert!(roi.risk_factor(scenario).is_ok());
        }
    }

    #[test]
    fn test_infrastructure_tiers() {
        let tables = PricingTables::default();
        assert_eq!(tables.infrastructure_cost(0).unwrap(), 35.0);
        assert_eq!(tables.infrastructure_cost(999).unwrap(), 35.0);
        assert_eq!(tables.infrastructure_cost(1_000).unwrap(), 85.0);
        assert!((tables.infrastructure_cost(5_000).unwrap() - 125.0).abs() < 1e-9);
        assert_eq!(tables.infrastructure_cost(10_000).unwrap(), 320.0);
        assert!((tables.infrastructure_cost(50_000).unwrap() - 520.0).abs() < 1e-9);
        assert_eq!(tables.infrastructure_cost(100_000).unwrap(), 850.0);
        assert!((tables.infrastructure_cost(200_000).unwrap() - 1_050.0).abs() < 1e-9);
    }

    #[test]
    fn test_monitoring_tiers() {
        let tables = PricingTables::default();
        assert_eq!(tables.monitoring_cost(500).unwrap(), 15.0);
        assert_eq!(tables.monitoring_cost(1_000).unwrap(), 45.0);
        assert_eq!(tables.monitoring_cost(99_999).unwrap(), 125.0);
        assert_eq!(tables.monitoring_cost(1_000_000).unwrap(), 250.0);
    }

    #[test]
    fn test_uncovered_volume_is_configuration_missing() {
        let tiers = vec![CostTier::flat(Some(1_000), 10.0)];
        let err = tier_cost(&tiers, 5_000, "monitoring").unwrap_err();
        assert!(matches!(err, CalcError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_validate_tiers_rejects_unordered() {
        let tiers = vec![
            CostTier::flat(Some(10_000), 10.0),
            CostTier::flat(Some(1_000), 20.0),
        ];
        assert!(validate_tiers(&tiers, "infrastructure").is_err());

        let tiers = vec![CostTier::flat(None, 10.0), CostTier::flat(Some(1_000), 20.0)];
        assert!(validate_tiers(&tiers, "infrastructure").is_err());

        assert!(validate_tiers(&PricingTables::default().infrastructure_tiers, "infrastructure").is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_pricing() {
        let mut tables = PricingTables::default();
        tables.models.insert(ModelProvider::LocalLlm, ModelPricing::new(f64::NAN, 0.05));
        assert!(matches!(tables.validate(), Err(CalcError::InvalidInput(_))));

        let mut tables = PricingTables::default();
        tables.models.insert(ModelProvider::LocalLlm, ModelPricing::new(0.05, f64::INFINITY));
        assert!(tables.validate().is_err());

        let mut tables = PricingTables::default();
        if let Some(profile) = tables.frameworks.get_mut(&Framework::LangGraph) {
            profile.overhead_multiplier = f64::NAN;
        }
        assert!(tables.validate().is_err());

        let mut tables = PricingTables::default();
        tables.input_token_share = f64::NAN;
        assert!(tables.validate().is_err());

        let mut tables = PricingTables::default();
        tables.infrastructure_tiers[1].per_request = f64::INFINITY;
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_assumptions() {
        let mut roi = RoiAssumptions::default();
        if let Some(profile) = roi.development.get_mut(&Framework::AutoGen) {
            profile.base_cost = -35_000.0;
        }
        let err = roi.validate().unwrap_err();
        assert_eq!(
            err,
            CalcError::invalid(
                "framework autogen development base cost must be a finite non-negative number, got -35000"
            )
        );

        let mut roi = RoiAssumptions::default();
        if let Some(profile) = roi.development.get_mut(&Framework::CrewAi) {
            profile.complexity_multiplier = f64::NAN;
        }
        assert!(roi.validate().is_err());

        let mut roi = RoiAssumptions::default();
        roi.risk_factors.insert(RiskScenario::Startup, -1.3);
        assert!(roi.validate().is_err());

        let mut roi = RoiAssumptions::default();
        roi.risk_factors.insert(RiskScenario::Research, f64::INFINITY);
        assert!(roi.validate().is_err());

        let mut roi = RoiAssumptions::default();
        roi.discount_rate = f64::NAN;
        assert!(roi.validate().is_err());

        let mut roi = RoiAssumptions::default();
        roi.default_complexity_factor = f64::NAN;
        assert!(roi.validate().is_err());
    }

    #[test]
    fn test_monthly_discount_rate() {
        let roi = RoiAssumptions::default();
        let monthly = roi.monthly_discount_rate();
        assert!((monthly - 0.007974).abs() < 1e-6);
        assert!(((1.0 + monthly).powi(12) - 1.10).abs() < 1e-12);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(PricingTables::default().validate().is_ok());
        assert!(RoiAssumptions::default().validate().is_ok());
    }

    #[test]
    fn test_tables_deserialize_from_toml() {
        let toml = r#"
            input_token_share = 0.5

            [[monitoring_tiers]]
            up_to = 100
            base = 1.0

            [[monitoring_tiers]]
            base = 2.0
        "#;
        let tables: PricingTables = toml::from_str(toml).unwrap();
        assert_eq!(tables.input_token_share, 0.5);
        assert_eq!(tables.monitoring_tiers.len(), 2);
        assert_eq!(tables.monitoring_cost(150).unwrap(), 2.0);
        // untouched tables keep their defaults
        assert_eq!(tables.models.len(), 4);
    }
}
