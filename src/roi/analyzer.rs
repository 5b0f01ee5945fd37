use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::CalcError;
use crate::pricing::models::{round2, Framework, ModelProvider, RiskScenario};
use crate::pricing::tables::RoiAssumptions;
use crate::pricing::CostCalculator;

/// Longest analysis horizon accepted (50 years)
pub const MAX_HORIZON_MONTHS: u32 = 600;

/// Inputs of a migration analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub from_framework: Framework,
    pub to_framework: Framework,
    pub model: ModelProvider,
    pub requests_per_month: u64,
    pub team_size: u32,
    pub timeline_months: u32,
    pub horizon_months: u32,
    pub complexity_factor: f64,
    pub risk_scenario: RiskScenario,
}

impl MigrationRequest {
    /// Request with every optional parameter taken from the assumptions
    pub fn with_defaults(
        assumptions: &RoiAssumptions,
        from_framework: Framework,
        to_framework: Framework,
        model: ModelProvider,
        requests_per_month: u64,
    ) -> Self {
        Self {
            from_framework,
            to_framework,
            model,
            requests_per_month,
            team_size: assumptions.default_team_size,
            timeline_months: assumptions.default_timeline_months,
            horizon_months: assumptions.default_horizon_months,
            complexity_factor: assumptions.default_complexity_factor,
            risk_scenario: RiskScenario::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        if self.team_size == 0 {
            return Err(CalcError::invalid("team size must be at least 1"));
        }
        if self.timeline_months == 0 {
            return Err(CalcError::invalid("timeline must be at least 1 month"));
        }
        if self.horizon_months == 0 || self.horizon_months > MAX_HORIZON_MONTHS {
            return Err(CalcError::invalid(format!(
                "analysis horizon must be between 1 and {} months, got {}",
                MAX_HORIZON_MONTHS, self.horizon_months
            )));
        }
        if !self.complexity_factor.is_finite() || self.complexity_factor <= 0.0 {
            return Err(CalcError::invalid(format!(
                "complexity factor must be positive, got {}",
                self.complexity_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub from_framework: Framework,
    pub to_framework: Framework,
    pub model: ModelProvider,
    pub requests_per_month: u64,
    pub analysis_period_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub current_monthly_cost: f64,
    pub target_monthly_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub savings_percentage: f64,
    pub development_cost: f64,
    pub risk_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiMetrics {
    pub npv: f64,
    /// First month in which cumulative discounted savings cover the migration
    /// cost; `None` when that never happens within the horizon
    pub payback_period_months: Option<u32>,
    /// Undiscounted cost / monthly savings
    pub simple_payback_months: Option<f64>,
    pub break_even_month: Option<u32>,
    pub roi_percentage: f64,
    pub total_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub month: u32,
    pub description: String,
    pub cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub discounted_cash_flow: f64,
    pub cumulative_discounted_cash_flow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    Positive,
    Neutral,
    Cautionary,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub level: RecommendationLevel,
    pub message: String,
    pub action: String,
}

impl Recommendation {
    fn new(category: &str, level: RecommendationLevel, message: String, action: &str) -> Self {
        Self {
            category: category.to_string(),
            level,
            message,
            action: action.to_string(),
        }
    }
}

/// Outcome of a migration analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub migration_summary: MigrationSummary,
    pub cost_analysis: CostAnalysis,
    pub roi_metrics: RoiMetrics,
    pub cash_flow_projection: Vec<CashFlowEntry>,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: String,
}

/// Financial analysis of framework migrations
#[derive(Debug, Clone)]
pub struct RoiAnalyzer {
    calculator: CostCalculator,
    assumptions: Arc<RoiAssumptions>,
}

impl Default for RoiAnalyzer {
    fn default() -> Self {
        Self::new(CostCalculator::default(), Arc::new(RoiAssumptions::default()))
    }
}

impl RoiAnalyzer {
    pub fn new(calculator: CostCalculator, assumptions: Arc<RoiAssumptions>) -> Self {
        Self {
            calculator,
            assumptions,
        }
    }

    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }

    pub fn assumptions(&self) -> &RoiAssumptions {
        &self.assumptions
    }

    /// One-time cost of building on `framework`, before the risk factor
    pub fn calculate_development_cost(
        &self,
        framework: Framework,
        team_size: u32,
        complexity_factor: f64,
        timeline_months: u32,
    ) -> Result<f64, CalcError> {
        let profile = self.assumptions.development(framework)?;

        let complexity_cost = profile.base_cost * profile.complexity_multiplier * complexity_factor;
        let total = complexity_cost * team_multiplier(team_size) * timeline_multiplier(timeline_months);

        Ok(round2(total))
    }

    /// Full NPV / payback analysis of moving between two frameworks
    pub fn analyze_migration(&self, request: &MigrationRequest) -> Result<RoiResult, CalcError> {
        request.validate()?;

        let current = self.calculator.calculate_monthly_cost(
            request.from_framework,
            request.model,
            request.requests_per_month,
            None,
        )?;
        let target = self.calculator.calculate_monthly_cost(
            request.to_framework,
            request.model,
            request.requests_per_month,
            None,
        )?;

        let dev_cost = self.calculate_development_cost(
            request.to_framework,
            request.team_size,
            request.complexity_factor,
            request.timeline_months,
        )?;
        let risk_factor = self.assumptions.risk_factor(request.risk_scenario)?;
        let migration_cost = round2(dev_cost * risk_factor);

        let monthly_savings = round2(current.total_cost - target.total_cost);
        let horizon = request.horizon_months;
        let monthly_rate = self.assumptions.monthly_discount_rate();

        let cash_flow = project_cash_flow(migration_cost, monthly_savings, horizon, monthly_rate);
        let npv = round2(calculate_npv(migration_cost, monthly_savings, horizon, monthly_rate));
        let payback = payback_month(migration_cost, monthly_savings, horizon, monthly_rate);

        let simple_payback = if monthly_savings > 0.0 {
            Some(migration_cost / monthly_savings)
        } else {
            None
        };
        let break_even_month = simple_payback.map(|months| months.floor() as u32 + 1);

        let total_savings = round2(monthly_savings * horizon as f64);
        let roi_percentage = if migration_cost > 0.0 {
            (total_savings - migration_cost) / migration_cost * 100.0
        } else {
            0.0
        };
        let savings_percentage = if current.total_cost > 0.0 {
            monthly_savings / current.total_cost * 100.0
        } else {
            0.0
        };

        debug!(
            from = %request.from_framework,
            to = %request.to_framework,
            monthly_savings,
            npv,
            ?payback,
            "Migration analysis complete"
        );

        Ok(RoiResult {
            migration_summary: MigrationSummary {
                from_framework: request.from_framework,
                to_framework: request.to_framework,
                model: request.model,
                requests_per_month: request.requests_per_month,
                analysis_period_months: horizon,
            },
            cost_analysis: CostAnalysis {
                current_monthly_cost: current.total_cost,
                target_monthly_cost: target.total_cost,
                monthly_savings,
                annual_savings: round2(monthly_savings * 12.0),
                savings_percentage,
                development_cost: migration_cost,
                risk_factor,
            },
            roi_metrics: RoiMetrics {
                npv,
                payback_period_months: payback,
                simple_payback_months: simple_payback,
                break_even_month,
                roi_percentage,
                total_savings,
            },
            cash_flow_projection: cash_flow,
            recommendations: roi_recommendations(simple_payback, npv, roi_percentage),
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Larger teams cost more, capped at 2x
fn team_multiplier(team_size: u32) -> f64 {
    if team_size > 3 {
        (1.0 + (team_size - 3) as f64 * 0.15).min(2.0)
    } else {
        1.0
    }
}

/// Rushed timelines cost more; long ones slightly less
fn timeline_multiplier(timeline_months: u32) -> f64 {
    match timeline_months {
        0..=3 => 1.4,
        4..=5 => 1.2,
        6..=12 => 1.0,
        _ => 0.9,
    }
}

fn discount_factor(monthly_rate: f64, month: u32) -> f64 {
    (1.0 + monthly_rate).powi(month as i32)
}

/// Net present value of `periods` equal monthly cash flows after an upfront investment
pub fn calculate_npv(initial_investment: f64, monthly_cash_flow: f64, periods: u32, monthly_rate: f64) -> f64 {
    (1..=periods).fold(-initial_investment, |npv, month| {
        npv + monthly_cash_flow / discount_factor(monthly_rate, month)
    })
}

/// Smallest month at which cumulative discounted savings reach the investment
pub fn payback_month(
    initial_investment: f64,
    monthly_savings: f64,
    periods: u32,
    monthly_rate: f64,
) -> Option<u32> {
    if monthly_savings <= 0.0 {
        return None;
    }

    let mut cumulative = 0.0;
    for month in 1..=periods {
        cumulative += monthly_savings / discount_factor(monthly_rate, month);
        if cumulative >= initial_investment {
            return Some(month);
        }
    }
    None
}

fn project_cash_flow(
    initial_investment: f64,
    monthly_savings: f64,
    periods: u32,
    monthly_rate: f64,
) -> Vec<CashFlowEntry> {
    let mut entries = Vec::with_capacity(periods as usize + 1);
    let mut cumulative = -initial_investment;
    let mut cumulative_discounted = -initial_investment;

    entries.push(CashFlowEntry {
        month: 0,
        description: "Initial Development Investment".to_string(),
        cash_flow: -initial_investment,
        cumulative_cash_flow: cumulative,
        discounted_cash_flow: -initial_investment,
        cumulative_discounted_cash_flow: cumulative_discounted,
    });

    for month in 1..=periods {
        let discounted = monthly_savings / discount_factor(monthly_rate, month);
        cumulative += monthly_savings;
        cumulative_discounted += discounted;

        entries.push(CashFlowEntry {
            month,
            description: format!("Operational Savings Month {}", month),
            cash_flow: monthly_savings,
            cumulative_cash_flow: round2(cumulative),
            discounted_cash_flow: round2(discounted),
            cumulative_discounted_cash_flow: round2(cumulative_discounted),
        });
    }

    entries
}

fn roi_recommendations(
    payback_months: Option<f64>,
    npv: f64,
    roi_percentage: f64,
) -> Vec<Recommendation> {
    use RecommendationLevel::*;

    let mut recommendations = Vec::new();

    recommendations.push(match payback_months {
        None => Recommendation::new(
            "Financial Risk",
            High,
            "Migration will increase costs - not recommended from pure cost perspective".to_string(),
            "Consider non-financial benefits or alternative frameworks",
        ),
        Some(months) if months <= 12.0 => Recommendation::new(
            "Quick ROI",
            Positive,
            format!("Excellent payback period of {:.1} months", months),
            "Strong candidate for immediate migration",
        ),
        Some(months) if months <= 24.0 => Recommendation::new(
            "Moderate ROI",
            Neutral,
            format!("Reasonable payback period of {:.1} months", months),
            "Consider migration if strategic benefits align",
        ),
        Some(months) => Recommendation::new(
            "Long Payback",
            Cautionary,
            format!("Long payback period of {:.1} months", months),
            "Evaluate strategic benefits beyond cost savings",
        ),
    });

    recommendations.push(if npv > 50_000.0 {
        Recommendation::new(
            "High Value",
            Positive,
            format!("Excellent NPV of ${:.0}", npv),
            "Strong financial case for migration",
        )
    } else if npv > 10_000.0 {
        Recommendation::new(
            "Positive Value",
            Positive,
            format!("Positive NPV of ${:.0}", npv),
            "Financially beneficial migration",
        )
    } else if npv > -10_000.0 {
        Recommendation::new(
            "Break Even",
            Neutral,
            format!("Near break-even NPV of ${:.0}", npv),
            "Consider strategic and operational benefits",
        )
    } else {
        Recommendation::new(
            "Negative Value",
            Cautionary,
            format!("Negative NPV of ${:.0}", npv),
            "Migration not recommended based on financial analysis",
        )
    });

    if roi_percentage > 100.0 {
        recommendations.push(Recommendation::new(
            "Excellent ROI",
            Positive,
            format!("Outstanding ROI of {:.1}%", roi_percentage),
            "Prioritize this migration project",
        ));
    } else if roi_percentage > 50.0 {
        recommendations.push(Recommendation::new(
            "Good ROI",
            Positive,
            format!("Strong ROI of {:.1}%", roi_percentage),
            "Recommend proceeding with migration",
        ));
    } else if roi_percentage > 0.0 {
        recommendations.push(Recommendation::new(
            "Positive ROI",
            Neutral,
            format!("Modest ROI of {:.1}%", roi_percentage),
            "Consider if strategic benefits justify investment",
        ));
    }

    recommendations
}
