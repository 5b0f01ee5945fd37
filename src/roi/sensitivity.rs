//! Best/worst-case ranges for a migration across volume and complexity shifts.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::roi::analyzer::{MigrationRequest, RoiAnalyzer};

pub const VOLUME_MULTIPLIERS: [f64; 5] = [0.5, 0.8, 1.0, 1.2, 1.5];
pub const COMPLEXITY_MULTIPLIERS: [f64; 5] = [0.7, 0.9, 1.0, 1.2, 1.5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub volume_multiplier: f64,
    pub complexity_multiplier: f64,
    pub requests_per_month: u64,
    pub complexity_factor: f64,
    pub monthly_savings: f64,
    pub development_cost: f64,
    pub npv: f64,
    pub payback_period_months: Option<u32>,
    pub roi_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRange {
    pub best_npv: f64,
    pub worst_npv: f64,
    pub best_case: SensitivityPoint,
    pub worst_case: SensitivityPoint,
    /// Shortest payback in the grid, if any point pays back
    pub best_payback_months: Option<u32>,
    /// Longest payback when every point pays back; `None` otherwise
    pub worst_payback_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub baseline: SensitivityPoint,
    /// Volume varied, complexity at baseline
    pub volume_sensitivity: Vec<SensitivityPoint>,
    /// Complexity varied, volume at baseline
    pub complexity_sensitivity: Vec<SensitivityPoint>,
    pub grid: Vec<SensitivityPoint>,
    pub range: SensitivityRange,
}

impl RoiAnalyzer {
    /// Re-run the migration analysis over the volume x complexity grid
    pub fn sensitivity_analysis(&self, base: &MigrationRequest) -> Result<SensitivityReport, CalcError> {
        base.validate()?;

        let mut grid = Vec::with_capacity(VOLUME_MULTIPLIERS.len() * COMPLEXITY_MULTIPLIERS.len());
        for volume_multiplier in VOLUME_MULTIPLIERS {
            for complexity_multiplier in COMPLEXITY_MULTIPLIERS {
                grid.push(self.evaluate_point(base, volume_multiplier, complexity_multiplier)?);
            }
        }

        let is_baseline = |p: &SensitivityPoint| p.volume_multiplier == 1.0 && p.complexity_multiplier == 1.0;
        let baseline = grid
            .iter()
            .find(|p| is_baseline(p))
            .cloned()
            .ok_or_else(|| CalcError::missing("sensitivity grid has no baseline point"))?;

        let volume_sensitivity = grid
            .iter()
            .filter(|p| p.complexity_multiplier == 1.0)
            .cloned()
            .collect();
        let complexity_sensitivity = grid
            .iter()
            .filter(|p| p.volume_multiplier == 1.0)
            .cloned()
            .collect();

        let range = summarize(&grid, &baseline);

        Ok(SensitivityReport {
            baseline,
            volume_sensitivity,
            complexity_sensitivity,
            grid,
            range,
        })
    }

    fn evaluate_point(
        &self,
        base: &MigrationRequest,
        volume_multiplier: f64,
        complexity_multiplier: f64,
    ) -> Result<SensitivityPoint, CalcError> {
        let mut request = base.clone();
        request.requests_per_month = (base.requests_per_month as f64 * volume_multiplier) as u64;
        request.complexity_factor = base.complexity_factor * complexity_multiplier;

        let result = self.analyze_migration(&request)?;

        Ok(SensitivityPoint {
            volume_multiplier,
            complexity_multiplier,
            requests_per_month: request.requests_per_month,
            complexity_factor: request.complexity_factor,
            monthly_savings: result.cost_analysis.monthly_savings,
            development_cost: result.cost_analysis.development_cost,
            npv: result.roi_metrics.npv,
            payback_period_months: result.roi_metrics.payback_period_months,
            roi_percentage: result.roi_metrics.roi_percentage,
        })
    }
}

fn summarize(grid: &[SensitivityPoint], baseline: &SensitivityPoint) -> SensitivityRange {
    let best_case = grid
        .iter()
        .max_by(|a, b| a.npv.total_cmp(&b.npv))
        .unwrap_or(baseline)
        .clone();
    let worst_case = grid
        .iter()
        .min_by(|a, b| a.npv.total_cmp(&b.npv))
        .unwrap_or(baseline)
        .clone();

    let paybacks: Vec<Option<u32>> = grid.iter().map(|p| p.payback_period_months).collect();
    let best_payback_months = paybacks.iter().flatten().min().copied();
    let worst_payback_months = if paybacks.iter().all(Option::is_some) {
        paybacks.iter().flatten().max().copied()
    } else {
        None
    };

    SensitivityRange {
        best_npv: best_case.npv,
        worst_npv: worst_case.npv,
        best_case,
        worst_case,
        best_payback_months,
        worst_payback_months,
    }
}
