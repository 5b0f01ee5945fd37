/// Integration tests for the cost model and ROI analysis across the whole
/// model x framework x volume space
use agent_cost::error::CalcError;
use agent_cost::pricing::models::round2;
use agent_cost::pricing::{CostCalculator, Framework, ModelProvider, RoiAssumptions};
use agent_cost::roi::{MigrationRequest, RoiAnalyzer};
use std::sync::Arc;

const VOLUMES: [u64; 8] = [0, 1, 999, 1_000, 9_999, 10_000, 100_000, 2_500_000];

fn analyzer() -> RoiAnalyzer {
    RoiAnalyzer::new(CostCalculator::default(), Arc::new(RoiAssumptions::default()))
}

#[test]
fn test_total_rounds_the_unrounded_sum() {
    let calc = CostCalculator::default();
    let tables = calc.tables();

    for model in ModelProvider::ALL {
        for framework in Framework::ALL {
            for volume in VOLUMES {
                let b = calc
                    .calculate_monthly_cost(framework, model, volume, None)
                    .unwrap();
                let raw = calc
                    .calculate_cost_per_request(framework, model, None)
                    .unwrap()
                    * volume as f64
                    + tables.infrastructure_cost(volume).unwrap()
                    + tables.monitoring_cost(volume).unwrap();
                assert_eq!(
                    b.total_cost,
                    round2(raw),
                    "{} / {} @ {}",
                    framework,
                    model,
                    volume
                );

                let sum = b.api_cost + b.infrastructure_cost + b.monitoring_cost;
                assert!((b.total_cost - sum).abs() <= 0.02 + 1e-9);
            }
        }
    }
}

#[test]
fn test_api_cost_scales_linearly() {
    let calc = CostCalculator::default();

    for model in ModelProvider::ALL {
        for framework in Framework::ALL {
            let per_request = calc
                .calculate_cost_per_request(framework, model, None)
                .unwrap();
            for volume in VOLUMES {
                let b = calc
                    .calculate_monthly_cost(framework, model, volume, None)
                    .unwrap();
                let expected = per_request * volume as f64;
                // Only cent rounding separates the two
                assert!((b.api_cost - expected).abs() <= 0.005 + 1e-9);
            }
        }
    }
}

#[test]
fn test_comparison_sorted_for_every_model() {
    let calc = CostCalculator::default();

    for model in ModelProvider::ALL {
        for volume in VOLUMES {
            let results = calc.compare_frameworks(model, volume, None).unwrap();
            assert_eq!(results.len(), Framework::ALL.len());
            assert!(results
                .windows(2)
                .all(|w| w[0].total_cost <= w[1].total_cost));
        }
    }
}

#[test]
fn test_self_migration_is_neutral() {
    let analyzer = analyzer();

    for framework in Framework::ALL {
        let request = MigrationRequest::with_defaults(
            analyzer.assumptions(),
            framework,
            framework,
            ModelProvider::Claude35Sonnet,
            40_000,
        );
        let result = analyzer.analyze_migration(&request).unwrap();

        assert_eq!(result.cost_analysis.monthly_savings, 0.0);
        assert_eq!(result.roi_metrics.payback_period_months, None);
        assert_eq!(result.roi_metrics.simple_payback_months, None);
    }
}

#[test]
fn test_migration_direction_determines_payback() {
    let analyzer = analyzer();
    let assumptions = analyzer.assumptions();

    let mut forward = MigrationRequest::with_defaults(
        assumptions,
        Framework::LangGraph,
        Framework::SemanticKernel,
        ModelProvider::OpenAiGpt4o,
        100_000,
    );
    forward.horizon_months = 240;
    let result = analyzer.analyze_migration(&forward).unwrap();
    assert!(result.cost_analysis.monthly_savings > 0.0);
    assert!(result.roi_metrics.payback_period_months.is_some());

    let mut reverse = forward.clone();
    std::mem::swap(&mut reverse.from_framework, &mut reverse.to_framework);
    let result = analyzer.analyze_migration(&reverse).unwrap();
    assert!(result.cost_analysis.monthly_savings < 0.0);
    assert_eq!(result.roi_metrics.payback_period_months, None);
}

#[test]
fn test_discounted_payback_not_before_simple_payback() {
    let analyzer = analyzer();
    let mut request = MigrationRequest::with_defaults(
        analyzer.assumptions(),
        Framework::LangChain,
        Framework::AutoGen,
        ModelProvider::OpenAiGpt4o,
        200_000,
    );
    request.horizon_months = 600;

    let metrics = analyzer.analyze_migration(&request).unwrap().roi_metrics;
    let discounted = metrics.payback_period_months.unwrap();
    let simple = metrics.simple_payback_months.unwrap();
    assert!(discounted as f64 >= simple);
}

#[test]
fn test_invalid_requests() {
    let analyzer = analyzer();
    let base = MigrationRequest::with_defaults(
        analyzer.assumptions(),
        Framework::CrewAi,
        Framework::AutoGen,
        ModelProvider::LocalLlm,
        5_000,
    );

    let mut zero_team = base.clone();
    zero_team.team_size = 0;
    assert!(matches!(
        analyzer.analyze_migration(&zero_team),
        Err(CalcError::InvalidInput(_))
    ));

    let mut long_horizon = base.clone();
    long_horizon.horizon_months = 601;
    assert!(matches!(
        analyzer.analyze_migration(&long_horizon),
        Err(CalcError::InvalidInput(_))
    ));

    let mut negative_complexity = base;
    negative_complexity.complexity_factor = -1.0;
    assert!(matches!(
        analyzer.sensitivity_analysis(&negative_complexity),
        Err(CalcError::InvalidInput(_))
    ));
}
