//! Named business scenarios and their cost analyses.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::error::CalcError;
use crate::pricing::models::round2;
use crate::pricing::{CostBreakdown, CostCalculator, Framework, ModelProvider, RoiAssumptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessContext {
    pub team_size: &'static str,
    pub budget: &'static str,
    pub timeline: &'static str,
    pub priorities: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requests_per_month: u64,
    pub model: ModelProvider,
    pub custom_tokens: u64,
    pub business_context: BusinessContext,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "startup_mvp",
        name: "Startup MVP",
        description: "Early-stage startup building minimum viable product",
        requests_per_month: 1_000,
        model: ModelProvider::OpenAiGpt4oMini,
        custom_tokens: 800,
        business_context: BusinessContext {
            team_size: "2-5 developers",
            budget: "Limited seed funding",
            timeline: "3-6 months to market",
            priorities: &["Cost efficiency", "Speed to market", "Simplicity"],
        },
    },
    Scenario {
        key: "saas_growth",
        name: "SaaS Growth Stage",
        description: "Growing SaaS company scaling user base",
        requests_per_month: 25_000,
        model: ModelProvider::OpenAiGpt4o,
        custom_tokens: 1_200,
        business_context: BusinessContext {
            team_size: "10-20 developers",
            budget: "Series A funded",
            timeline: "12-18 months scaling",
            priorities: &["Scalability", "Performance", "Feature velocity"],
        },
    },
    Scenario {
        key: "enterprise_deployment",
        name: "Enterprise Deployment",
        description: "Large enterprise with compliance requirements",
        requests_per_month: 100_000,
        model: ModelProvider::Claude35Sonnet,
        custom_tokens: 2_000,
        business_context: BusinessContext {
            team_size: "50+ developers",
            budget: "Enterprise budget",
            timeline: "Multi-year deployment",
            priorities: &["Security", "Compliance", "Reliability", "Support"],
        },
    },
    Scenario {
        key: "ai_research_lab",
        name: "AI Research Lab",
        description: "Research institution exploring AI capabilities",
        requests_per_month: 15_000,
        model: ModelProvider::OpenAiGpt4o,
        custom_tokens: 3_000,
        business_context: BusinessContext {
            team_size: "5-15 researchers",
            budget: "Grant funding",
            timeline: "1-3 year projects",
            priorities: &["Experimental features", "Flexibility", "Research capabilities"],
        },
    },
    Scenario {
        key: "ecommerce_platform",
        name: "E-commerce Platform",
        description: "Online retail platform with AI-powered features",
        requests_per_month: 75_000,
        model: ModelProvider::OpenAiGpt4o,
        custom_tokens: 1_500,
        business_context: BusinessContext {
            team_size: "20-40 developers",
            budget: "Revenue-funded growth",
            timeline: "Continuous deployment",
            priorities: &["Customer experience", "Conversion rates", "Cost optimization"],
        },
    },
    Scenario {
        key: "healthcare_startup",
        name: "Healthcare AI Startup",
        description: "Digital health company with AI diagnostics",
        requests_per_month: 8_000,
        model: ModelProvider::Claude35Sonnet,
        custom_tokens: 2_500,
        business_context: BusinessContext {
            team_size: "10-25 developers",
            budget: "Series A/B funding",
            timeline: "18-24 months to regulatory approval",
            priorities: &["Regulatory compliance", "Accuracy", "Privacy", "Auditability"],
        },
    },
    Scenario {
        key: "fintech_robo_advisor",
        name: "FinTech Robo-Advisor",
        description: "Automated investment platform with AI recommendations",
        requests_per_month: 45_000,
        model: ModelProvider::OpenAiGpt4o,
        custom_tokens: 1_800,
        business_context: BusinessContext {
            team_size: "15-30 developers",
            budget: "Well-funded growth stage",
            timeline: "Continuous optimization",
            priorities: &["Regulatory compliance", "Performance", "Risk management", "Cost efficiency"],
        },
    },
    Scenario {
        key: "content_creation_platform",
        name: "Content Creation Platform",
        description: "AI-powered content generation for marketing teams",
        requests_per_month: 35_000,
        model: ModelProvider::OpenAiGpt4o,
        custom_tokens: 2_200,
        business_context: BusinessContext {
            team_size: "8-20 developers",
            budget: "Bootstrap/Series A",
            timeline: "6-12 months to profitability",
            priorities: &["Content quality", "Speed", "Cost per output", "Scalability"],
        },
    },
];

pub fn find_scenario(key: &str) -> Result<&'static Scenario, CalcError> {
    SCENARIOS
        .iter()
        .find(|s| s.key == key)
        .ok_or_else(|| CalcError::invalid(format!("unknown scenario: {}", key)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub best_option: Framework,
    pub best_monthly_cost: f64,
    pub most_expensive: Framework,
    pub highest_monthly_cost: f64,
    pub max_monthly_savings: f64,
    pub max_annual_savings: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRecommendation {
    pub category: &'static str,
    pub framework: Framework,
    pub reasoning: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<&'static str>,
}

/// Total cost of ownership of one framework in a scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkTco {
    pub framework: Framework,
    pub framework_name: &'static str,
    pub development_cost: f64,
    pub annual_operating_cost: f64,
    pub total_first_year_cost: f64,
    pub annual_cost_vs_best: f64,
    pub three_year_tco: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioAnalysis {
    pub scenario: Scenario,
    pub framework_comparison: Vec<CostBreakdown>,
    pub cost_summary: CostSummary,
    pub recommendations: Vec<ScenarioRecommendation>,
    pub tco: Vec<FrameworkTco>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkWins {
    pub wins: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub framework_performance: BTreeMap<Framework, FrameworkWins>,
    pub average_max_annual_savings: f64,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllScenarios {
    pub scenarios: Vec<ScenarioAnalysis>,
    pub summary: ScenarioSummary,
    pub generated_at: String,
}

/// Runs the cost model over the predefined business scenarios
pub struct ScenarioGenerator<'a> {
    calculator: &'a CostCalculator,
    assumptions: &'a RoiAssumptions,
}

impl<'a> ScenarioGenerator<'a> {
    pub fn new(calculator: &'a CostCalculator, assumptions: &'a RoiAssumptions) -> Self {
        Self {
            calculator,
            assumptions,
        }
    }

    pub fn analyze_scenario(&self, key: &str) -> Result<ScenarioAnalysis, CalcError> {
        let scenario = find_scenario(key)?;
        self.analyze(scenario)
    }

    pub fn analyze(&self, scenario: &Scenario) -> Result<ScenarioAnalysis, CalcError> {
        let comparison = self.calculator.compare_frameworks(
            scenario.model,
            scenario.requests_per_month,
            Some(scenario.custom_tokens),
        )?;

        let (best, most_expensive) = match (comparison.first(), comparison.last()) {
            (Some(best), Some(worst)) => (best, worst),
            _ => return Err(CalcError::missing("no frameworks configured")),
        };

        let max_savings = round2(most_expensive.total_cost - best.total_cost);
        let cost_summary = CostSummary {
            best_option: best.framework,
            best_monthly_cost: best.total_cost,
            most_expensive: most_expensive.framework,
            highest_monthly_cost: most_expensive.total_cost,
            max_monthly_savings: max_savings,
            max_annual_savings: round2(max_savings * 12.0),
            savings_percentage: if most_expensive.total_cost > 0.0 {
                max_savings / most_expensive.total_cost * 100.0
            } else {
                0.0
            },
        };

        let recommendations = recommend(scenario, &comparison);
        let tco = self.total_cost_of_ownership(&comparison)?;

        Ok(ScenarioAnalysis {
            scenario: scenario.clone(),
            framework_comparison: comparison,
            cost_summary,
            recommendations,
            tco,
            generated_at: Utc::now().to_rfc3339(),
        })
    }

    pub fn analyze_all(&self) -> Result<AllScenarios, CalcError> {
        let mut analyses = Vec::with_capacity(SCENARIOS.len());
        for scenario in SCENARIOS {
            info!("Generating analysis for: {}", scenario.name);
            analyses.push(self.analyze(scenario)?);
        }

        let summary = summarize(&analyses);
        Ok(AllScenarios {
            scenarios: analyses,
            summary,
            generated_at: Utc::now().to_rfc3339(),
        })
    }

    fn total_cost_of_ownership(&self, comparison: &[CostBreakdown]) -> Result<Vec<FrameworkTco>, CalcError> {
        let best_monthly = comparison.first().map(|b| b.total_cost).unwrap_or_default();

        comparison
            .iter()
            .map(|breakdown| -> Result<FrameworkTco, CalcError> {
                let development_cost = self.assumptions.development(breakdown.framework)?.base_cost;
                let annual_operating_cost = round2(breakdown.total_cost * 12.0);
                Ok(FrameworkTco {
                    framework: breakdown.framework,
                    framework_name: breakdown.framework.display_name(),
                    development_cost,
                    annual_operating_cost,
                    total_first_year_cost: round2(development_cost + annual_operating_cost),
                    annual_cost_vs_best: round2((breakdown.total_cost - best_monthly) * 12.0),
                    three_year_tco: round2(development_cost + annual_operating_cost * 3.0),
                })
            })
            .collect()
    }
}

fn recommend(scenario: &Scenario, comparison: &[CostBreakdown]) -> Vec<ScenarioRecommendation> {
    let mut recommendations = Vec::new();
    let (best, worst) = match (comparison.first(), comparison.last()) {
        (Some(best), Some(worst)) => (best, worst),
        _ => return recommendations,
    };
    let name = scenario.name.to_lowercase();

    if scenario.requests_per_month < 10_000 {
        recommendations.push(ScenarioRecommendation {
            category: "Budget Optimization",
            framework: best.framework,
            reasoning: format!(
                "For {} requests/month, {} offers the best cost efficiency at ${:.2}/month (saves ${:.0}/year vs most expensive option)",
                scenario.requests_per_month,
                best.framework.display_name(),
                best.total_cost,
                (worst.total_cost - best.total_cost) * 12.0
            ),
            priority: Priority::High,
            benefits: Vec::new(),
        });
    }

    if scenario.requests_per_month > 50_000 {
        let performant = comparison.iter().find(|b| {
            matches!(b.framework, Framework::SemanticKernel | Framework::AutoGen)
                && b.total_cost < worst.total_cost * 1.2
        });
        if let Some(choice) = performant {
            recommendations.push(ScenarioRecommendation {
                category: "Performance & Scale",
                framework: choice.framework,
                reasoning: format!(
                    "{} offers excellent performance at scale with enterprise-grade reliability (${:.2}/month premium over the cheapest option)",
                    choice.framework.display_name(),
                    choice.total_cost - best.total_cost
                ),
                priority: Priority::Medium,
                benefits: Vec::new(),
            });
        }
    }

    if name.contains("enterprise") || scenario.requests_per_month > 75_000 {
        recommendations.push(ScenarioRecommendation {
            category: "Enterprise Ready",
            framework: Framework::SemanticKernel,
            reasoning: "Semantic Kernel provides enterprise integration, security features, and Microsoft ecosystem compatibility".to_string(),
            priority: Priority::High,
            benefits: vec![
                "Native Azure integration",
                "Enterprise security",
                "Professional support",
                "Compliance features",
            ],
        });
    }

    if name.contains("research") || name.contains("startup") {
        recommendations.push(ScenarioRecommendation {
            category: "Innovation & Flexibility",
            framework: Framework::AutoGen,
            reasoning: "AutoGen offers cutting-edge multi-agent capabilities and research-grade features for experimental use cases".to_string(),
            priority: Priority::Medium,
            benefits: vec![
                "Multi-agent conversations",
                "Latest research features",
                "Flexible architectures",
                "Active development",
            ],
        });
    }

    recommendations
}

fn summarize(analyses: &[ScenarioAnalysis]) -> ScenarioSummary {
    let total = analyses.len();
    let mut wins: BTreeMap<Framework, usize> = BTreeMap::new();
    for analysis in analyses {
        *wins.entry(analysis.cost_summary.best_option).or_default() += 1;
    }

    let average_max_annual_savings = if total > 0 {
        analyses
            .iter()
            .map(|a| a.cost_summary.max_annual_savings)
            .sum::<f64>()
            / total as f64
    } else {
        0.0
    };

    let wins_for = |fw: Framework| wins.get(&fw).copied().unwrap_or(0);
    let key_insights = vec![
        format!(
            "Framework selection can save up to ${:.0} annually on average",
            average_max_annual_savings
        ),
        format!(
            "Semantic Kernel wins {}/{} scenarios",
            wins_for(Framework::SemanticKernel),
            total
        ),
        format!("AutoGen wins {}/{} scenarios", wins_for(Framework::AutoGen), total),
        "Cost optimization varies significantly by use case and scale".to_string(),
    ];

    let framework_performance = wins
        .iter()
        .map(|(fw, count)| {
            (
                *fw,
                FrameworkWins {
                    wins: *count,
                    win_rate: *count as f64 / total as f64,
                },
            )
        })
        .collect();

    ScenarioSummary {
        framework_performance,
        average_max_annual_savings: round2(average_max_annual_savings),
        key_insights,
    }
}
