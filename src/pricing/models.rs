use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// LLM model offerings with published token pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelProvider {
    #[serde(rename = "openai_gpt4o")]
    OpenAiGpt4o,
    #[serde(rename = "openai_gpt4o_mini")]
    OpenAiGpt4oMini,
    #[serde(rename = "claude_35_sonnet")]
    Claude35Sonnet,
    #[serde(rename = "local_llm")]
    LocalLlm,
}

impl ModelProvider {
    pub const ALL: [ModelProvider; 4] = [
        ModelProvider::OpenAiGpt4o,
        ModelProvider::OpenAiGpt4oMini,
        ModelProvider::Claude35Sonnet,
        ModelProvider::LocalLlm,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAiGpt4o => "openai_gpt4o",
            Self::OpenAiGpt4oMini => "openai_gpt4o_mini",
            Self::Claude35Sonnet => "claude_35_sonnet",
            Self::LocalLlm => "local_llm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAiGpt4o => "GPT-4o",
            Self::OpenAiGpt4oMini => "GPT-4o Mini",
            Self::Claude35Sonnet => "Claude 3.5 Sonnet",
            Self::LocalLlm => "Local LLM",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelProvider {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s.trim())
            .ok_or_else(|| CalcError::invalid(format!("unknown model: {}", s)))
    }
}

/// Agent frameworks under comparison.
///
/// Declaration order is significant: it is the tie-break order when two
/// frameworks cost the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "autogen")]
    AutoGen,
    #[serde(rename = "crewai")]
    CrewAi,
    #[serde(rename = "langchain")]
    LangChain,
    #[serde(rename = "langgraph")]
    LangGraph,
    #[serde(rename = "semantic_kernel")]
    SemanticKernel,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Framework::AutoGen,
        Framework::CrewAi,
        Framework::LangChain,
        Framework::LangGraph,
        Framework::SemanticKernel,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::AutoGen => "autogen",
            Self::CrewAi => "crewai",
            Self::LangChain => "langchain",
            Self::LangGraph => "langgraph",
            Self::SemanticKernel => "semantic_kernel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AutoGen => "AutoGen",
            Self::CrewAi => "CrewAI",
            Self::LangChain => "LangChain",
            Self::LangGraph => "LangGraph",
            Self::SemanticKernel => "Semantic Kernel",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Framework {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|fw| fw.id() == s.trim())
            .ok_or_else(|| CalcError::invalid(format!("unknown framework: {}", s)))
    }
}

/// Organisational risk profile applied to development cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScenario {
    Startup,
    #[default]
    Growth,
    Enterprise,
    Research,
}

impl RiskScenario {
    pub const ALL: [RiskScenario; 4] = [
        RiskScenario::Startup,
        RiskScenario::Growth,
        RiskScenario::Enterprise,
        RiskScenario::Research,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Growth => "growth",
            Self::Enterprise => "enterprise",
            Self::Research => "research",
        }
    }
}

impl fmt::Display for RiskScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RiskScenario {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.id() == s.trim())
            .ok_or_else(|| CalcError::invalid(format!("unknown risk scenario: {}", s)))
    }
}

/// Token pricing for a model (USD per 1M tokens)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_cost: f64,
    pub output_cost: f64,
}

impl ModelPricing {
    pub const fn new(input_cost: f64, output_cost: f64) -> Self {
        Self {
            input_cost,
            output_cost,
        }
    }

    /// Blended price per 1M tokens for the given input token share
    pub fn average_cost(&self, input_share: f64) -> f64 {
        self.input_cost * input_share + self.output_cost * (1.0 - input_share)
    }
}

/// Token footprint and overhead of a framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkProfile {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub efficiency_score: f64,
    pub overhead_multiplier: f64,
    pub description: String,
}

impl FrameworkProfile {
    pub fn avg_tokens_per_request(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Baseline cost of building on a framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentProfile {
    pub base_cost: f64,
    pub complexity_multiplier: f64,
    pub description: String,
}

/// Monthly cost of a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub framework: Framework,
    pub model: ModelProvider,
    pub requests_per_month: u64,
    pub tokens_per_request: u64,
    pub api_cost: f64,
    pub infrastructure_cost: f64,
    pub monitoring_cost: f64,
    pub total_cost: f64,
    pub cost_per_request: f64,
}

/// Simple month-over-month savings between two frameworks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationSavings {
    pub from_framework: Framework,
    pub to_framework: Framework,
    pub current_monthly_cost: f64,
    pub new_monthly_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub savings_percentage: f64,
}

/// Round to cents.
///
/// Goes through the shortest decimal formatting, which rounds the exact
/// binary value: 320.135 is stored just below the tie and becomes 320.13.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_from_str() {
        assert_eq!("semantic_kernel".parse::<Framework>().unwrap(), Framework::SemanticKernel);
        assert_eq!(" autogen ".parse::<Framework>().unwrap(), Framework::AutoGen);

        let err = "haystack".parse::<Framework>().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput(_)));
    }

    #[test]
    fn test_model_serde_ids() {
        let json = serde_json::to_string(&ModelProvider::OpenAiGpt4oMini).unwrap();
        assert_eq!(json, "\"openai_gpt4o_mini\"");

        let model: ModelProvider = serde_json::from_str("\"claude_35_sonnet\"").unwrap();
        assert_eq!(model, ModelProvider::Claude35Sonnet);

        for model in ModelProvider::ALL {
            assert_eq!(model.id().parse::<ModelProvider>().unwrap(), model);
        }
    }

    #[test]
    fn test_framework_order_is_declaration_order() {
        let mut sorted = Framework::ALL;
        sorted.sort();
        assert_eq!(sorted, Framework::ALL);
    }

    #[test]
    fn test_average_cost() {
        let pricing = ModelPricing::new(5.0, 20.0);
        assert!((pricing.average_cost(0.6) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_scenario_default() {
        assert_eq!(RiskScenario::default(), RiskScenario::Growth);
        assert!("moonshot".parse::<RiskScenario>().is_err());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(650.9200000000001), 650.92);
        assert_eq!(round4(0.020592), 0.0206);
        assert_eq!(round1(12.34), 12.3);
    }

    #[test]
    fn test_rounding_uses_stored_value() {
        // 320.135 and 2.675 sit just below the half-cent in binary
        assert_eq!(round2(320.135), 320.13);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(704.553544), 704.55);
        assert_eq!(round2(727.398824), 727.4);
        assert_eq!(round2(-1.005), -1.0);
    }
}
