pub mod calculate;
pub mod catalog;
pub mod health;
pub mod metrics_handler;
pub mod migration;
pub mod scenarios;

use std::str::FromStr;
use std::sync::Arc;

use crate::error::CalcError;
use crate::pricing::CostCalculator;
use crate::roi::RoiAnalyzer;

/// Shared state for the calculation routes
///
/// The analyzer owns the calculator, so both share one set of tables.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<RoiAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: RoiAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn calculator(&self) -> &CostCalculator {
        self.analyzer.calculator()
    }
}

/// Parse an enum id sent as a JSON string
pub(crate) fn parse_id<T>(value: &str) -> Result<T, CalcError>
where
    T: FromStr<Err = CalcError>,
{
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Framework, ModelProvider};

    #[test]
    fn test_parse_id() {
        let fw: Framework = parse_id("langgraph").unwrap();
        assert_eq!(fw, Framework::LangGraph);

        let model: Result<ModelProvider, _> = parse_id("gpt-5");
        assert!(matches!(model, Err(CalcError::InvalidInput(_))));
    }
}
