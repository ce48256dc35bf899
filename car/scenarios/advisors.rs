use car_narrative::{
    Advisor, AdvisorConfig, AnalysisResult, ConfigRequirements, NarrativeResult,
    ScenarioDefinition,
};
use serde_json::Value;

/// Produces the authored analysis literal for one example.
pub type AnalysisLiteral = fn() -> Value;

/// Weights every healthcare analysis is parameterised by.
pub const HEALTHCARE_WEIGHTS: [&str; 4] = [
    "ethicalEmphasis.autonomy",
    "ethicalEmphasis.beneficence",
    "ethicalEmphasis.nonMaleficence",
    "ethicalEmphasis.justice",
];

/// Weights every governance analysis is parameterised by.
pub const GOVERNANCE_WEIGHTS: [&str; 3] = [
    "epistemicHumility",
    "democraticLegitimacy",
    "transparency",
];

/// Healthcare ethics framework. Its reasoning lives outside this workspace;
/// here it answers with the analysis authored for each example.
#[derive(Debug, Clone, Copy)]
pub struct CarHealthcare {
    analysis: AnalysisLiteral,
}

impl CarHealthcare {
    /// Advisor answering with `analysis`.
    #[must_use]
    pub const fn with_analysis(analysis: AnalysisLiteral) -> Self {
        Self { analysis }
    }

    /// Requirements shared by every healthcare example.
    #[must_use]
    pub fn config_requirements() -> ConfigRequirements {
        HEALTHCARE_WEIGHTS
            .iter()
            .fold(ConfigRequirements::new(), |req, name| req.weight(*name))
            .option_in("analysisDepth", ["summary", "standard", "comprehensive"])
    }

    /// Balanced default configuration.
    #[must_use]
    pub fn default_config() -> AdvisorConfig {
        AdvisorConfig::new()
            .with_weight("ethicalEmphasis.autonomy", 0.8)
            .with_weight("ethicalEmphasis.beneficence", 0.9)
            .with_weight("ethicalEmphasis.nonMaleficence", 0.95)
            .with_weight("ethicalEmphasis.justice", 0.85)
            .with_option("analysisDepth", "comprehensive")
    }
}

impl Advisor for CarHealthcare {
    fn label(&self) -> &str {
        "car.healthcare"
    }

    fn requirements(&self) -> ConfigRequirements {
        Self::config_requirements()
    }

    fn analyze(
        &self,
        _definition: &ScenarioDefinition,
        _config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult> {
        AnalysisResult::from_literal((self.analysis)())
    }
}

/// Governance framework advisor; same boundary as [`CarHealthcare`].
#[derive(Debug, Clone, Copy)]
pub struct CarGovernance {
    analysis: AnalysisLiteral,
}

impl CarGovernance {
    /// Advisor answering with `analysis`.
    #[must_use]
    pub const fn with_analysis(analysis: AnalysisLiteral) -> Self {
        Self { analysis }
    }

    /// Requirements shared by every governance example.
    #[must_use]
    pub fn config_requirements() -> ConfigRequirements {
        GOVERNANCE_WEIGHTS
            .iter()
            .fold(ConfigRequirements::new(), |req, name| req.weight(*name))
            .option_in("deliberationMode", ["advisory", "binding"])
    }

    /// Default configuration used by the examples.
    #[must_use]
    pub fn default_config() -> AdvisorConfig {
        AdvisorConfig::new()
            .with_weight("epistemicHumility", 0.9)
            .with_weight("democraticLegitimacy", 0.85)
            .with_weight("transparency", 0.95)
            .with_option("deliberationMode", "advisory")
    }
}

impl Advisor for CarGovernance {
    fn label(&self) -> &str {
        "car.governance"
    }

    fn requirements(&self) -> ConfigRequirements {
        Self::config_requirements()
    }

    fn analyze(
        &self,
        _definition: &ScenarioDefinition,
        _config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult> {
        AnalysisResult::from_literal((self.analysis)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::{build_definition, ConfigError};
    use serde_json::json;

    fn analysis() -> Value {
        json!({ "summary": "proceed with safeguards" })
    }

    #[test]
    fn default_configs_meet_requirements() {
        assert!(CarHealthcare::config_requirements()
            .validate(&CarHealthcare::default_config())
            .is_ok());
        assert!(CarGovernance::config_requirements()
            .validate(&CarGovernance::default_config())
            .is_ok());
    }

    #[test]
    fn healthcare_requires_every_emphasis_weight() {
        for name in HEALTHCARE_WEIGHTS {
            let mut config = CarHealthcare::default_config();
            config.weights.shift_remove(name);
            assert_eq!(
                CarHealthcare::config_requirements().validate(&config),
                Err(ConfigError::MissingWeight(name.to_string()))
            );
        }
    }

    #[test]
    fn advisors_answer_with_authored_analysis() {
        let definition = build_definition(json!({ "title": "x" })).unwrap();
        let advisor = CarGovernance::with_analysis(analysis);
        let result = advisor
            .analyze(&definition, &CarGovernance::default_config())
            .unwrap();
        assert_eq!(result.to_json().unwrap(), analysis());
        assert_eq!(advisor.label(), "car.governance");
    }
}
