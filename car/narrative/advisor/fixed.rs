use std::fmt;

use crate::{
    advisor::contract::Advisor,
    config::{AdvisorConfig, ConfigRequirements},
    error::NarrativeResult,
    tree::{AnalysisResult, ScenarioDefinition},
};

/// Advisor returning a pre-authored analysis regardless of input.
#[derive(Debug, Clone)]
pub struct StaticAdvisor {
    label: String,
    requirements: ConfigRequirements,
    analysis: AnalysisResult,
}

impl StaticAdvisor {
    /// Creates an advisor with no configuration requirements.
    #[must_use]
    pub fn new(label: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            label: label.into(),
            requirements: ConfigRequirements::default(),
            analysis,
        }
    }

    /// Declares the configuration this advisor expects.
    #[must_use]
    pub fn with_requirements(mut self, requirements: ConfigRequirements) -> Self {
        self.requirements = requirements;
        self
    }
}

impl Advisor for StaticAdvisor {
    fn label(&self) -> &str {
        &self.label
    }

    fn requirements(&self) -> ConfigRequirements {
        self.requirements.clone()
    }

    fn analyze(
        &self,
        _definition: &ScenarioDefinition,
        _config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult> {
        Ok(self.analysis.clone())
    }
}

type AnalyzeFn =
    dyn Fn(&ScenarioDefinition, &AdvisorConfig) -> NarrativeResult<AnalysisResult> + Send + Sync;

/// Advisor delegating to a closure.
pub struct FnAdvisor {
    label: String,
    requirements: ConfigRequirements,
    analyze: Box<AnalyzeFn>,
}

impl FnAdvisor {
    /// Wraps `analyze` under `label`.
    pub fn new<F>(label: impl Into<String>, analyze: F) -> Self
    where
        F: Fn(&ScenarioDefinition, &AdvisorConfig) -> NarrativeResult<AnalysisResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            label: label.into(),
            requirements: ConfigRequirements::default(),
            analyze: Box::new(analyze),
        }
    }

    /// Declares the configuration this advisor expects.
    #[must_use]
    pub fn with_requirements(mut self, requirements: ConfigRequirements) -> Self {
        self.requirements = requirements;
        self
    }
}

impl fmt::Debug for FnAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAdvisor")
            .field("label", &self.label)
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

impl Advisor for FnAdvisor {
    fn label(&self) -> &str {
        &self.label
    }

    fn requirements(&self) -> ConfigRequirements {
        self.requirements.clone()
    }

    fn analyze(
        &self,
        definition: &ScenarioDefinition,
        config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult> {
        (self.analyze)(definition, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::NarrativeError, tree::build_definition};
    use serde_json::json;

    #[test]
    fn static_advisor_ignores_input() {
        let analysis = AnalysisResult::from_literal(json!({ "verdict": "defer" })).unwrap();
        let advisor = StaticAdvisor::new("car.static", analysis.clone());
        let a = build_definition(json!({ "title": "A" })).unwrap();
        let b = build_definition(json!({ "title": "B" })).unwrap();
        let config = AdvisorConfig::new();
        assert_eq!(advisor.analyze(&a, &config).unwrap(), analysis);
        assert_eq!(advisor.analyze(&b, &config).unwrap(), analysis);
        assert!(advisor.requirements().is_empty());
    }

    #[test]
    fn fn_advisor_sees_definition_and_config() {
        let advisor = FnAdvisor::new("car.echo", |definition, config| {
            let depth = config
                .option("analysisDepth")
                .ok_or_else(|| NarrativeError::advisor("car.echo", "no depth"))?;
            AnalysisResult::from_literal(json!({
                "fields": definition.fields().len().to_string(),
                "depth": depth,
            }))
        })
        .with_requirements(ConfigRequirements::new().option("analysisDepth"));
        let definition = build_definition(json!({ "a": "1", "b": "2" })).unwrap();
        let config = AdvisorConfig::new().with_option("analysisDepth", "summary");
        let analysis = advisor.analyze(&definition, &config).unwrap();
        assert_eq!(analysis.to_json().unwrap(), json!({ "fields": "2", "depth": "summary" }));
        assert!(advisor.analyze(&definition, &AdvisorConfig::new()).is_err());
        assert_eq!(advisor.requirements().options.len(), 1);
    }
}
