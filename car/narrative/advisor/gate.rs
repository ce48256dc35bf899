use std::sync::Arc;

use car_logging::LogLevel;
use serde_json::json;

use crate::{
    advisor::contract::Advisor,
    config::AdvisorConfig,
    error::NarrativeResult,
    telemetry::NarrativeTelemetry,
    tree::{AnalysisResult, ScenarioDefinition},
};

/// Validates configuration against an advisor's requirements, then consults it.
pub struct AdvisorGate {
    advisor: Arc<dyn Advisor>,
    telemetry: Option<NarrativeTelemetry>,
}

impl AdvisorGate {
    /// Wraps `advisor`.
    #[must_use]
    pub fn new(advisor: Arc<dyn Advisor>, telemetry: Option<NarrativeTelemetry>) -> Self {
        Self { advisor, telemetry }
    }

    /// Label of the wrapped advisor.
    #[must_use]
    pub fn label(&self) -> &str {
        self.advisor.label()
    }

    /// Rejects a config that misses or violates a requirement; the advisor is
    /// not called in that case.
    pub fn consult(
        &self,
        definition: &ScenarioDefinition,
        config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult> {
        if let Err(err) = self.advisor.requirements().validate(config) {
            self.log(
                LogLevel::Warn,
                "narrative.advisor.config_rejected",
                json!({ "advisor": self.label(), "reason": err.to_string() }),
            );
            return Err(err.into());
        }
        let analysis = self.advisor.analyze(definition, config)?;
        self.log(
            LogLevel::Debug,
            "narrative.advisor.consulted",
            json!({
                "advisor": self.label(),
                "definition_leaves": definition.leaf_count(),
                "analysis_leaves": analysis.leaf_count(),
            }),
        );
        Ok(analysis)
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}
