use crate::{
    config::{AdvisorConfig, ConfigRequirements},
    error::NarrativeResult,
    tree::{AnalysisResult, ScenarioDefinition},
};

/// Opaque collaborator that turns a scenario definition into an analysis tree.
///
/// Implementations are not trusted to validate their own configuration:
/// callers check [`Advisor::requirements`] before [`Advisor::analyze`].
pub trait Advisor: Send + Sync {
    /// Advisor label used in errors and telemetry.
    fn label(&self) -> &str;

    /// Configuration the advisor relies on.
    fn requirements(&self) -> ConfigRequirements {
        ConfigRequirements::default()
    }

    /// Produces the analysis for `definition`.
    fn analyze(
        &self,
        definition: &ScenarioDefinition,
        config: &AdvisorConfig,
    ) -> NarrativeResult<AnalysisResult>;
}
