use std::sync::Arc;

use car_narrative::{
    build_definition, Advisor, AdvisorConfig, ExampleScenario, NarrativeResult, NodeKind,
    RenderTemplate, ScenarioDefinition,
};
use serde_json::{json, Value};

use crate::advisors::CarGovernance;

/// Choosing an oversight regime for automated benefits eligibility decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BenefitsOversight;

impl ExampleScenario for BenefitsOversight {
    fn name(&self) -> &str {
        "governance-oversight"
    }

    fn description(&self) -> &str {
        "Public oversight options for automated benefits decisions"
    }

    fn definition(&self) -> NarrativeResult<ScenarioDefinition> {
        build_definition(json!({
            "caseStudy": {
                "title": "Oversight of automated benefits eligibility",
                "background": "A welfare agency automated eligibility checks; appeals doubled within a year",
            },
            "optionSet": {
                "humanReview": {
                    "description": "Caseworker confirms every adverse decision",
                    "costs": ["Slower decisions", "Staffing increase"],
                },
                "algorithmicAudit": {
                    "description": "Independent audit of error rates each quarter",
                    "costs": ["Audit contracts", "Data access agreements"],
                },
                "citizenPanel": {
                    "description": "Rotating panel of claimants reviews policy rules annually",
                    "costs": ["Facilitation", "Participant compensation"],
                },
            },
            "affectedParties": [
                "Claimants, especially those without digital access",
                "Caseworkers",
                "Agency leadership",
                "Legislative oversight committee",
            ],
        }))
    }

    fn config(&self) -> AdvisorConfig {
        CarGovernance::default_config()
            .with_weight("democraticLegitimacy", 0.95)
            .with_option("deliberationMode", "binding")
    }

    fn advisor(&self) -> Arc<dyn Advisor> {
        Arc::new(CarGovernance::with_analysis(oversight_analysis))
    }

    fn template(&self) -> NarrativeResult<RenderTemplate> {
        RenderTemplate::builder()
            .definition("CASE STUDY", "caseStudy.title")
            .definition("Background", "caseStudy.background")
            .definition_as("Options", "optionSet", NodeKind::Map)
            .definition_as("Affected parties", "affectedParties", NodeKind::Sequence)
            .analysis("Option evaluation", "optionEvaluation")
            .analysis_as("Recommended combination", "recommendedCombination", NodeKind::Sequence)
            .analysis("Residual risk", "residualRisk")
            .build()
    }
}

fn oversight_analysis() -> Value {
    json!({
        "optionEvaluation": {
            "humanReview": "Restores individual accountability; risks rubber-stamping at volume",
            "algorithmicAudit": "Finds systematic error; too slow to help individual claimants",
            "citizenPanel": "Adds legitimacy to the rules themselves; no effect on single cases",
        },
        "recommendedCombination": [
            "Human review of adverse decisions for claimants flagged as vulnerable",
            "Quarterly independent audit with published results",
            "Annual citizen panel with authority to propose rule changes",
        ],
        "residualRisk": "Claimants who never appeal remain invisible to every mechanism",
    })
}
