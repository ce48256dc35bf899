use std::sync::Arc;

use car_narrative::{
    build_definition, Advisor, AdvisorConfig, ExampleScenario, NarrativeResult, NodeKind,
    RenderTemplate, ScenarioDefinition,
};
use serde_json::{json, Value};

use crate::advisors::CarGovernance;

/// What a city may claim to know when it acts on algorithmic policy advice.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEpistemology;

impl ExampleScenario for PolicyEpistemology {
    fn name(&self) -> &str {
        "governance-epistemology"
    }

    fn description(&self) -> &str {
        "Epistemic standards for acting on algorithmic policy advice"
    }

    fn definition(&self) -> NarrativeResult<ScenarioDefinition> {
        build_definition(json!({
            "framework": {
                "title": "Governance epistemology for algorithmic advice",
                "question": "When does a model forecast justify a binding policy decision?",
            },
            "context": {
                "jurisdiction": "Mid-sized city council",
                "domain": "Allocation of housing inspection resources",
                "adviceSource": "Risk model ranking buildings by predicted code violations",
            },
            "claims": [
                "The model predicts violations better than complaint-driven inspection",
                "Inspection capacity is the binding constraint",
                "Ranked inspection will reduce harm to tenants",
            ],
            "stakeholders": [
                "Tenants in older housing stock",
                "Landlords subject to inspection",
                "Inspectors",
                "Council members accountable to voters",
            ],
        }))
    }

    fn config(&self) -> AdvisorConfig {
        CarGovernance::default_config()
    }

    fn advisor(&self) -> Arc<dyn Advisor> {
        Arc::new(CarGovernance::with_analysis(epistemology_analysis))
    }

    fn template(&self) -> NarrativeResult<RenderTemplate> {
        RenderTemplate::builder()
            .definition("FRAMEWORK", "framework.title")
            .definition("Question", "framework.question")
            .definition_as("Context", "context", NodeKind::Map)
            .definition_as("Claims under review", "claims", NodeKind::Sequence)
            .definition_as("Stakeholders", "stakeholders", NodeKind::Sequence)
            .analysis_as(
                "Knowledge types",
                "governanceEpistemologyFramework.knowledgeTypes",
                NodeKind::Map,
            )
            .analysis_as(
                "Justification thresholds",
                "governanceEpistemologyFramework.justificationThresholds",
                NodeKind::Sequence,
            )
            .analysis("Claim assessment", "claimAssessment")
            .analysis("Conclusion", "conclusion")
            .build()
    }
}

fn epistemology_analysis() -> Value {
    json!({
        "governanceEpistemologyFramework": {
            "knowledgeTypes": {
                "empirical": "Past inspection outcomes; reliable only for building types already inspected",
                "predictive": "Model rankings; probabilistic and sensitive to reporting bias",
                "normative": "Which harms matter most; not something the model can supply",
                "experiential": "Tenant and inspector testimony about conditions the data miss",
            },
            "justificationThresholds": [
                "Advisory use requires validated predictive accuracy on local data",
                "Binding use additionally requires an audit of error rates across neighbourhoods",
                "Normative trade-offs must be decided by accountable officials, not inferred",
            ],
        },
        "claimAssessment": {
            "betterPrediction": "Supported by a retrospective back-test; no prospective evidence yet",
            "capacityConstraint": "Well established from staffing records",
            "harmReduction": "Plausible but unverified; depends on inspection follow-through",
        },
        "conclusion": "Adopt the ranking in advisory mode with a twelve-month prospective evaluation",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::{ExampleRunner, FieldFault, NarrativeError, Renderer};

    #[test]
    fn renders_knowledge_types_from_analysis() {
        let run = ExampleRunner::default().prepare(&PolicyEpistemology).unwrap();
        let lines = run.document.lines();
        let start = lines.iter().position(|l| l == "Knowledge types").unwrap();
        assert!(lines[start + 1].starts_with("empirical: "));
        assert!(lines[start + 4].starts_with("experiential: "));
        assert_eq!(lines[start + 5], "Justification thresholds");
    }

    #[test]
    fn missing_knowledge_types_is_a_contract_error() {
        let mut literal = epistemology_analysis();
        literal["governanceEpistemologyFramework"]
            .as_object_mut()
            .unwrap()
            .remove("knowledgeTypes");
        let analysis = car_narrative::AnalysisResult::from_literal(literal).unwrap();
        let definition = PolicyEpistemology.definition().unwrap();
        let err = Renderer::default()
            .render(
                &PolicyEpistemology.template().unwrap(),
                &definition,
                Some(&analysis),
            )
            .unwrap_err();
        assert!(matches!(err, NarrativeError::AdvisorContract(FieldFault::Missing(_))));
        assert!(err
            .to_string()
            .ends_with("missing field: governanceEpistemologyFramework.knowledgeTypes"));
    }
}
