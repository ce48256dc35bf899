use std::sync::Arc;

use car_narrative::{
    build_definition, Advisor, AdvisorConfig, ExampleScenario, NarrativeResult, NodeKind,
    RenderTemplate, ScenarioDefinition,
};
use serde_json::{json, Value};

use crate::advisors::CarHealthcare;

/// Allocating scarce ventilators during a respiratory surge.
#[derive(Debug, Clone, Copy, Default)]
pub struct VentilatorTriage;

impl ExampleScenario for VentilatorTriage {
    fn name(&self) -> &str {
        "healthcare-triage"
    }

    fn description(&self) -> &str {
        "ICU ventilator allocation when demand exceeds supply"
    }

    fn definition(&self) -> NarrativeResult<ScenarioDefinition> {
        build_definition(json!({
            "caseStudy": {
                "title": "Ventilator allocation during a respiratory surge",
                "setting": "Regional hospital ICU, 14 ventilators, 23 patients meeting criteria",
                "decisionPoint": "Whether an algorithmic survival score may rank patients for ventilation",
                "timeline": [
                    "Day 1: surge protocol activated",
                    "Day 3: all ventilators in use, four patients waiting",
                    "Day 4: triage committee asked to adopt the scoring tool",
                ],
            },
            "stakeholders": [
                "Patients awaiting ventilation and their families",
                "ICU clinicians carrying out allocation decisions",
                "Triage committee",
                "Disability advocates concerned about scoring bias",
                "Hospital administration",
            ],
            "options": {
                "firstComeFirstServed": "Allocate in order of arrival until supply is exhausted",
                "clinicalScore": "Rank by the survival score, reassessed every 48 hours",
                "lottery": "Random allocation among patients above a clinical threshold",
                "hybrid": "Score-based bands with a lottery inside each band",
            },
            "ethicalFactors": {
                "dignity": "Each patient is an end in themselves, never merely a means to aggregate survival",
                "universalizability": "Would the allocation rule be accepted by anyone who might become a patient?",
                "constraints": [
                    "No exclusion on disability, age, or social worth alone",
                    "Decisions must be explainable to patients and families",
                    "Reassessment must be periodic and transparent",
                ],
            },
        }))
    }

    fn config(&self) -> AdvisorConfig {
        CarHealthcare::default_config()
    }

    fn advisor(&self) -> Arc<dyn Advisor> {
        Arc::new(CarHealthcare::with_analysis(triage_analysis))
    }

    fn template(&self) -> NarrativeResult<RenderTemplate> {
        RenderTemplate::builder()
            .definition("CASE STUDY", "caseStudy.title")
            .definition("Setting", "caseStudy.setting")
            .definition("Decision point", "caseStudy.decisionPoint")
            .definition_as("Timeline", "caseStudy.timeline", NodeKind::Sequence)
            .definition_as("Stakeholders", "stakeholders", NodeKind::Sequence)
            .definition_as("Options", "options", NodeKind::Map)
            .definition("Ethical factors", "ethicalFactors")
            .analysis("CATEGORICAL ASSESSMENT", "categoricalAssessment")
            .analysis_as("Limits of reason", "limitsOfReason", NodeKind::Sequence)
            .analysis("Recommendation", "recommendation.summary")
            .analysis_as("Safeguards", "recommendation.safeguards", NodeKind::Sequence)
            .build()
    }
}

fn triage_analysis() -> Value {
    json!({
        "categoricalAssessment": {
            "firstComeFirstServed": "Formally impartial but arbitrary with respect to need",
            "clinicalScore": "Permissible only if the score measures short-term survival, not long-term worth",
            "lottery": "Respects equal standing but ignores benefit entirely",
            "hybrid": "Best reconciles equal dignity with the duty to save lives where possible",
        },
        "limitsOfReason": [
            "Survival scores are estimates, not knowledge of outcomes",
            "Training data under-represent patients with chronic disability",
            "No rule removes the tragic character of the choice",
        ],
        "recommendation": {
            "summary": "Adopt the hybrid rule with human review of every score-based exclusion",
            "safeguards": [
                "Publish the scoring criteria before use",
                "Audit allocation outcomes by disability status weekly",
                "Give families a named clinician to explain each decision",
            ],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::ExampleRunner;

    #[test]
    fn renders_case_and_recommendation() {
        let run = ExampleRunner::default().prepare(&VentilatorTriage).unwrap();
        let lines = run.document.lines();
        assert_eq!(lines[0], "CASE STUDY");
        assert_eq!(lines[1], "Ventilator allocation during a respiratory surge");
        assert!(lines.contains(
            &"lottery: Random allocation among patients above a clinical threshold".to_string()
        ));
        assert!(lines.contains(&"constraints:".to_string()));
        assert!(lines.contains(&"  - Reassessment must be periodic and transparent".to_string()));
        assert_eq!(run.document.sections(), 11);
        assert_eq!(run.advisor, "car.healthcare");
    }
}
