use std::sync::Arc;

use car_narrative::{
    build_definition, Advisor, AdvisorConfig, ExampleScenario, NarrativeResult, NodeKind,
    RenderTemplate, ScenarioDefinition,
};
use serde_json::{json, Value};

use crate::{
    advisors::CarHealthcare,
    schema::{ConsentRecord, Diagnosis, Medication, PatientRecord},
};

/// Reusing routine clinical records to train a diagnostic model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordsSecondaryUse;

/// Representative record attached to the case study.
#[must_use]
pub fn sample_record() -> PatientRecord {
    PatientRecord {
        patient_id: "p-48213".into(),
        age_band: "70-79".into(),
        diagnoses: vec![
            Diagnosis {
                code: "I50.9".into(),
                description: "Heart failure, unspecified".into(),
                recorded_on: "2024-02-19".into(),
                notes: Some("Referred to cardiology".into()),
            },
            Diagnosis {
                code: "N18.3".into(),
                description: "Chronic kidney disease, stage 3".into(),
                recorded_on: "2022-10-03".into(),
                notes: None,
            },
        ],
        medications: vec![Medication {
            name: "furosemide".into(),
            dosage: "40 mg oral".into(),
            frequency: "once daily".into(),
        }],
        allergies: Vec::new(),
        consent: Some(ConsentRecord {
            permitted_uses: vec!["direct care".into(), "service audit".into()],
            refused_uses: vec!["commercial research".into()],
            captured_on: "2021-06-30".into(),
            proxy: None,
        }),
    }
}

impl ExampleScenario for RecordsSecondaryUse {
    fn name(&self) -> &str {
        "healthcare-records"
    }

    fn description(&self) -> &str {
        "Secondary use of patient records to train a diagnostic model"
    }

    fn definition(&self) -> NarrativeResult<ScenarioDefinition> {
        let mut literal = json!({
            "caseStudy": {
                "title": "Training a heart-failure risk model on routine records",
                "proposal": "A vendor offers a free risk model in exchange for five years of de-identified records",
                "dataScope": [
                    "Diagnoses and medications",
                    "Laboratory results",
                    "Free-text discharge summaries",
                ],
            },
            "consentLandscape": {
                "explicitConsent": "Collected for direct care and audit only",
                "gaps": [
                    "No consent captured for commercial model training",
                    "Free text may re-identify patients",
                ],
            },
        });
        literal["sampleRecord"] = sample_record().to_definition()?.to_json()?;
        build_definition(literal)
    }

    fn config(&self) -> AdvisorConfig {
        CarHealthcare::default_config().with_option("analysisDepth", "standard")
    }

    fn advisor(&self) -> Arc<dyn Advisor> {
        Arc::new(CarHealthcare::with_analysis(records_analysis))
    }

    fn template(&self) -> NarrativeResult<RenderTemplate> {
        RenderTemplate::builder()
            .definition("CASE STUDY", "caseStudy.title")
            .definition("Proposal", "caseStudy.proposal")
            .definition_as("Data scope", "caseStudy.dataScope", NodeKind::Sequence)
            .definition("Consent", "consentLandscape")
            .definition_as("Sample record", "sampleRecord", NodeKind::Map)
            .analysis("CONSENT ANALYSIS", "consentAnalysis")
            .analysis_as("Conditions", "conditions", NodeKind::Sequence)
            .analysis("Verdict", "verdict")
            .build()
    }
}

fn records_analysis() -> Value {
    json!({
        "consentAnalysis": {
            "formula": "Using records beyond the consented purpose treats patients as means only",
            "refusals": "A recorded refusal of commercial research is binding, not a default to be weighed",
            "deIdentification": "Reduces harm but does not restore the missing authorization",
        },
        "conditions": [
            "Exclude every record carrying a refusal of commercial research",
            "Remove free-text summaries from the extract",
            "Seek fresh consent through the patient portal for the remaining cohort",
            "Publish the data-sharing agreement",
        ],
        "verdict": "Proceed only under the stated conditions; otherwise decline the offer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::{ExampleRunner, FieldPath};

    #[test]
    fn typed_record_appears_in_definition() {
        let definition = RecordsSecondaryUse.definition().unwrap();
        let path = FieldPath::parse("sampleRecord.consent.refusedUses").unwrap();
        assert_eq!(
            definition.get(&path).and_then(|n| n.as_sequence()),
            Some(&["commercial research".to_string()][..])
        );
    }

    #[test]
    fn renders_record_nested_under_heading() {
        let run = ExampleRunner::default().prepare(&RecordsSecondaryUse).unwrap();
        let lines = run.document.lines();
        let start = lines.iter().position(|l| l == "Sample record").unwrap();
        assert_eq!(lines[start + 1], "patientId: p-48213");
        assert_eq!(lines[start + 2], "ageBand: 70-79");
        assert_eq!(lines[start + 3], "diagnoses:");
        assert_eq!(lines[start + 4], "  diagnosis-1:");
        assert_eq!(lines[start + 5], "    code: I50.9");
        assert!(lines.contains(&"allergies:".to_string()));
        assert!(lines.ends_with(&[
            "Verdict".to_string(),
            "Proceed only under the stated conditions; otherwise decline the offer".to_string(),
        ]));
    }
}
