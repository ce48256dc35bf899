//! Patient record shapes used by the records examples.
//!
//! Every field is textual so records convert losslessly into scenario trees.

use car_narrative::{NarrativeResult, ScenarioDefinition};
use serde::{Deserialize, Serialize};

/// Coded diagnosis entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// ICD-10 code.
    pub code: String,
    /// Clinical description.
    pub description: String,
    /// Date recorded (ISO 8601).
    pub recorded_on: String,
    /// Clinician notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Active prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Generic name.
    pub name: String,
    /// Dose and route, free text.
    pub dosage: String,
    /// Administration frequency.
    pub frequency: String,
}

/// Patient consent to uses of their data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// Uses the patient agreed to.
    pub permitted_uses: Vec<String>,
    /// Uses the patient refused.
    pub refused_uses: Vec<String>,
    /// Date consent was captured (ISO 8601).
    pub captured_on: String,
    /// Who may revoke or amend consent, when not the patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

/// Medical record of one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Pseudonymous identifier.
    pub patient_id: String,
    /// Age band rather than date of birth.
    pub age_band: String,
    /// Diagnoses, most recent first.
    pub diagnoses: Vec<Diagnosis>,
    /// Active medications.
    pub medications: Vec<Medication>,
    /// Known allergies.
    pub allergies: Vec<String>,
    /// Consent on file, if captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent: Option<ConsentRecord>,
}

impl PatientRecord {
    /// Converts the record into a definition fragment.
    ///
    /// Lists of records become maps keyed by position (`diagnosis-1`, ...),
    /// since tree sequences only hold strings.
    pub fn to_definition(&self) -> NarrativeResult<ScenarioDefinition> {
        let mut value = serde_json::to_value(self)?;
        if let Some(fields) = value.as_object_mut() {
            for (field, prefix) in [("diagnoses", "diagnosis"), ("medications", "medication")] {
                if let Some(serde_json::Value::Array(items)) = fields.get_mut(field) {
                    let keyed: serde_json::Map<String, serde_json::Value> = items
                        .drain(..)
                        .enumerate()
                        .map(|(idx, item)| (format!("{prefix}-{}", idx + 1), item))
                        .collect();
                    fields.insert(field.to_string(), serde_json::Value::Object(keyed));
                }
            }
        }
        ScenarioDefinition::from_literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_narrative::{FieldPath, NodeKind};

    fn record() -> PatientRecord {
        PatientRecord {
            patient_id: "p-0192".into(),
            age_band: "60-69".into(),
            diagnoses: vec![Diagnosis {
                code: "E11.9".into(),
                description: "Type 2 diabetes mellitus without complications".into(),
                recorded_on: "2023-04-11".into(),
                notes: None,
            }],
            medications: vec![Medication {
                name: "metformin".into(),
                dosage: "500 mg oral".into(),
                frequency: "twice daily".into(),
            }],
            allergies: vec!["penicillin".into()],
            consent: None,
        }
    }

    #[test]
    fn converts_nested_lists_to_keyed_maps() {
        let definition = record().to_definition().unwrap();
        let path = FieldPath::parse("diagnoses.diagnosis-1.code").unwrap();
        assert_eq!(
            definition.get(&path).and_then(|n| n.as_scalar()),
            Some("E11.9")
        );
        let notes = FieldPath::parse("diagnoses.diagnosis-1.notes").unwrap();
        assert!(definition.get(&notes).is_none());
        let allergies = FieldPath::parse("allergies").unwrap();
        assert_eq!(definition.get(&allergies).unwrap().kind(), NodeKind::Sequence);
        assert!(definition.get(&FieldPath::parse("consent").unwrap()).is_none());
    }

    #[test]
    fn keeps_declared_field_order() {
        let definition = record().to_definition().unwrap();
        let keys: Vec<&str> = definition.fields().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["patientId", "ageBand", "diagnoses", "medications", "allergies"]
        );
    }
}
