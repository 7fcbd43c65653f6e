//! Wire-format DTOs for both services.
//!
//! This is the single normalization point: snake-case field names, optional
//! fields, the `explanation` fallback, and the legacy
//! `documents_required` -> `checklist` resolution all happen here, once,
//! during conversion into domain types.

use serde::Deserialize;

use marg_types::{ServiceRecord, Step};

use crate::assistant::GuideResponse;

const FALLBACK_EXPLANATION: &str = "Here is the information.";
const FALLBACK_LINK: &str = "#";

#[derive(Debug, Deserialize)]
pub(crate) struct StepWire {
    step_id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    action_label: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl StepWire {
    fn into_step(self) -> Step {
        Step {
            id: self.step_id,
            title: self.title,
            description: self.description,
            action_label: self.action_label,
            link: self.link,
            details: self.details,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GuideResponseWire {
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    steps: Vec<StepWire>,
    #[serde(default)]
    checklist: Vec<String>,
    #[serde(default)]
    official_link: Option<String>,
}

impl GuideResponseWire {
    pub(crate) fn into_response(self) -> GuideResponse {
        let explanation = match self.explanation {
            Some(text) if !text.trim().is_empty() => text,
            _ => FALLBACK_EXPLANATION.to_string(),
        };
        GuideResponse {
            explanation,
            name: self.name,
            steps: self.steps.into_iter().map(StepWire::into_step).collect(),
            checklist: self.checklist,
            official_link: self.official_link.unwrap_or_else(|| FALLBACK_LINK.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceRecordWire {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    official_link: String,
    #[serde(default)]
    steps: Vec<StepWire>,
    #[serde(default)]
    checklist: Option<Vec<String>>,
    /// Legacy field name still present in older catalog records.
    #[serde(default)]
    documents_required: Option<Vec<String>>,
    #[serde(default)]
    legal_disclaimer: String,
}

impl ServiceRecordWire {
    pub(crate) fn into_record(self) -> ServiceRecord {
        let checklist = self
            .checklist
            .or(self.documents_required)
            .unwrap_or_default();
        ServiceRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            version: self.version,
            last_updated: self.last_updated,
            official_link: self.official_link,
            steps: self.steps.into_iter().map(StepWire::into_step).collect(),
            checklist,
            legal_disclaimer: self.legal_disclaimer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GuideResponseWire, ServiceRecordWire};

    #[test]
    fn guide_wire_maps_step_ids_and_defaults() {
        let wire: GuideResponseWire = serde_json::from_str(
            r#"{
                "explanation": "Two steps.",
                "steps": [
                    {"step_id": 1, "title": "First", "description": "Do it"},
                    {"step_id": 7, "title": "Last", "description": "Finish", "details": "Tip"}
                ],
                "checklist": ["Photo"]
            }"#,
        )
        .unwrap();
        let response = wire.into_response();
        assert_eq!(response.steps[1].id, 7);
        assert_eq!(response.steps[1].details.as_deref(), Some("Tip"));
        assert_eq!(response.official_link, "#");
    }

    #[test]
    fn blank_explanation_gets_the_fallback() {
        let wire: GuideResponseWire =
            serde_json::from_str(r#"{"explanation": "  ", "steps": []}"#).unwrap();
        assert_eq!(wire.into_response().explanation, "Here is the information.");
    }

    #[test]
    fn record_prefers_checklist_over_legacy_field() {
        let wire: ServiceRecordWire = serde_json::from_str(
            r#"{
                "id": "pan",
                "checklist": ["New proof"],
                "documents_required": ["Old proof"]
            }"#,
        )
        .unwrap();
        assert_eq!(wire.into_record().checklist, vec!["New proof"]);
    }

    #[test]
    fn record_falls_back_to_documents_required() {
        let wire: ServiceRecordWire =
            serde_json::from_str(r#"{"id": "pan", "documents_required": ["Old proof"]}"#).unwrap();
        assert_eq!(wire.into_record().checklist, vec!["Old proof"]);
    }

    #[test]
    fn record_with_neither_field_gets_an_empty_checklist() {
        let wire: ServiceRecordWire = serde_json::from_str(r#"{"id": "pan"}"#).unwrap();
        assert!(wire.into_record().checklist.is_empty());
    }
}
