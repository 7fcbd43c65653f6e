//! Catalog entities: service summaries and full service records.

use serde::Deserialize;

use crate::wizard::{EmptyStepsError, Step, WizardSpec};

/// One row of the catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
}

/// A full catalog entry. The checklist field is already normalized here -
/// the legacy `documents_required` fallback is resolved at the wire boundary
/// and never consulted again.
#[derive(Debug, Clone)]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub last_updated: String,
    pub official_link: String,
    pub steps: Vec<Step>,
    pub checklist: Vec<String>,
    pub legal_disclaimer: String,
}

impl ServiceRecord {
    /// Build the wizard content for a direct catalog visit.
    ///
    /// Fails only for records with no steps, which cannot seed a wizard.
    pub fn wizard_spec(&self) -> Result<WizardSpec, EmptyStepsError> {
        WizardSpec::new(
            Some(self.name.clone()),
            self.steps.clone(),
            self.checklist.clone(),
            self.official_link.clone(),
        )
    }
}
