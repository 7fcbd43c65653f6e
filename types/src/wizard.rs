//! Wizard steps, specs, and the interactive session over them.
//!
//! A [`WizardSpec`] is the immutable guide content (ordered steps plus a
//! document checklist). A [`WizardSession`] layers the mutable cursor and
//! check-state on top and is the only way either ever changes.

use std::collections::BTreeSet;

use thiserror::Error;

/// One ordered unit of a wizard.
///
/// Step ids are unique but not required to be contiguous; navigation is
/// positional and never id-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub action_label: Option<String>,
    pub link: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Error)]
#[error("a wizard needs at least one step")]
pub struct EmptyStepsError;

/// Immutable content of one procedural guide.
#[derive(Debug, Clone)]
pub struct WizardSpec {
    name: Option<String>,
    steps: Vec<Step>,
    checklist: Vec<String>,
    official_link: String,
}

impl WizardSpec {
    /// Steps must be non-empty; a guide with nothing to do is not a guide.
    pub fn new(
        name: Option<String>,
        steps: Vec<Step>,
        checklist: Vec<String>,
        official_link: String,
    ) -> Result<Self, EmptyStepsError> {
        if steps.is_empty() {
            return Err(EmptyStepsError);
        }
        Ok(Self {
            name,
            steps,
            checklist,
            official_link,
        })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn checklist(&self) -> &[String] {
        &self.checklist
    }

    #[must_use]
    pub fn official_link(&self) -> &str {
        &self.official_link
    }
}

/// Interactive state over one [`WizardSpec`].
///
/// # State machine
///
/// ```text
/// states:      0 ..= steps.len() - 1        (cursor position)
/// transitions: go_next / go_prev            (clamped at both ends)
/// initial:     0
/// ```
///
/// The last index is a display state only ("Finish" label); navigation stays
/// bidirectional and no transition ever fails - out-of-range requests are
/// silently clamped.
#[derive(Debug)]
pub struct WizardSession {
    spec: WizardSpec,
    current_step: usize,
    checked: BTreeSet<usize>,
}

impl WizardSession {
    #[must_use]
    pub fn new(spec: WizardSpec) -> Self {
        Self {
            spec,
            current_step: 0,
            checked: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> &WizardSpec {
        &self.spec
    }

    #[must_use]
    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn current_step(&self) -> &Step {
        // Index is in bounds by construction: steps are non-empty and the
        // cursor only moves through clamped transitions.
        &self.spec.steps()[self.current_step]
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.spec.steps().len()
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.step_count()
    }

    pub fn go_next(&mut self) {
        if !self.is_last_step() {
            self.current_step += 1;
        }
    }

    pub fn go_prev(&mut self) {
        self.current_step = self.current_step.saturating_sub(1);
    }

    /// Flip one checklist item; out-of-range indices are ignored.
    pub fn toggle_checklist_item(&mut self, index: usize) {
        if index >= self.spec.checklist().len() {
            return;
        }
        if !self.checked.remove(&index) {
            self.checked.insert(index);
        }
    }

    #[must_use]
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    #[must_use]
    pub fn step_progress_percent(&self) -> u8 {
        let total = self.step_count();
        percent(self.current_step + 1, total)
    }

    /// Checklist completion. An empty checklist reports 0, never NaN.
    #[must_use]
    pub fn checklist_progress_percent(&self) -> u8 {
        let total = self.spec.checklist().len();
        if total == 0 {
            return 0;
        }
        percent(self.checked_count(), total)
    }
}

fn percent(part: usize, total: usize) -> u8 {
    ((part as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::{Step, WizardSession, WizardSpec};

    fn step(id: i64, title: &str) -> Step {
        Step {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            action_label: None,
            link: None,
            details: None,
        }
    }

    fn session_with(steps: Vec<Step>, checklist: Vec<String>) -> WizardSession {
        let spec = WizardSpec::new(None, steps, checklist, "https://example.gov.in".to_string())
            .expect("test spec has steps");
        WizardSession::new(spec)
    }

    fn three_step_session() -> WizardSession {
        session_with(
            vec![step(1, "Fill form"), step(2, "Upload"), step(5, "Pay fee")],
            vec!["Photo".to_string(), "Address proof".to_string()],
        )
    }

    #[test]
    fn spec_rejects_empty_steps() {
        assert!(WizardSpec::new(None, vec![], vec![], String::new()).is_err());
    }

    #[test]
    fn prev_at_start_is_a_no_op() {
        let mut session = three_step_session();
        session.go_prev();
        assert_eq!(session.current_step_index(), 0);
    }

    #[test]
    fn next_clamps_at_last_step() {
        let mut session = three_step_session();
        for _ in 0..5 {
            session.go_next();
        }
        assert_eq!(session.current_step_index(), 2);
        assert!(session.is_last_step());

        // Still bidirectional after hitting the end.
        session.go_prev();
        assert_eq!(session.current_step_index(), 1);
    }

    #[test]
    fn non_contiguous_step_ids_are_preserved() {
        let mut session = three_step_session();
        session.go_next();
        session.go_next();
        assert_eq!(session.current_step().id, 5);
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut session = three_step_session();
        assert!(!session.is_checked(1));
        session.toggle_checklist_item(1);
        assert!(session.is_checked(1));
        session.toggle_checklist_item(1);
        assert!(!session.is_checked(1));
    }

    #[test]
    fn toggle_out_of_range_is_ignored() {
        let mut session = three_step_session();
        session.toggle_checklist_item(99);
        assert_eq!(session.checked_count(), 0);
    }

    #[test]
    fn step_progress_rounds() {
        let mut session = three_step_session();
        assert_eq!(session.step_progress_percent(), 33);
        session.go_next();
        assert_eq!(session.step_progress_percent(), 67);
        session.go_next();
        assert_eq!(session.step_progress_percent(), 100);
    }

    #[test]
    fn checklist_progress_half_checked() {
        let mut session = three_step_session();
        session.toggle_checklist_item(0);
        assert_eq!(session.checklist_progress_percent(), 50);
    }

    #[test]
    fn empty_checklist_progress_is_zero() {
        let session = session_with(vec![step(1, "Only step")], vec![]);
        assert_eq!(session.checklist_progress_percent(), 0);
    }
}
