//! Append-only chat transcript.
//!
//! Turns are only ever pushed; nothing removes or reorders them. A failed
//! query appends an error turn and leaves every prior turn untouched.

use marg_gateway::GuideResponse;
use marg_types::{QueryText, Turn, WizardSession};

use crate::failure::{QueryFailure, failure_turn_text};

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, query: QueryText) {
        self.turns.push(Turn::user_text(query));
    }

    pub fn push_assistant_text(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant_text(text));
    }

    /// Apply a settled assistant reply: one text turn, plus one wizard turn
    /// when the reply carries steps. A reply without steps stays text-only.
    pub fn apply_reply(&mut self, response: &GuideResponse) {
        self.push_assistant_text(response.explanation.clone());
        if let Some(spec) = response.wizard_spec() {
            self.turns.push(Turn::assistant_wizard(WizardSession::new(spec)));
        }
    }

    /// Apply a failed query as a single user-visible error turn.
    pub fn apply_failure(&mut self, failure: &QueryFailure) {
        self.push_assistant_text(failure_turn_text(failure));
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Index of the most recently appended wizard turn, if any.
    #[must_use]
    pub fn last_wizard_index(&self) -> Option<usize> {
        self.turns.iter().rposition(Turn::is_wizard)
    }

    #[must_use]
    pub fn wizard_mut(&mut self, index: usize) -> Option<&mut WizardSession> {
        self.turns.get_mut(index).and_then(Turn::wizard_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::Transcript;
    use crate::failure::QueryFailure;
    use marg_gateway::{GatewayError, GuideResponse};
    use marg_types::{QueryText, Role, Step, Turn};

    fn reply(step_count: usize) -> GuideResponse {
        GuideResponse {
            explanation: "Here is how.".to_string(),
            name: Some("PAN Card".to_string()),
            steps: (0..step_count)
                .map(|i| Step {
                    id: i as i64 + 1,
                    title: format!("Step {}", i + 1),
                    description: String::new(),
                    action_label: None,
                    link: None,
                    details: None,
                })
                .collect(),
            checklist: vec!["Photo".to_string()],
            official_link: "#".to_string(),
        }
    }

    #[test]
    fn turns_appear_in_issuance_order() {
        let mut transcript = Transcript::new();
        transcript.push_assistant_text("Hello!");
        transcript.push_user(QueryText::new("apply for PAN").unwrap());
        transcript.apply_reply(&reply(2));

        let roles: Vec<_> = transcript.turns().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            vec![Role::Assistant, Role::User, Role::Assistant, Role::Assistant]
        );
        assert_eq!(transcript.last_wizard_index(), Some(3));
    }

    #[test]
    fn reply_with_steps_appends_text_then_wizard() {
        let mut transcript = Transcript::new();
        transcript.apply_reply(&reply(3));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].text(), Some("Here is how."));
        let wizard = transcript.turns()[1].wizard().expect("wizard turn");
        assert_eq!(wizard.step_count(), 3);
    }

    #[test]
    fn reply_without_steps_appends_exactly_one_text_turn() {
        let mut transcript = Transcript::new();
        transcript.apply_reply(&reply(0));

        assert_eq!(transcript.len(), 1);
        assert!(!transcript.turns()[0].is_wizard());
        assert_eq!(transcript.last_wizard_index(), None);
    }

    #[test]
    fn failure_appends_one_marked_turn_and_keeps_prior_turns() {
        let mut transcript = Transcript::new();
        transcript.push_user(QueryText::new("apply for PAN").unwrap());
        transcript.apply_failure(&QueryFailure::Gateway(GatewayError::Api {
            status: 503,
            message: "upstream busy".to_string(),
        }));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.turns()[0].text(), Some("apply for PAN"));
        let error_text = transcript.turns()[1].text().unwrap();
        assert!(error_text.starts_with('\u{26a0}'));
        assert!(error_text.contains("upstream busy"));
    }

    #[test]
    fn wizard_mut_reaches_the_embedded_session() {
        let mut transcript = Transcript::new();
        transcript.apply_reply(&reply(2));
        let index = transcript.last_wizard_index().unwrap();

        transcript.wizard_mut(index).unwrap().go_next();
        assert_eq!(
            transcript.turns()[index].wizard().unwrap().current_step_index(),
            1
        );
    }
}
