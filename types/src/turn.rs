//! Chat transcript turns.
//!
//! A turn is a real sum type: text or an embedded wizard, never a role tag
//! with sometimes-meaningful fields. Turns are immutable once appended; the
//! one sanctioned mutation is a wizard body's own session state, reached
//! through [`Turn::wizard_mut`].

use crate::query::QueryText;
use crate::wizard::WizardSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug)]
pub enum TurnBody {
    Text(String),
    Wizard(WizardSession),
}

#[derive(Debug)]
pub struct Turn {
    role: Role,
    body: TurnBody,
}

impl Turn {
    /// User text turns only exist for proven non-blank input.
    #[must_use]
    pub fn user_text(text: QueryText) -> Self {
        Self {
            role: Role::User,
            body: TurnBody::Text(text.into_inner()),
        }
    }

    #[must_use]
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            body: TurnBody::Text(text.into()),
        }
    }

    /// Wizards are always bound to an assistant reply or a catalog visit.
    #[must_use]
    pub fn assistant_wizard(session: WizardSession) -> Self {
        Self {
            role: Role::Assistant,
            body: TurnBody::Wizard(session),
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn body(&self) -> &TurnBody {
        &self.body
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            TurnBody::Text(text) => Some(text),
            TurnBody::Wizard(_) => None,
        }
    }

    #[must_use]
    pub fn wizard(&self) -> Option<&WizardSession> {
        match &self.body {
            TurnBody::Wizard(session) => Some(session),
            TurnBody::Text(_) => None,
        }
    }

    #[must_use]
    pub fn wizard_mut(&mut self) -> Option<&mut WizardSession> {
        match &mut self.body {
            TurnBody::Wizard(session) => Some(session),
            TurnBody::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_wizard(&self) -> bool {
        matches!(self.body, TurnBody::Wizard(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, Turn};
    use crate::query::QueryText;
    use crate::wizard::{Step, WizardSession, WizardSpec};

    #[test]
    fn user_turn_keeps_text() {
        let turn = Turn::user_text(QueryText::new("apply for passport").unwrap());
        assert_eq!(turn.role(), Role::User);
        assert_eq!(turn.text(), Some("apply for passport"));
        assert!(turn.wizard().is_none());
    }

    #[test]
    fn wizard_turn_is_an_assistant_turn() {
        let spec = WizardSpec::new(
            Some("PAN".to_string()),
            vec![Step {
                id: 1,
                title: "Fill form".to_string(),
                description: String::new(),
                action_label: None,
                link: None,
                details: None,
            }],
            vec![],
            String::new(),
        )
        .unwrap();
        let turn = Turn::assistant_wizard(WizardSession::new(spec));
        assert_eq!(turn.role(), Role::Assistant);
        assert!(turn.is_wizard());
        assert!(turn.text().is_none());
    }
}
