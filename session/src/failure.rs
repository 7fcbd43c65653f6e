//! User-visible formatting for failed queries.

use marg_gateway::GatewayError;

/// Warning marker prefixed to every error turn.
const FAILURE_MARKER: char = '\u{26a0}';

/// Why a submitted query never produced a normal reply.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryFailure {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The bounded request timeout elapsed before the assistant answered.
    #[error("the assistant took too long to respond")]
    TimedOut,
}

/// One assistant text turn carrying the warning marker and the failure
/// message. Kept deliberately close to a chat reply: the transcript stays
/// usable and nothing else changes.
pub(crate) fn failure_turn_text(failure: &QueryFailure) -> String {
    format!("{FAILURE_MARKER} Error: {failure}. Please try again.")
}

#[cfg(test)]
mod tests {
    use super::{QueryFailure, failure_turn_text};
    use marg_gateway::GatewayError;

    #[test]
    fn api_failure_keeps_the_service_message() {
        let failure = QueryFailure::Gateway(GatewayError::Api {
            status: 400,
            message: "GUARDRAIL ALERT: Request refused.".to_string(),
        });
        assert_eq!(
            failure_turn_text(&failure),
            "\u{26a0} Error: GUARDRAIL ALERT: Request refused.. Please try again."
        );
    }

    #[test]
    fn timeout_reads_as_a_plain_sentence() {
        let text = failure_turn_text(&QueryFailure::TimedOut);
        assert!(text.contains("took too long"));
    }
}
