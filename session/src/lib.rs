//! Session/state engine for marg.
//!
//! This crate owns everything with real state and ordering logic:
//!
//! - [`Transcript`] - the append-only chat turn log
//! - [`ChatSession`] - single-flight query discipline over the transcript,
//!   with a bounded timeout and an abortable in-flight request
//! - [`Router`] - page routing plus the catalog page states
//! - [`App`] - the one composition of the above owned by the binary
//!
//! The engine never talks HTTP itself; it drives the gateway traits from
//! `marg-gateway`, so tests run against scripted fakes.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};
use tokio::sync::mpsc;

use marg_gateway::{AssistantGateway, GuideResponse};
use marg_types::{QueryText, WizardSession};

mod app;
mod failure;
pub mod routes;
pub mod transcript;

pub use app::App;
pub use failure::QueryFailure;
pub use routes::{DetailPage, Route, Router, ServiceView, ServicesPage};
pub use transcript::Transcript;

/// What became of one `submit_query` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request is in flight; a reply or failure turn will follow.
    Submitted,
    /// Input was blank after trimming; nothing was appended.
    IgnoredBlank,
    /// Another request is already in flight; rejected outright, not queued.
    RejectedBusy,
}

/// Single-flight request state.
///
/// ```text
/// ┌──────┐ submit_query  ┌───────────────────┐
/// │ Idle │ ────────────> │ AwaitingReply     │ ──┐ submit_query
/// └──────┘               │ (seq, abort)      │ <─┘ rejected
///     ^                  └───────────────────┘
///     │ reply settles / times out / aborted        │
///     └───────────────────────────────────────────┘
/// ```
#[derive(Debug)]
enum RequestState {
    Idle,
    AwaitingReply { seq: u64, abort_handle: AbortHandle },
}

#[derive(Debug)]
struct ReplyEvent {
    seq: u64,
    outcome: Result<GuideResponse, QueryFailure>,
}

/// The chat session: transcript plus the single in-flight assistant request.
///
/// Turns are appended strictly in issuance order. Because at most one query
/// is ever in flight, reply turns cannot race each other; a second submit
/// while one is pending is rejected, not buffered.
pub struct ChatSession {
    transcript: Transcript,
    state: RequestState,
    gateway: Arc<dyn AssistantGateway>,
    request_timeout: Duration,
    next_seq: u64,
    reply_tx: mpsc::UnboundedSender<ReplyEvent>,
    reply_rx: mpsc::UnboundedReceiver<ReplyEvent>,
}

impl ChatSession {
    #[must_use]
    pub fn new(gateway: Arc<dyn AssistantGateway>, request_timeout: Duration) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            transcript: Transcript::new(),
            state: RequestState::Idle,
            gateway,
            request_timeout,
            next_seq: 0,
            reply_tx,
            reply_rx,
        }
    }

    /// Seed the opening assistant turn shown in a fresh session.
    #[must_use]
    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.transcript.push_assistant_text(greeting);
        self
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.state, RequestState::AwaitingReply { .. })
    }

    /// Submit a free-text query.
    ///
    /// Blank input is dropped silently; a busy session rejects the call with
    /// the transcript unchanged. Otherwise the user turn is appended and the
    /// gateway call starts, bounded by the configured timeout.
    pub fn submit_query(&mut self, text: &str) -> SubmitOutcome {
        let Ok(query) = QueryText::new(text) else {
            tracing::debug!("Dropping blank query");
            return SubmitOutcome::IgnoredBlank;
        };
        if self.is_awaiting_reply() {
            tracing::debug!("Rejecting query while another is in flight");
            return SubmitOutcome::RejectedBusy;
        }

        self.transcript.push_user(query.clone());

        self.next_seq += 1;
        let seq = self.next_seq;
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let gateway = Arc::clone(&self.gateway);
        let timeout = self.request_timeout;
        let tx = self.reply_tx.clone();

        tokio::spawn(Abortable::new(
            async move {
                let outcome = match tokio::time::timeout(timeout, gateway.query(&query)).await {
                    Ok(result) => result.map_err(QueryFailure::from),
                    Err(_) => Err(QueryFailure::TimedOut),
                };
                // The session may already be gone; nothing to do then.
                let _ = tx.send(ReplyEvent { seq, outcome });
            },
            abort_registration,
        ));

        self.state = RequestState::AwaitingReply { seq, abort_handle };
        SubmitOutcome::Submitted
    }

    /// Drain settled replies into the transcript.
    ///
    /// Called from the UI event loop each frame. Replies from aborted
    /// requests carry a stale sequence number and are dropped.
    pub fn process_reply_events(&mut self) {
        while let Ok(event) = self.reply_rx.try_recv() {
            let RequestState::AwaitingReply { seq, .. } = &self.state else {
                tracing::debug!(seq = event.seq, "Dropping reply with no request awaiting");
                continue;
            };
            if event.seq != *seq {
                tracing::debug!(seq = event.seq, "Dropping stale reply");
                continue;
            }

            self.state = RequestState::Idle;
            match event.outcome {
                Ok(response) => {
                    tracing::info!(
                        steps = response.steps.len(),
                        "Assistant reply settled"
                    );
                    self.transcript.apply_reply(&response);
                }
                Err(failure) => {
                    tracing::warn!(%failure, "Assistant query failed");
                    self.transcript.apply_failure(&failure);
                }
            }
        }
    }

    /// Abort the in-flight request, if any. An aborted request appends
    /// nothing; the session is immediately ready for new input.
    pub fn abort_in_flight(&mut self) {
        if let RequestState::AwaitingReply { abort_handle, .. } = &self.state {
            tracing::debug!("Aborting in-flight assistant request");
            abort_handle.abort();
            self.state = RequestState::Idle;
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

/// Shared wizard navigation used by both the chat transcript and the
/// catalog detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardCommand {
    Next,
    Prev,
    ToggleChecklist(usize),
}

impl WizardCommand {
    pub fn apply(self, wizard: &mut WizardSession) {
        match self {
            WizardCommand::Next => wizard.go_next(),
            WizardCommand::Prev => wizard.go_prev(),
            WizardCommand::ToggleChecklist(index) => wizard.toggle_checklist_item(index),
        }
    }
}
