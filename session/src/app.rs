//! Top-level application state: the one composition of chat session and
//! router owned by the binary.

use std::sync::Arc;
use std::time::Duration;

use marg_gateway::{AssistantGateway, GuidanceCatalog};

use crate::routes::{Route, Router};
use crate::{ChatSession, SubmitOutcome};

const GREETING: &str = "Hello! I am marg. I can guide you through services like PAN, Aadhaar, and Voter ID.\n\nAsk \"Apply for PAN\" to see a step-by-step guide, or press Ctrl+S to browse services.";

pub struct App {
    chat: ChatSession,
    router: Router,
    authenticated: bool,
}

impl App {
    #[must_use]
    pub fn new(
        assistant: Arc<dyn AssistantGateway>,
        catalog: Arc<dyn GuidanceCatalog>,
        request_timeout: Duration,
        authenticated: bool,
    ) -> Self {
        Self {
            chat: ChatSession::new(assistant, request_timeout).with_greeting(GREETING),
            router: Router::new(catalog, request_timeout),
            authenticated,
        }
    }

    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    #[must_use]
    pub fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.router.route()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn submit_query(&mut self, text: &str) -> SubmitOutcome {
        self.chat.submit_query(text)
    }

    /// Leave the chat for the services listing. Navigating away tears the
    /// in-flight assistant request down; the transcript itself stays.
    pub fn open_services(&mut self) {
        self.chat.abort_in_flight();
        self.router.open_services();
    }

    /// Drain settled work from both drivers. Called once per frame.
    pub fn process_events(&mut self) {
        self.chat.process_reply_events();
        self.router.process_catalog_events();
    }

    /// Abort everything in flight. Called on quit.
    pub fn teardown(&mut self) {
        self.chat.abort_in_flight();
        self.router.abort_all();
    }
}
