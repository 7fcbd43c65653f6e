//! Core domain types for marg.
//!
//! Everything here is plain data with validated constructors: transcript
//! turns, wizard steps and sessions, catalog records, and the `QueryText`
//! proof type. No IO, no async - the gateway and session crates build on
//! top of these.

pub mod catalog;
pub mod query;
pub mod turn;
pub mod wizard;

pub use catalog::{ServiceRecord, ServiceSummary};
pub use query::{BlankQueryError, QueryText};
pub use turn::{Role, Turn, TurnBody};
pub use wizard::{EmptyStepsError, Step, WizardSession, WizardSpec};
