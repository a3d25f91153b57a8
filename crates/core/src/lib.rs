//! # Visadesk Core
//!
//! Pure client logic - no HTTP, filesystem or keychain code.
//!
//! This crate contains:
//! - The session state machine and its coalesced token refresh
//! - Port interfaces (traits) for the backend and credential storage
//! - Client-side validation of login, case and DS-160 forms
//! - The applicant form workflow with its draft fallback
//!
//! ## Architecture Principles
//! - Depends only on `visadesk-domain` and `visadesk-common`
//! - All external dependencies via traits
//! - Pure, testable logic

pub mod auth;
pub mod cases;
pub mod forms;
pub mod session;
pub mod validation;

// Read-only ports
pub mod notification_ports;
pub mod statistics_ports;
pub mod translation_ports;

pub use auth::{validate_login, AuthPort, AuthService, LoginForm};
pub use cases::{validate_case_update, validate_new_case, CasesPort};
pub use forms::{
    validate_section, validate_submission, ClientFormPort, ClientFormWorkflow, DraftStore,
    Ds160Port, InMemoryDraftStore, OpenedForm, SaveOutcome,
};
pub use notification_ports::NotificationsPort;
pub use session::{CredentialStore, InMemoryCredentialStore, Session, TokenRefresher};
pub use statistics_ports::StatisticsPort;
pub use translation_ports::TranslationPort;
pub use validation::IntoDomainError;
