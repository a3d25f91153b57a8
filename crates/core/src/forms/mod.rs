//! DS-160 forms
//!
//! Step validation shared by the staff and applicant flows, the draft store
//! used when the backend cannot be reached, and the applicant workflow that
//! ties them to the client-link endpoints.

mod drafts;
mod ds160;
pub mod ports;
mod workflow;

pub use drafts::{DraftStore, InMemoryDraftStore};
pub use ds160::{validate_section, validate_section_on, validate_submission};
pub use ports::{ClientFormPort, Ds160Port};
pub use workflow::{ClientFormWorkflow, OpenedForm, SaveOutcome};
