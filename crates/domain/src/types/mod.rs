//! Domain types and models
//!
//! Wire shapes exchanged with the case-management backend. The backend speaks
//! camelCase JSON; every type here renames accordingly.

pub mod case;
pub mod client_link;
pub mod ds160;
pub mod notification;
pub mod page;
pub mod session;
pub mod stats;
pub mod translation;
pub mod user;

pub use case::{ApplicantSummary, Case, CaseQuery, CaseStatus, CaseUpdate, Diagnosis, DiagnosisIssue, IssueSeverity, NewCase};
pub use client_link::{ClientLink, LinkValidation, UploadedDocument};
pub use ds160::{Ds160Form, Ds160Section, Ds160Status, SectionData, SectionUpdate};
pub use notification::{Notification, UnreadCount};
pub use page::Page;
pub use session::{AuthTokens, CredentialPair, LoginRequest, SessionState, StoredSession};
pub use stats::{ActivityItem, StatisticsOverview};
pub use translation::{TranslationComparison, TranslationField, TranslationStatus};
pub use user::{UserProfile, UserRole};
