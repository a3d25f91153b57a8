//! Session lifecycle
//!
//! [`Session`] is the only holder of the credential pair. Everything that
//! needs a bearer token asks the session; everything that learns the token
//! was rejected hands the rejection back to it.

mod manager;
mod memory;
pub mod ports;

pub use manager::Session;
pub use memory::InMemoryCredentialStore;
pub use ports::{CredentialStore, TokenRefresher};
