//! Staff authentication
//!
//! Login input is validated locally before anything is sent; a successful
//! login hands the issued credentials to the [`Session`](crate::session::Session).

pub mod ports;
mod service;
mod validation;

pub use ports::AuthPort;
pub use service::AuthService;
pub use validation::{validate_email, validate_login, LoginForm};
