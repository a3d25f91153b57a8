//! Case management

pub mod ports;
mod validation;

pub use ports::CasesPort;
pub use validation::{validate_case_update, validate_new_case};
