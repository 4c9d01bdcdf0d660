//! Authentication services
//!
//! - [`token_service`] - JWT issuing and verification
//! - [`two_factor_service`] - the email code challenge
//! - [`auth_service`] - password login, signup and LinkedIn find-or-create
//! - [`password`] - bcrypt helpers shared by the above

pub mod auth_service;
pub mod password;
pub mod token_service;
pub mod two_factor_service;

pub use auth_service::*;
pub use token_service::*;
pub use two_factor_service::*;
