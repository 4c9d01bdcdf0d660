//! Middlewares
//!
//! - [`auth_middleware`] - bearer token authentication, optionally with a role check
//! - [`error_envelope`] - uniform JSON body for every error response
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(error_envelope())
//!     .service(
//!         web::scope("/users")
//!             .wrap(AuthMiddleware::required())
//!             .service(handlers::users::me),
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;
pub mod error_envelope;

pub use auth_middleware::AuthMiddleware;
pub use error_envelope::error_envelope;
