//! Application-wide error handling.
//!
//! [`AppError`] is the single error type returned by services, repositories and handlers.
//! It implements [`actix_web::ResponseError`], and the error envelope middleware
//! (`middlewares::error_envelope`) turns every error response into an [`ErrorBody`].

pub mod errors;

pub use errors::*;
