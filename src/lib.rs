//! NextOne LMS backend
//!
//! HTTP backend of a learning management system: password and LinkedIn accounts, an
//! email-code two-factor challenge, and one generic MongoDB aggregation search shared by
//! every learning entity (categories, competencies, skills, courses, roadmaps, job
//! profiles, questions, students, users).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │     Routes      │ ← scopes, auth middleware, error envelope
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← validation, (de)serialization
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← auth, two-factor, mail, search
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore, aggregation runner
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │
//! └─────────────────┘
//! ```
//!
//! The aggregation pipelines themselves are built in [`query`], independent of any
//! connection, so they are tested as plain BSON documents.

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod query;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
