//! attend-core
//!
//! Pure domain types for the ASRS v1.1 screening flow: questionnaire
//! answers, demographic profiles and per-user screening sessions.
//! No HTTP and no I/O; this is the shared vocabulary of the attend system.

pub mod error;
pub mod models;
