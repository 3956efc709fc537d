//! Shared types and models for the Rekod Pejabat records system
//!
//! This crate contains the authorization model and the list query pipeline
//! shared between the backend, the browser client (via WASM), and tests.

pub mod models;
pub mod query;
pub mod summary;
pub mod types;
pub mod validation;

pub use models::*;
pub use query::*;
pub use summary::*;
pub use types::*;
pub use validation::*;
