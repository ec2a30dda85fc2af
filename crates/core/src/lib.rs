//! `stockcast-core`: shared building blocks for the forecasting engine.
//!
//! This crate contains **pure** primitives (no IO, no logging setup): calendar
//! months, category codes, session identifiers and the engine configuration.

pub mod config;
pub mod error;
pub mod id;
pub mod month;

pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use id::{CategoryCode, SessionId};
pub use month::Month;
