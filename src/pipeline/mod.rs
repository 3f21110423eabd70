//! Session orchestration: configuration, validation, caching and the runner.

pub mod cache;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod validation;
