//! HTTP API handlers and shared response types.
pub mod error;
pub mod secured;
pub mod system;
pub mod types;
