//! Signit API service library crate.
//!
//! # Purpose
//! Exposes configuration, router wiring, the authorization middleware, and
//! bootstrap/observability helpers for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the request path: config feeds cors/app wiring,
//! middleware drives the authorization pipeline, bootstrap owns external
//! handles.
pub mod api;
pub mod app;
pub mod bootstrap;
pub mod config;
pub mod cors;
pub mod middleware;
pub mod observability;
