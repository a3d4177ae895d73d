//! # breachlab-server
//!
//! The deliberately vulnerable web application behind `breachlab serve`.
//!
//! Every endpoint demonstrates one canonical web-application weakness:
//! - `/greet`: server-side template injection
//! - `/user/{id}`: SQL injection through string-built queries
//! - `/upload`: path traversal through unsanitized filenames
//! - `/session/*`: insecure deserialization of a client-held cookie
//! - `/command`: shell command injection
//!
//! The sinks are the point. Nothing here validates, escapes, or
//! parameterizes unless the page copy says so, and every caught fault is
//! rendered straight back to the caller. DO NOT deploy outside a lab.
//!
//! ## Tech Stack
//!
//! - Axum for HTTP, one SQLite connection per request via sqlx
//! - Pages rendered as `format!` HTML, static assets via `rust-embed`
//! - minijinja compiles the greeting sink's caller-tainted template source

pub mod assets;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod pages;
pub mod routes;
pub mod server;
pub mod sinks;
pub mod state;
pub mod templates;

pub use config::LabConfig;
pub use error::ServerError;
pub use server::LabServer;
