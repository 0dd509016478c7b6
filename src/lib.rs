// ABOUTME: Library root for arangodeploy - plan execution for managed ArangoDB deployments.
// ABOUTME: The CLI binary is in main.rs.

pub mod api;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod platform;
pub mod reconcile;
pub mod retry;
pub mod store;
pub mod types;
pub mod verify;
