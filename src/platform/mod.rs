// ABOUTME: Capability traits for the container orchestration platform.
// ABOUTME: Pod and secret operations the actions and verification helpers need.

mod error;
mod pods;
mod secrets;

pub use error::PlatformError;
pub(crate) use error::ignore_not_found;
pub use pods::{PodOps, PodState};
pub use secrets::{Secret, SecretOps};
