// ABOUTME: Client-side view of the managed database cluster.
// ABOUTME: Capability traits, response types and the HTTP implementation.

mod endpoints;
mod error;
mod health;
mod http;
mod traits;
mod version;

pub use endpoints::EndpointConnectionFactory;
pub use error::ClientError;
pub use health::{ClusterHealth, ServerHealth, ServerRole, ServerStatus};
pub use http::HttpDatabaseClient;
pub use traits::{ClusterHandle, ConnectionFactory, DatabaseClient};
pub use version::{Version, VersionInfo};
