// ABOUTME: Type-safe identifiers and small domain enums.
// ABOUTME: Uses phantom types to keep action and member IDs apart.

mod id;
mod mode;
mod server_group;

pub use id::{ActionId, Id, MemberId};
pub use mode::DeploymentMode;
pub use server_group::ServerGroup;
