//! Managed resource types.

pub mod user;

use neo4j_provider_core::ResourceSchema;

pub use user::{UserConfig, UserResource, UserState};

/// Schemas of every resource this provider serves.
pub fn schemas() -> Vec<ResourceSchema> {
    vec![user::schema()]
}
