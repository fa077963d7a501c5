//! Convenience re-exports for embedding the provider.
//!
//! ```rust
//! use terraform_provider_neo4j::prelude::*;
//! ```

pub use crate::connection::{connect, Neo4jSessions};
pub use crate::provider::{ConfiguredProvider, Lifecycle, Provider};
pub use crate::query::{query, CypherQuery};
pub use crate::resource::{UserConfig, UserResource, UserState};
pub use crate::serve::{serve, Server};
pub use neo4j_provider_core::traits::{AccessMode, FromRow, Session, SessionFactory};
pub use neo4j_provider_core::{ConnectionConfig, Diagnostic, ProviderError, Statement};
