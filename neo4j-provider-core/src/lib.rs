//! Core types for the Neo4j provider: errors, configuration, schemas,
//! statements, row mapping and the session capability traits.
//!
//! This crate is not meant to be used directly. Use the
//! `terraform-provider-neo4j` crate instead, which re-exports what you need.

pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod statement;
pub mod traits;
pub mod value;

pub use config::{ConnectionConfig, ExplicitConfig};
pub use error::{Diagnostic, ProviderError, Severity};
pub use schema::{ProviderSchema, ResourceSchema, Schema};
pub use statement::Statement;
pub use traits::{AccessMode, FromBoltValue, FromRow, Session, SessionFactory};
