//! Core traits: row mapping and the session capability used by resources.

use async_trait::async_trait;
use neo4rs::{BoltType as Value, Row as Record};

use crate::error::ProviderError;
use crate::statement::Statement;

/// Maps a `neo4rs::Row` into a Rust struct by column name.
///
/// # Example
///
/// ```rust
/// use neo4j_provider_core::{record, FromRow, ProviderError};
///
/// struct NameRow {
///     name: String,
/// }
///
/// impl FromRow for NameRow {
///     fn from_row(row: &neo4rs::Row) -> Result<Self, ProviderError> {
///         Ok(Self {
///             name: record::required(row, "name", "NameRow")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Deserialize a [`Row`](neo4rs::Row) into `Self`.
    fn from_row(row: &Record) -> Result<Self, ProviderError>;
}

/// Converts a single `neo4rs::BoltType` value into a Rust type.
///
/// This is the core conversion primitive used by [`FromRow`] impls and by
/// [`Statement::param_str`].
pub trait FromBoltValue: Sized {
    /// Convert a [`BoltType`](neo4rs::BoltType) into `Self`.
    fn from_value(value: Value) -> Result<Self, ProviderError>;
}

/// Access mode requested when opening a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// A short-lived unit of work bound to one statement sequence.
///
/// A session is owned by exactly one lifecycle call. Callers must call
/// [`close`](Session::close) on every exit path and drop it afterwards.
#[async_trait]
pub trait Session: Send {
    /// Run a statement and collect every row it returns.
    async fn run(&mut self, statement: Statement) -> Result<Vec<Record>, ProviderError>;

    /// Release the session.
    async fn close(&mut self);
}

/// Opens [`Session`]s against a shared, long-lived client handle.
///
/// Implementations must be safe to share between concurrent lifecycle calls.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open_session(&self, mode: AccessMode) -> Result<Box<dyn Session>, ProviderError>;
}
