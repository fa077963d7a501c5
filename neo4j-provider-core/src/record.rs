//! Centralized row access for Neo4j query results.
//!
//! These functions isolate the `neo4rs::Row` API to a single location so
//! that [`FromRow`](crate::traits::FromRow) impls only depend on this module.

use neo4rs::{BoltType as Value, Row as Record};

use crate::error::ProviderError;
use crate::traits::FromBoltValue;

/// Read a value from a [`Row`](neo4rs::Row) by column name.
///
/// Returns `None` if the column does not exist in the row.
pub fn get_value(record: &Record, key: &str) -> Option<Value> {
    record.get(key).ok()
}

/// Read and convert a required column.
///
/// `struct_name` only feeds error messages.
pub fn required<T: FromBoltValue>(
    record: &Record,
    key: &str,
    struct_name: &str,
) -> Result<T, ProviderError> {
    let v = get_value(record, key).ok_or_else(|| ProviderError::missing_field(key, struct_name))?;
    T::from_value(v).map_err(|e| e.with_context(format!("{struct_name}::{key}")))
}

/// Read and convert a column that may be absent or `null`.
pub fn optional<T: FromBoltValue>(
    record: &Record,
    key: &str,
    struct_name: &str,
) -> Result<Option<T>, ProviderError> {
    match get_value(record, key) {
        None => Ok(None),
        Some(v) => Option::<T>::from_value(v)
            .map_err(|e| e.with_context(format!("{struct_name}::{key}"))),
    }
}
