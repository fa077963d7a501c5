//! Value conversion from `neo4rs::BoltType` into Rust types.
//!
//! Only the shapes that administration commands return are covered:
//! strings, booleans, integers, lists and nullable columns.

use crate::error::ProviderError;
use crate::traits::FromBoltValue;

/// Returns a human-readable name for a [`neo4rs::BoltType`] variant.
///
/// Used in error messages to describe the actual type received when a
/// conversion fails.
pub fn type_name(v: &neo4rs::BoltType) -> &'static str {
    match v {
        neo4rs::BoltType::Null(_) => "Null",
        neo4rs::BoltType::Boolean(_) => "Boolean",
        neo4rs::BoltType::Integer(_) => "Integer",
        neo4rs::BoltType::Float(_) => "Float",
        neo4rs::BoltType::String(_) => "String",
        neo4rs::BoltType::Bytes(_) => "Bytes",
        neo4rs::BoltType::List(_) => "List",
        neo4rs::BoltType::Map(_) => "Map",
        neo4rs::BoltType::Node(_) => "Node",
        neo4rs::BoltType::Relation(_) => "Relationship",
        neo4rs::BoltType::UnboundedRelation(_) => "UnboundedRelationship",
        neo4rs::BoltType::Path(_) => "Path",
        neo4rs::BoltType::Point2D(_) => "Point2D",
        neo4rs::BoltType::Point3D(_) => "Point3D",
        neo4rs::BoltType::Duration(_) => "Duration",
        neo4rs::BoltType::Date(_) => "Date",
        neo4rs::BoltType::Time(_) => "Time",
        neo4rs::BoltType::LocalTime(_) => "LocalTime",
        neo4rs::BoltType::LocalDateTime(_) => "LocalDateTime",
        neo4rs::BoltType::DateTime(_) => "DateTime",
        neo4rs::BoltType::DateTimeZoneId(_) => "DateTimeZoneId",
    }
}

impl FromBoltValue for String {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, ProviderError> {
        match value {
            neo4rs::BoltType::String(s) => Ok(s.value),
            other => Err(ProviderError::type_mismatch("String", type_name(&other), "String")),
        }
    }
}

impl FromBoltValue for bool {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, ProviderError> {
        match value {
            neo4rs::BoltType::Boolean(b) => Ok(b.value),
            other => Err(ProviderError::type_mismatch("Boolean", type_name(&other), "bool")),
        }
    }
}

impl<T: FromBoltValue> FromBoltValue for Vec<T> {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, ProviderError> {
        match value {
            neo4rs::BoltType::List(xs) => xs.value.into_iter().map(T::from_value).collect(),
            other => Err(ProviderError::type_mismatch("List", type_name(&other), "Vec<T>")),
        }
    }
}

/// Present but `null` maps to `None`; anything else must convert to `T`.
///
/// Columns that only exist on some server editions (e.g. `suspended`) are
/// handled one level up, in [`FromRow`](crate::traits::FromRow) impls, by
/// treating a missing key as `None` too.
impl<T: FromBoltValue> FromBoltValue for Option<T> {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, ProviderError> {
        match value {
            neo4rs::BoltType::Null(_) => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}
