//! Error types and diagnostics for the provider.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for every provider operation.
///
/// Lifecycle calls never retry or downgrade these: each one aborts the
/// current call and is handed back to the orchestrator as a [`Diagnostic`].
///
/// Context can be layered on with [`with_context`](ProviderError::with_context),
/// producing chained messages like:
///
/// ```text
/// neo4j_user.create: database error: connection reset
/// ```
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Configuration rejected before anything reached the database.
    #[error("invalid value for '{path}': {message}")]
    Validation { path: String, message: String },

    /// The driver handle could not be constructed.
    #[error("failed to create new driver: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A statement failed to execute. Never means "record absent".
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store acknowledged a write but a follow-up read could not observe it.
    #[error(
        "user {username} was created, but {rows} matching rows were returned by neo4j. consistency error suspected"
    )]
    Consistency { username: String, rows: usize },

    /// Provider configuration could not be extracted.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The orchestrator asked for a resource type this provider does not serve.
    #[error("unknown resource type '{0}'")]
    UnknownResource(String),

    /// A lifecycle call arrived before `configure`.
    #[error("provider is not configured")]
    NotConfigured,

    /// A required column was not found in a `neo4rs::Row`.
    #[error("missing field '{field}' on {struct_name}")]
    MissingField { field: String, struct_name: String },

    /// A `BoltType` variant did not match the expected Rust type.
    #[error("type mismatch: expected {expected}, got {got} ({context})")]
    TypeMismatch {
        expected: String,
        got: String,
        context: String,
    },

    /// Wraps an inner error with additional context (resource, operation, statement).
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<ProviderError>,
    },
}

impl ProviderError {
    /// Create a [`Validation`](ProviderError::Validation) error for `path`.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a [`Connection`](ProviderError::Connection) error.
    pub fn connection(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ProviderError::Connection(err.into())
    }

    /// Create a [`Database`](ProviderError::Database) error.
    ///
    /// ```rust
    /// # use neo4j_provider_core::ProviderError;
    /// let err = ProviderError::database("connection reset");
    /// assert!(err.is_database());
    /// ```
    pub fn database(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ProviderError::Database(err.into())
    }

    /// Create a [`TypeMismatch`](ProviderError::TypeMismatch) error.
    pub fn type_mismatch(expected: &str, got: &str, context: &str) -> Self {
        ProviderError::TypeMismatch {
            expected: expected.to_owned(),
            got: got.to_owned(),
            context: context.to_owned(),
        }
    }

    /// Create a [`MissingField`](ProviderError::MissingField) error.
    pub fn missing_field(field: &str, struct_name: &str) -> Self {
        ProviderError::MissingField {
            field: field.to_owned(),
            struct_name: struct_name.to_owned(),
        }
    }

    /// Wrap this error with additional context, producing a [`Context`](ProviderError::Context) variant.
    ///
    /// ```rust
    /// # use neo4j_provider_core::ProviderError;
    /// let err = ProviderError::database("timeout");
    /// let wrapped = err.with_context("neo4j_user.read");
    /// assert!(wrapped.to_string().starts_with("neo4j_user.read: "));
    /// assert!(wrapped.is_database());
    /// ```
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        ProviderError::Context {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error once all [`Context`](ProviderError::Context) layers are peeled off.
    pub fn root(&self) -> &ProviderError {
        match self {
            ProviderError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), ProviderError::Validation { .. })
    }

    pub fn is_database(&self) -> bool {
        matches!(self.root(), ProviderError::Database(_))
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self.root(), ProviderError::Consistency { .. })
    }

    /// Attribute the error points at, if any.
    pub fn attribute_path(&self) -> Option<&str> {
        match self.root() {
            ProviderError::Validation { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Render this error as an orchestrator diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let summary = match self.root() {
            ProviderError::Validation { .. } => "Invalid attribute value",
            ProviderError::Connection(_) => "Unable to create neo4j driver",
            ProviderError::Database(_) => "Neo4j statement failed",
            ProviderError::Consistency { .. } => "Neo4j consistency error",
            ProviderError::Config(_) => "Invalid provider configuration",
            ProviderError::UnknownResource(_) => "Unknown resource type",
            ProviderError::NotConfigured => "Provider not configured",
            ProviderError::MissingField { .. } | ProviderError::TypeMismatch { .. } => {
                "Unexpected result from neo4j"
            }
            ProviderError::Context { .. } => "Provider error",
        };
        Diagnostic {
            severity: Severity::Error,
            summary: summary.to_owned(),
            detail: self.to_string(),
            attribute_path: self.attribute_path().map(str::to_owned),
        }
    }
}

impl From<neo4rs::Error> for ProviderError {
    fn from(err: neo4rs::Error) -> Self {
        ProviderError::Database(Box::new(err))
    }
}

impl From<figment::Error> for ProviderError {
    fn from(err: figment::Error) -> Self {
        ProviderError::Config(Box::new(err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// A single problem reported back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<String>,
}

impl From<ProviderError> for Diagnostic {
    fn from(err: ProviderError) -> Self {
        err.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_layers_are_transparent_to_predicates() {
        let err = ProviderError::validation("neo4j_user.username", "must not be blank")
            .with_context("neo4j_user")
            .with_context("create");
        assert!(err.is_validation());
        assert_eq!(err.attribute_path(), Some("neo4j_user.username"));
        assert_eq!(
            err.to_string(),
            "create: neo4j_user: invalid value for 'neo4j_user.username': must not be blank"
        );
    }

    #[test]
    fn consistency_diagnostic_has_no_attribute_path() {
        let diag = ProviderError::Consistency {
            username: "alice".into(),
            rows: 0,
        }
        .to_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.summary, "Neo4j consistency error");
        assert!(diag.detail.contains("alice"));
        assert!(diag.attribute_path.is_none());
    }
}
