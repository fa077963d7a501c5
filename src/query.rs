use neo4j_provider_core::traits::{FromRow, Session};
use neo4j_provider_core::{ProviderError, Statement};
use neo4rs::BoltType as Value;

/// A typed query wrapper around [`Statement`].
///
/// Provides a builder-style `.param()` API and typed fetch helpers that
/// run on a borrowed [`Session`] and map rows via [`FromRow`].
///
/// # Examples
///
/// ```rust
/// # use terraform_provider_neo4j::query::CypherQuery;
/// let query = CypherQuery::new("SHOW USERS WHERE user = $user").param("user", "alice");
/// assert_eq!(query.statement().param_str("user").as_deref(), Some("alice"));
/// ```
pub struct CypherQuery {
    inner: Statement,
}

impl CypherQuery {
    /// Create a new query from a Cypher string.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            inner: Statement::new(query),
        }
    }

    /// Bind a named parameter. Accepts any type that converts to `BoltType`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner = self.inner.param(key, value);
        self
    }

    pub fn statement(&self) -> &Statement {
        &self.inner
    }

    /// Run for side effects only, discarding any rows.
    pub async fn execute(self, session: &mut dyn Session) -> Result<(), ProviderError> {
        self.inner.check_bound()?;
        session.run(self.inner).await?;
        Ok(())
    }

    /// Run and collect all rows into `Vec<T>`.
    pub async fn fetch_all<T: FromRow>(
        self,
        session: &mut dyn Session,
    ) -> Result<Vec<T>, ProviderError> {
        self.inner.check_bound()?;
        let rows = session.run(self.inner).await?;
        rows.iter().map(T::from_row).collect()
    }
}

/// Convenience constructor, equivalent to [`CypherQuery::new`].
pub fn query(q: impl Into<String>) -> CypherQuery {
    CypherQuery::new(q)
}
