//! Parameterized Cypher statements.

use std::fmt;

use neo4rs::BoltType as Value;

use crate::error::ProviderError;
use crate::traits::FromBoltValue;

/// A Cypher statement plus its bound parameters.
///
/// Values are always sent as parameters, never spliced into the text, so
/// user-controlled names cannot change the shape of the statement.
///
/// ```rust
/// # use neo4j_provider_core::Statement;
/// let stmt = Statement::new("SHOW USERS WHERE user = $user").param("user", "alice");
/// assert_eq!(stmt.text(), "SHOW USERS WHERE user = $user");
/// assert_eq!(stmt.param_str("user").as_deref(), Some("alice"));
/// ```
#[derive(Clone)]
pub struct Statement {
    text: String,
    params: Vec<(String, Value)>,
}

impl Statement {
    /// Create a new statement from a Cypher string.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Bind a named parameter. Accepts any type that converts to `BoltType`.
    ///
    /// Binding the same key twice replaces the earlier value.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Read a bound parameter back as a string, if it is one.
    pub fn param_str(&self, key: &str) -> Option<String> {
        self.get_param(key)
            .cloned()
            .and_then(|v| String::from_value(v).ok())
    }

    /// Check that every `$name` placeholder in the text has a bound value.
    pub fn check_bound(&self) -> Result<(), ProviderError> {
        for name in placeholders(&self.text) {
            if self.get_param(name).is_none() {
                return Err(ProviderError::validation(
                    format!("${name}"),
                    format!("parameter is not bound in `{}`", self.text),
                ));
            }
        }
        Ok(())
    }

    /// Convert into a driver query.
    pub fn into_query(self) -> neo4rs::Query {
        let mut query = neo4rs::query(&self.text);
        for (k, v) in self.params {
            query = query.param(&k, v);
        }
        query
    }
}

fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    text.split('$').skip(1).filter_map(|rest| {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    })
}

// Parameter values stay out of Debug output; passwords travel through here.
impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("text", &self.text)
            .field("params", &self.params.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}
