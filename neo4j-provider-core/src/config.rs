//! Provider connection configuration.
//!
//! Every attribute resolves in the same order: the explicit value from the
//! provider block, then the matching `NEO4J_*` environment variable, then
//! the built-in default.

use std::collections::BTreeMap;
use std::fmt;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::schema::validate_not_blank;

/// Prefix of the environment variables that back the provider block.
pub const ENV_PREFIX: &str = "NEO4J_";

/// Identifies this provider to the server and in logs.
pub const USER_AGENT: &str = "terraform-provider-neo4j";

/// Administration commands run against the system database.
pub const DEFAULT_DATABASE: &str = "system";

/// Settings read from the environment as written, never parsed into numbers,
/// booleans or arrays.
const STRING_KEYS: [&str; 5] = ["connection_uri", "username", "password", "realm", "database"];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub connection_uri: String,
    pub username: String,
    pub password: String,
    pub realm: String,
    pub database: String,
    pub max_connections: Option<usize>,
    #[serde(skip, default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    USER_AGENT.to_owned()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_uri: String::new(),
            username: String::new(),
            password: String::new(),
            realm: String::new(),
            database: DEFAULT_DATABASE.to_owned(),
            max_connections: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Values set explicitly in the provider block. Unset fields fall through
/// to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplicitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<usize>,
}

impl ConnectionConfig {
    /// Layer defaults, the `NEO4J_*` environment and explicit values.
    pub fn figment(explicit: &ExplicitConfig) -> Figment {
        Figment::from(Serialized::defaults(ConnectionConfig::default()))
            .merge(Serialized::defaults(raw_env_strings()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["max_connections"]))
            .merge(Serialized::defaults(explicit))
    }

    /// Resolve and validate the configuration.
    ///
    /// Fails with a validation error when the resolved `connection_uri` is blank.
    pub fn resolve(explicit: &ExplicitConfig) -> Result<Self, ProviderError> {
        let config: ConnectionConfig = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        validate_not_blank(&self.connection_uri, "connection_uri")?;
        if self.max_connections == Some(0) {
            return Err(ProviderError::validation(
                "max_connections",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// `Env` parses values like `123` or `true` into typed values, which would
/// then fail to extract as strings. Passwords in particular must survive
/// byte for byte.
fn raw_env_strings() -> BTreeMap<String, String> {
    Env::prefixed(ENV_PREFIX)
        .only(&STRING_KEYS)
        .iter()
        .map(|(key, value)| (key.as_str().to_owned(), value))
        .collect()
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("connection_uri", &self.connection_uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("realm", &self.realm)
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_fills_unset_attributes() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_USERNAME", "neo4j");
            jail.set_env("NEO4J_PASSWORD", "from-env");

            let config = ConnectionConfig::resolve(&ExplicitConfig::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.connection_uri, "neo4j://env:7687");
            assert_eq!(config.username, "neo4j");
            assert_eq!(config.password, "from-env");
            assert_eq!(config.realm, "");
            assert_eq!(config.database, DEFAULT_DATABASE);
            assert_eq!(config.user_agent, USER_AGENT);
            Ok(())
        });
    }

    #[test]
    fn explicit_value_wins_over_env() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_REALM", "ldap");

            let explicit = ExplicitConfig {
                connection_uri: Some("neo4j://explicit:7687".into()),
                ..Default::default()
            };
            let config = ConnectionConfig::resolve(&explicit).map_err(|e| e.to_string())?;
            assert_eq!(config.connection_uri, "neo4j://explicit:7687");
            assert_eq!(config.realm, "ldap");
            Ok(())
        });
    }

    #[test]
    fn blank_uri_is_a_validation_error() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "   ");
            let err = ConnectionConfig::resolve(&ExplicitConfig::default()).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.attribute_path(), Some("connection_uri"));
            Ok(())
        });
    }

    #[test]
    fn numeric_looking_password_stays_a_string() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_PASSWORD", "123456789012345");
            jail.set_env("NEO4J_USERNAME", "true");

            let config = ConnectionConfig::resolve(&ExplicitConfig::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.password, "123456789012345");
            assert_eq!(config.username, "true");
            Ok(())
        });
    }

    #[test]
    fn env_strings_are_taken_verbatim() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_PASSWORD", "true");
            jail.set_env("NEO4J_REALM", "1.10");
            jail.set_env("NEO4J_DATABASE", "[system]");

            let config = ConnectionConfig::resolve(&ExplicitConfig::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.password, "true");
            assert_eq!(config.realm, "1.10");
            assert_eq!(config.database, "[system]");
            Ok(())
        });
    }

    #[test]
    fn max_connections_is_parsed_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_MAX_CONNECTIONS", "8");

            let config = ConnectionConfig::resolve(&ExplicitConfig::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.max_connections, Some(8));
            Ok(())
        });
    }

    #[test]
    fn zero_max_connections_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("NEO4J_CONNECTION_URI", "neo4j://env:7687");
            jail.set_env("NEO4J_MAX_CONNECTIONS", "0");

            let err = ConnectionConfig::resolve(&ExplicitConfig::default()).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.attribute_path(), Some("max_connections"));
            Ok(())
        });
    }

    #[test]
    fn debug_redacts_password() {
        let config = ConnectionConfig {
            password: "s3cret".into(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
