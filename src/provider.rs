//! Provider wiring: schema, configuration and lifecycle dispatch.

use std::sync::Arc;

use neo4j_provider_core::schema::{Attribute, ProviderSchema, Schema, Validator};
use neo4j_provider_core::traits::SessionFactory;
use neo4j_provider_core::{ConnectionConfig, ExplicitConfig, ProviderError};
use serde::Serialize;
use serde_json::Value as Json;
use tracing::{info, instrument};

use crate::connection::connect;
use crate::resource::{self, user, UserConfig, UserResource, UserState};

/// One lifecycle call the orchestrator can make against a resource.
///
/// There is no update: the only user-settable attribute forces replacement.
#[derive(Debug, Clone)]
pub enum Lifecycle {
    Create(UserConfig),
    Read(UserState),
    Delete(UserState),
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Lifecycle::Create(_) => "create",
            Lifecycle::Read(_) => "read",
            Lifecycle::Delete(_) => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    pub name: &'static str,
    pub schema_available: bool,
    pub importable: bool,
}

fn provider_schema() -> ProviderSchema {
    ProviderSchema {
        provider: Schema::new()
            .with_attribute(Attribute::optional_string("username").env_default("NEO4J_USERNAME"))
            .with_attribute(
                Attribute::optional_string("password")
                    .env_default("NEO4J_PASSWORD")
                    .sensitive(),
            )
            .with_attribute(Attribute::optional_string("realm").env_default("NEO4J_REALM"))
            .with_attribute(
                Attribute::required_string("connection_uri")
                    .env_default("NEO4J_CONNECTION_URI")
                    .validator(Validator::NotBlank),
            )
            .with_attribute(
                Attribute::optional_string("database")
                    .env_default("NEO4J_DATABASE")
                    .description("Database administration commands run against. Defaults to `system`."),
            )
            .with_attribute(
                Attribute::optional_number("max_connections")
                    .env_default("NEO4J_MAX_CONNECTIONS")
                    .validator(Validator::AtLeastOne),
            ),
        resources: resource::schemas(),
    }
}

/// The provider before `configure` has been called.
pub struct Provider {
    schema: ProviderSchema,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    pub fn new() -> Self {
        Self {
            schema: provider_schema(),
        }
    }

    pub fn schema(&self) -> &ProviderSchema {
        &self.schema
    }

    pub fn internal_validate(&self) -> Result<(), ProviderError> {
        self.schema.internal_validate()
    }

    pub fn resources(&self) -> Vec<ResourceInfo> {
        self.schema
            .resources
            .iter()
            .map(|r| ResourceInfo {
                name: r.name,
                schema_available: !r.schema.attributes.is_empty(),
                importable: r.importable,
            })
            .collect()
    }

    pub fn validate_provider_config(&self, config: &Json) -> Result<(), ProviderError> {
        self.schema.provider.validate("", config)
    }

    pub fn validate_resource_config(&self, type_name: &str, config: &Json) -> Result<(), ProviderError> {
        let resource = self
            .schema
            .resource(type_name)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_owned()))?;
        resource.schema.validate(type_name, config)
    }

    /// Resolve the connection settings and build the shared driver handle.
    #[instrument(skip_all)]
    pub async fn configure(&self, config: &Json) -> Result<ConfiguredProvider, ProviderError> {
        self.validate_provider_config(config)?;
        let explicit: ExplicitConfig = match config {
            Json::Null => ExplicitConfig::default(),
            other => serde_json::from_value(other.clone())
                .map_err(|e| ProviderError::validation("provider", e.to_string()))?,
        };
        let resolved = ConnectionConfig::resolve(&explicit)?;
        let sessions = connect(&resolved).await?;
        info!(uri = %resolved.connection_uri, "provider configured");
        Ok(ConfiguredProvider::new(Arc::new(sessions)))
    }
}

/// A provider holding a live client handle, ready for lifecycle calls.
#[derive(Clone)]
pub struct ConfiguredProvider {
    users: UserResource,
}

impl ConfiguredProvider {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            users: UserResource::new(sessions),
        }
    }

    /// Run one lifecycle call.
    ///
    /// Returns the new state, or `None` when the resource is absent
    /// afterwards (deleted, or found missing by a read).
    #[instrument(skip(self, op), fields(op = op.name()))]
    pub async fn apply(&self, type_name: &str, op: Lifecycle) -> Result<Option<UserState>, ProviderError> {
        if type_name != user::TYPE_NAME {
            return Err(ProviderError::UnknownResource(type_name.to_owned()));
        }
        let context = format!("{type_name}.{}", op.name());
        let outcome = match op {
            Lifecycle::Create(config) => self.users.create(&config).await.map(Some),
            Lifecycle::Read(state) => self
                .users
                .read(&state)
                .await
                .map(|next| next.is_present().then_some(next)),
            Lifecycle::Delete(state) => self.users.delete(&state).await.map(|()| None),
        };
        outcome.map_err(|e| e.with_context(context))
    }
}
