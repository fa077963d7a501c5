//! The `neo4j_user` resource.

use std::sync::Arc;

use neo4j_provider_core::record;
use neo4j_provider_core::schema::{validate_not_blank, Attribute, ResourceSchema, Schema, Validator};
use neo4j_provider_core::traits::{AccessMode, FromRow, Session, SessionFactory};
use neo4j_provider_core::ProviderError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::query::query;

pub const TYPE_NAME: &str = "neo4j_user";

/// Length of the generated initial password.
pub const INITIAL_PASSWORD_LENGTH: usize = 16;

pub const CREATE_USER: &str =
    "CREATE USER $user IF NOT EXISTS SET PASSWORD $password SET PASSWORD CHANGE REQUIRED";
pub const SHOW_USER: &str = "SHOW USERS WHERE user = $user";
pub const DROP_USER: &str = "DROP USER $username";

pub fn schema() -> ResourceSchema {
    ResourceSchema {
        name: TYPE_NAME,
        importable: false,
        schema: Schema::new()
            .with_attribute(
                Attribute::required_string("username")
                    .validator(Validator::NotBlank)
                    .force_new(),
            )
            .with_attribute(
                Attribute::computed_string("password")
                    .sensitive()
                    .description(
                        "This is only the initial password, afterwards it's going to be changed by the user. \
                         It is generated when the user is created.",
                    ),
            ),
    }
}

/// Declared configuration of a `neo4j_user`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,
}

/// Persisted state of a `neo4j_user`. `id` is `None` once the user is gone.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserState {
    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }
}

impl std::fmt::Debug for UserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserState")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One row of `SHOW USERS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user: String,
    pub roles: Option<Vec<String>>,
    pub password_change_required: Option<bool>,
    /// Enterprise edition only.
    pub suspended: Option<bool>,
    pub home: Option<String>,
}

impl FromRow for UserRow {
    fn from_row(row: &neo4rs::Row) -> Result<Self, ProviderError> {
        Ok(Self {
            user: record::required(row, "user", "UserRow")?,
            roles: record::optional(row, "roles", "UserRow")?,
            password_change_required: record::optional(row, "passwordChangeRequired", "UserRow")?,
            suspended: record::optional(row, "suspended", "UserRow")?,
            home: record::optional(row, "home", "UserRow")?,
        })
    }
}

pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INITIAL_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Lifecycle adapter for database users.
///
/// Every call opens its own session from the injected factory and closes it
/// before returning, whatever the outcome. Only `read` uses a read session.
#[derive(Clone)]
pub struct UserResource {
    sessions: Arc<dyn SessionFactory>,
}

impl UserResource {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self { sessions }
    }

    /// Create the user, or adopt it if it already exists.
    ///
    /// A password is only generated and set when the user is genuinely new.
    /// Adopting an existing user leaves `password` empty: the server never
    /// reveals stored credentials, so there is nothing to record.
    #[instrument(skip(self, config), fields(username = %config.username))]
    pub async fn create(&self, config: &UserConfig) -> Result<UserState, ProviderError> {
        validate_not_blank(&config.username, "neo4j_user.username")?;

        let mut session = self.sessions.open_session(AccessMode::Write).await?;
        let outcome = create_in(session.as_mut(), &config.username).await;
        session.close().await;

        let password = outcome?;
        info!(generated_password = password.is_some(), "user created");
        Ok(UserState {
            id: Some(config.username.clone()),
            username: config.username.clone(),
            password,
        })
    }

    /// Refresh state. A missing user clears the id; a failed query is an
    /// error and leaves the caller's state alone.
    #[instrument(skip(self, state), fields(username = %state.username))]
    pub async fn read(&self, state: &UserState) -> Result<UserState, ProviderError> {
        let mut session = self.sessions.open_session(AccessMode::Read).await?;
        let outcome = find_user(session.as_mut(), &state.username).await;
        session.close().await;

        let rows = outcome?;
        let mut next = state.clone();
        match rows.len() {
            0 => {
                info!("user no longer exists, removing from state");
                next.id = None;
            }
            1 => {
                debug!(row = ?rows[0], "user found");
                next.id = Some(state.username.clone());
            }
            n => {
                return Err(ProviderError::Consistency {
                    username: state.username.clone(),
                    rows: n,
                })
            }
        }
        Ok(next)
    }

    #[instrument(skip(self, state), fields(username = %state.username))]
    pub async fn delete(&self, state: &UserState) -> Result<(), ProviderError> {
        let mut session = self.sessions.open_session(AccessMode::Write).await?;
        let outcome = query(DROP_USER)
            .param("username", state.username.as_str())
            .execute(session.as_mut())
            .await;
        session.close().await;

        outcome.map_err(|e| e.with_context(DROP_USER))?;
        info!("user dropped");
        Ok(())
    }
}

async fn find_user(session: &mut dyn Session, username: &str) -> Result<Vec<UserRow>, ProviderError> {
    query(SHOW_USER)
        .param("user", username)
        .fetch_all(session)
        .await
        .map_err(|e| e.with_context(SHOW_USER))
}

/// Returns the generated password, or `None` when an existing user was adopted.
async fn create_in(session: &mut dyn Session, username: &str) -> Result<Option<String>, ProviderError> {
    let existing = find_user(session, username).await?;
    if !existing.is_empty() {
        warn!("user already exists, adopting it without resetting its password");
        return Ok(None);
    }

    let password = generate_password();
    query(CREATE_USER)
        .param("user", username)
        .param("password", password.as_str())
        .execute(session)
        .await
        .map_err(|e| e.with_context(CREATE_USER))?;

    let rows = find_user(session, username).await?;
    if rows.len() != 1 {
        return Err(ProviderError::Consistency {
            username: username.to_owned(),
            rows: rows.len(),
        });
    }
    Ok(Some(password))
}
