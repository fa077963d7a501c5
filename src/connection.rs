//! Connection factory and driver-backed sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use neo4j_provider_core::traits::{AccessMode, Session, SessionFactory};
use neo4j_provider_core::{ConnectionConfig, ProviderError, Statement};
use neo4rs::{ConfigBuilder, Graph, Row};
use tracing::{debug, info, warn};

/// Build the long-lived client handle.
///
/// The driver pool is created lazily: an unreachable host is not detected
/// here but on the first statement.
pub async fn connect(config: &ConnectionConfig) -> Result<Neo4jSessions, ProviderError> {
    config.validate()?;

    if !config.realm.is_empty() {
        warn!(
            realm = %config.realm,
            "realm is not supported by the bolt driver and will be ignored"
        );
    }

    let mut builder = ConfigBuilder::default()
        .uri(config.connection_uri.as_str())
        .user(config.username.as_str())
        .password(config.password.as_str())
        .db(config.database.as_str());
    if let Some(max) = config.max_connections {
        builder = builder.max_connections(max);
    }
    let driver_config = builder.build().map_err(ProviderError::connection)?;
    let graph = Graph::connect(driver_config)
        .await
        .map_err(ProviderError::connection)?;

    info!(
        uri = %config.connection_uri,
        database = %config.database,
        user_agent = %config.user_agent,
        "neo4j driver configured"
    );
    Ok(Neo4jSessions::new(graph))
}

/// Shared client handle. Cheap to clone; every clone uses the same pool.
#[derive(Clone)]
pub struct Neo4jSessions {
    graph: Graph,
    next_id: Arc<AtomicU64>,
}

impl Neo4jSessions {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

#[async_trait]
impl SessionFactory for Neo4jSessions {
    async fn open_session(&self, mode: AccessMode) -> Result<Box<dyn Session>, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, ?mode, "session opened");
        Ok(Box::new(Neo4jSession {
            id,
            mode,
            graph: self.graph.clone(),
            statements: 0,
        }))
    }
}

/// Auto-commit session: each statement leases a pooled connection for
/// exactly as long as it takes to drain its rows.
pub struct Neo4jSession {
    id: u64,
    mode: AccessMode,
    graph: Graph,
    statements: usize,
}

#[async_trait]
impl Session for Neo4jSession {
    async fn run(&mut self, statement: Statement) -> Result<Vec<Row>, ProviderError> {
        self.statements += 1;
        debug!(session = self.id, statement = statement.text(), "running statement");
        let mut stream = self.graph.execute(statement.into_query()).await?;
        let mut out = Vec::new();
        while let Some(row) = stream.next().await? {
            out.push(row);
        }
        Ok(out)
    }

    async fn close(&mut self) {
        debug!(
            session = self.id,
            mode = ?self.mode,
            statements = self.statements,
            "session closed"
        );
    }
}
