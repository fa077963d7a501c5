//! Line-delimited JSON transport between the orchestrator and the provider.
//!
//! After the handshake line every request is one JSON object per line and
//! every response is one JSON object per line, in order.

use neo4j_provider_core::{Diagnostic, ProviderError};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::provider::{ConfiguredProvider, Lifecycle, Provider};
use crate::resource::{UserConfig, UserState};

/// Protocol version announced in the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// First line written to stdout: `NEO4J_PROVIDER|<version>|stdio`.
pub fn handshake() -> String {
    format!("NEO4J_PROVIDER|{PROTOCOL_VERSION}|stdio")
}

#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    GetSchema,
    ValidateProviderConfig {
        #[serde(default)]
        config: Json,
    },
    Configure {
        #[serde(default)]
        config: Json,
    },
    ValidateResourceConfig {
        type_name: String,
        #[serde(default)]
        config: Json,
    },
    Create {
        type_name: String,
        config: Json,
    },
    Read {
        type_name: String,
        state: UserState,
    },
    Delete {
        type_name: String,
        state: UserState,
    },
}

#[derive(Debug, Default, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Json>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn ok(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(result) => Self {
                result: Some(result),
                ..Default::default()
            },
            Err(e) => Self::error(ProviderError::validation("response", e.to_string())),
        }
    }

    fn error(err: ProviderError) -> Self {
        error!(error = %err, "request failed");
        Self {
            result: None,
            diagnostics: vec![err.to_diagnostic()],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl From<Result<Json, ProviderError>> for Response {
    fn from(outcome: Result<Json, ProviderError>) -> Self {
        match outcome {
            Ok(value) => Response::ok(value),
            Err(err) => Response::error(err),
        }
    }
}

/// Request handler. Holds the provider and, once configured, its client handle.
pub struct Server {
    provider: Provider,
    configured: Option<ConfiguredProvider>,
}

impl Server {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            configured: None,
        }
    }

    /// Start already configured, skipping `configure`.
    pub fn with_configured(provider: Provider, configured: ConfiguredProvider) -> Self {
        Self {
            provider,
            configured: Some(configured),
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Response::error(ProviderError::validation("request", e.to_string())),
        }
    }

    pub async fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::GetSchema => Response::ok(self.provider.schema()),
            Request::ValidateProviderConfig { config } => self
                .provider
                .validate_provider_config(&config)
                .map(|()| Json::Null)
                .into(),
            Request::Configure { config } => match self.provider.configure(&config).await {
                Ok(configured) => {
                    self.configured = Some(configured);
                    Response::ok(Json::Null)
                }
                Err(err) => Response::error(err),
            },
            Request::ValidateResourceConfig { type_name, config } => self
                .provider
                .validate_resource_config(&type_name, &config)
                .map(|()| Json::Null)
                .into(),
            Request::Create { type_name, config } => {
                let op = self
                    .provider
                    .validate_resource_config(&type_name, &config)
                    .and_then(|()| {
                        serde_json::from_value::<UserConfig>(config)
                            .map_err(|e| ProviderError::validation(type_name.as_str(), e.to_string()))
                    })
                    .map(Lifecycle::Create);
                match op {
                    Ok(op) => self.apply(&type_name, op).await,
                    Err(err) => Response::error(err),
                }
            }
            Request::Read { type_name, state } => self.apply(&type_name, Lifecycle::Read(state)).await,
            Request::Delete { type_name, state } => {
                self.apply(&type_name, Lifecycle::Delete(state)).await
            }
        }
    }

    async fn apply(&self, type_name: &str, op: Lifecycle) -> Response {
        let Some(configured) = self.configured.as_ref() else {
            return Response::error(ProviderError::NotConfigured);
        };
        match configured.apply(type_name, op).await {
            Ok(state) => Response::ok(state),
            Err(err) => Response::error(err),
        }
    }
}

/// Write the handshake, then answer requests until the reader hits EOF.
pub async fn serve<R, W>(mut server: Server, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(handshake().as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = server.handle_line(&line).await;
        debug!(ok = response.is_ok(), "request handled");
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
