#![doc = r#"
An infrastructure-as-code provider that manages Neo4j user accounts.

The provider serves a single resource type, `neo4j_user`. Each lifecycle
call (create, read, delete) becomes one or more parameterized Cypher
administration statements, run through its own short-lived session
opened from a shared [`neo4rs`] 0.8 driver handle.

# Configuration

| Attribute | Environment fallback | Notes |
|-----------|----------------------|-------|
| `connection_uri` | `NEO4J_CONNECTION_URI` | required, must not be blank |
| `username` | `NEO4J_USERNAME` | |
| `password` | `NEO4J_PASSWORD` | sensitive |
| `realm` | `NEO4J_REALM` | accepted, ignored by the bolt driver |
| `database` | `NEO4J_DATABASE` | defaults to `system` |
| `max_connections` | `NEO4J_MAX_CONNECTIONS` | driver pool size |

An explicit value always wins over the environment.

# Resources

```hcl
resource "neo4j_user" "alice" {
  username = "alice"
}
```

`username` identifies the user and forces replacement when changed.
`password` is computed: a 16 character initial password generated on
creation. The user must change it on first login.

# Statements

```text
CREATE USER $user IF NOT EXISTS SET PASSWORD $password SET PASSWORD CHANGE REQUIRED
SHOW USERS WHERE user = $user
DROP USER $username
```

# Embedding

```rust,no_run
use std::sync::Arc;
use terraform_provider_neo4j::prelude::*;

# async fn example() -> Result<(), ProviderError> {
let provider = Provider::new();
let configured = provider
    .configure(&serde_json::json!({ "connection_uri": "neo4j://localhost:7687" }))
    .await?;

let state = configured
    .apply("neo4j_user", Lifecycle::Create(UserConfig { username: "alice".into() }))
    .await?;
# Ok(())
# }
```

# Error handling

All operations return [`ProviderError`]. A failed read is never taken to
mean the user is gone: only a successful query with zero rows clears the
resource id.

[`neo4rs`]: https://docs.rs/neo4rs
"#]

pub mod connection;
pub mod prelude;
pub mod provider;
pub mod query;
pub mod resource;
pub mod serve;

pub use neo4j_provider_core as provider_core;
pub use neo4j_provider_core::{Diagnostic, ProviderError};

pub use provider::{ConfiguredProvider, Lifecycle, Provider};
