//! In-memory stand-in for a Neo4j server that understands the three user
//! administration statements.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use neo4j_provider_core::traits::{AccessMode, Session, SessionFactory};
use neo4j_provider_core::{ProviderError, Statement};
use neo4rs::{BoltList, BoltNull, BoltType, Row};
use terraform_provider_neo4j::resource::user::{CREATE_USER, DROP_USER, SHOW_USER};

#[derive(Default)]
struct State {
    users: BTreeMap<String, String>,
    log: Vec<Statement>,
    modes: Vec<AccessMode>,
    opened: usize,
    closed: usize,
    /// Statement text paired with how many more matches pass before one fails.
    fail_on: Vec<(&'static str, usize)>,
    fail_open: bool,
    swallow_creates: bool,
}

#[derive(Clone, Default)]
pub struct FakeNeo4j {
    state: Arc<Mutex<State>>,
}

impl FakeNeo4j {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake neo4j state poisoned")
    }

    /// Make the next statement with this exact text fail like a dropped connection.
    pub fn fail_next(&self, statement: &'static str) {
        self.fail_nth(statement, 1);
    }

    /// Let `nth - 1` statements with this text through, then fail the next one.
    pub fn fail_nth(&self, statement: &'static str, nth: usize) {
        assert!(nth >= 1, "statements are counted from 1");
        self.lock().fail_on.push((statement, nth - 1));
    }

    pub fn fail_open(&self) {
        self.lock().fail_open = true;
    }

    /// Acknowledge `CREATE USER` without storing anything.
    pub fn swallow_creates(&self) {
        self.lock().swallow_creates = true;
    }

    pub fn insert_user(&self, name: &str, password: &str) {
        self.lock().users.insert(name.to_owned(), password.to_owned());
    }

    pub fn remove_user(&self, name: &str) {
        self.lock().users.remove(name);
    }

    pub fn password_of(&self, name: &str) -> Option<String> {
        self.lock().users.get(name).cloned()
    }

    pub fn matching_rows(&self, name: &str) -> usize {
        usize::from(self.lock().users.contains_key(name))
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.lock().log.clone()
    }

    pub fn statement_texts(&self) -> Vec<String> {
        self.lock().log.iter().map(|s| s.text().to_owned()).collect()
    }

    pub fn modes(&self) -> Vec<AccessMode> {
        self.lock().modes.clone()
    }

    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    pub fn sessions(&self) -> Arc<dyn SessionFactory> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl SessionFactory for FakeNeo4j {
    async fn open_session(&self, mode: AccessMode) -> Result<Box<dyn Session>, ProviderError> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(ProviderError::database("connection pool exhausted"));
        }
        state.opened += 1;
        state.modes.push(mode);
        Ok(Box::new(FakeSession { db: self.clone() }))
    }
}

struct FakeSession {
    db: FakeNeo4j,
}

fn user_row(name: &str) -> Row {
    let fields = BoltList::from(vec![
        BoltType::from("user"),
        BoltType::from("roles"),
        BoltType::from("passwordChangeRequired"),
        BoltType::from("suspended"),
        BoltType::from("home"),
    ]);
    let data = BoltList::from(vec![
        BoltType::from(name),
        BoltType::List(BoltList::from(vec![BoltType::from("PUBLIC")])),
        BoltType::from(true),
        BoltType::from(false),
        BoltType::Null(BoltNull),
    ]);
    Row::new(fields, data)
}

#[async_trait]
impl Session for FakeSession {
    async fn run(&mut self, statement: Statement) -> Result<Vec<Row>, ProviderError> {
        let mut state = self.db.lock();
        state.log.push(statement.clone());

        if let Some(pos) = state.fail_on.iter().position(|(s, _)| *s == statement.text()) {
            if state.fail_on[pos].1 == 0 {
                state.fail_on.remove(pos);
                return Err(ProviderError::database("connection reset by peer"));
            }
            state.fail_on[pos].1 -= 1;
        }

        match statement.text() {
            CREATE_USER => {
                let user = statement.param_str("user").expect("user bound");
                let password = statement.param_str("password").expect("password bound");
                if !state.swallow_creates {
                    state.users.entry(user).or_insert(password);
                }
                Ok(Vec::new())
            }
            SHOW_USER => {
                let user = statement.param_str("user").expect("user bound");
                Ok(if state.users.contains_key(&user) {
                    vec![user_row(&user)]
                } else {
                    Vec::new()
                })
            }
            DROP_USER => {
                let user = statement.param_str("username").expect("username bound");
                match state.users.remove(&user) {
                    Some(_) => Ok(Vec::new()),
                    None => Err(ProviderError::database(format!(
                        "Failed to delete the specified user '{user}': User does not exist."
                    ))),
                }
            }
            other => Err(ProviderError::database(format!("unexpected statement: {other}"))),
        }
    }

    async fn close(&mut self) {
        self.db.lock().closed += 1;
    }
}
