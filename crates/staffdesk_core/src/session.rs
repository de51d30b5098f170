//! Session ownership for the backing store.
//!
//! # Responsibility
//! - Wrap one migrated SQLite connection as a `Session`.
//! - Provide `SessionProvider`, which opens its session lazily on first use
//!   and hands out the same session for its whole lifetime.
//!
//! # Invariants
//! - A provider opens at most one successful connection.
//! - A failed open is not cached; the next `get_session()` tries again.
//! - Access is serialized by one mutex; a `SessionGuard` holds it until drop.
//! - Providers are plain values injected into services, not globals.

use crate::config::{DatabaseConfig, DatabaseTarget};
use crate::db::{open_db_in_memory, open_db_with_timeout, DbResult};
use log::{error, info};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// An open, migrated connection to the backing store.
pub struct Session {
    conn: Connection,
    target: DatabaseTarget,
}

impl Session {
    /// Opens the configured target.
    ///
    /// # Errors
    /// - `DbError::Connectivity` when the target cannot be opened.
    /// - Other `DbError` variants when bootstrap or migrations fail.
    pub fn open(config: &DatabaseConfig) -> DbResult<Self> {
        let conn = match &config.target {
            DatabaseTarget::File(path) => open_db_with_timeout(path, config.busy_timeout)?,
            DatabaseTarget::InMemory => open_db_in_memory()?,
        };
        Ok(Self {
            conn,
            target: config.target.clone(),
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&DatabaseConfig::in_memory())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }
}

/// Lazily opened, shared session for one configured target.
pub struct SessionProvider {
    config: DatabaseConfig,
    session: OnceCell<Mutex<Session>>,
}

/// Exclusive access to the provider's session for one operation.
pub struct SessionGuard<'a> {
    guard: MutexGuard<'a, Session>,
}

impl Deref for SessionGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.guard
    }
}

impl SessionProvider {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    /// Wraps an already opened session.
    pub fn with_session(session: Session) -> Self {
        let config = DatabaseConfig {
            target: session.target.clone(),
            ..DatabaseConfig::in_memory()
        };
        Self {
            config,
            session: OnceCell::with_value(Mutex::new(session)),
        }
    }

    /// Whether the session has been opened.
    pub fn is_open(&self) -> bool {
        self.session.get().is_some()
    }

    /// Returns the shared session, opening it on first call.
    pub fn get_session(&self) -> DbResult<SessionGuard<'_>> {
        let cell = self.session.get_or_try_init(|| {
            info!(
                "event=session_open module=session status=start target={}",
                self.config.target.kind()
            );
            match Session::open(&self.config) {
                Ok(session) => {
                    info!(
                        "event=session_open module=session status=ok target={}",
                        session.target().kind()
                    );
                    Ok(Mutex::new(session))
                }
                Err(err) => {
                    error!(
                        "event=session_open module=session status=error connectivity={} error={}",
                        err.is_connectivity(),
                        err
                    );
                    Err(err)
                }
            }
        })?;

        // A panic mid-operation already rolled its transaction back on drop.
        let guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(SessionGuard { guard })
    }
}
