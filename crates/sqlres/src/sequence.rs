//! Sequence reading and advancement.
//!
//! Identity-like counters are read and restarted through dialect-specific
//! statements. Execution goes through a scoped handle acquired from an
//! [`ExecutorProvider`]; the handle's drop releases it on every exit path,
//! success or failure, before any error propagates.

use tracing::debug;

use crate::dialect::DialectHooks;
use crate::error::{SqlError, SqlResult};

/// Driver-side error type carried inside [`SqlError::Resource`].
pub type ExecutionError = Box<dyn std::error::Error + Send + Sync>;

/// Executes a statement on behalf of the sequence manager.
pub trait SequenceExecutor {
    /// Run a statement and return the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError>;
}

/// Hands out scoped execution handles.
///
/// The handle is acquired per operation and released when dropped, the same
/// way a pooled connection or statement handle is checked out and returned.
pub trait ExecutorProvider {
    type Handle: SequenceExecutor;

    fn acquire(&self) -> Result<Self::Handle, ExecutionError>;
}

/// Reads and advances identity-like sequence values.
pub struct SequenceManager<'a> {
    dialect: &'a dyn DialectHooks,
}

impl<'a> SequenceManager<'a> {
    pub fn new(dialect: &'a dyn DialectHooks) -> Self {
        Self { dialect }
    }

    /// Statement text the executor runs and interprets as a number.
    pub fn current_value_sql(&self, sequence_name: &str) -> String {
        self.dialect.sequence_current_value_sql(sequence_name)
    }

    /// Restart a sequence at `next_value` through a scoped execution handle.
    ///
    /// Failures carry the underlying driver error and the exact attempted
    /// statement text; the handle is released before the error propagates.
    pub fn advance<P: ExecutorProvider>(
        &self,
        provider: &P,
        table: &str,
        sequence_name: &str,
        next_value: u64,
    ) -> SqlResult<()> {
        let sql = self
            .dialect
            .sequence_advance_sql(table, sequence_name, next_value);
        let mut handle = provider
            .acquire()
            .map_err(|source| SqlError::resource(sql.clone(), source))?;
        debug!(sql = %sql, "advancing sequence");
        match handle.execute(&sql) {
            Ok(_) => Ok(()),
            Err(source) => Err(SqlError::resource(sql, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubExecutor {
        fail: bool,
        released: Arc<AtomicBool>,
        ran: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl SequenceExecutor for StubExecutor {
        fn execute(&mut self, sql: &str) -> Result<u64, ExecutionError> {
            self.ran.lock().unwrap().push(sql.to_string());
            if self.fail {
                Err("deadlock detected".into())
            } else {
                Ok(1)
            }
        }
    }

    impl Drop for StubExecutor {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct StubProvider {
        fail: bool,
        released: Arc<AtomicBool>,
        ran: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl StubProvider {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                released: Arc::new(AtomicBool::new(false)),
                ran: Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }
    }

    impl ExecutorProvider for StubProvider {
        type Handle = StubExecutor;

        fn acquire(&self) -> Result<Self::Handle, ExecutionError> {
            Ok(StubExecutor {
                fail: self.fail,
                released: self.released.clone(),
                ran: self.ran.clone(),
            })
        }
    }

    #[test]
    fn advance_executes_dialect_statement() {
        let provider = StubProvider::new(false);
        let manager = SequenceManager::new(Dialect::Postgres.hooks());
        manager.advance(&provider, "film", "film_id_seq", 7).unwrap();
        assert_eq!(
            provider.ran.lock().unwrap().as_slice(),
            ["ALTER SEQUENCE film_id_seq RESTART WITH 7"]
        );
        assert!(provider.released.load(Ordering::SeqCst));
    }

    #[test]
    fn advance_failure_carries_attempted_sql_and_releases() {
        let provider = StubProvider::new(true);
        let manager = SequenceManager::new(Dialect::MySql.hooks());
        let err = manager
            .advance(&provider, "film", "film", 100)
            .unwrap_err();
        assert_eq!(
            err.attempted_sql(),
            Some("ALTER TABLE film AUTO_INCREMENT = 100")
        );
        assert!(provider.released.load(Ordering::SeqCst));
    }

    #[test]
    fn current_value_sql_delegates_to_dialect() {
        let manager = SequenceManager::new(Dialect::MsSql.hooks());
        assert_eq!(
            manager.current_value_sql("film_seq"),
            "SELECT current_value FROM sys.sequences WHERE name = 'film_seq'"
        );
    }
}
