//! Per-database capability hooks.
//!
//! Each database contributes one stateless [`DialectHooks`] implementation:
//! pure string transforms for pagination, placeholders, qualified naming,
//! sequence statements, and the metadata-introspection queries. The
//! statement builder and sequence manager take the hooks by reference, so a
//! single builder serves every dialect; [`Dialect`] selects the hooks from
//! configuration.

mod mssql;
mod mysql;
mod postgres;

pub use mssql::MsSql;
pub use mysql::MySql;
pub use postgres::Postgres;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlError;

/// Dialect-specific string transforms.
///
/// Implementations are pure and idempotent; they hold no connection state
/// and are invoked only by the statement builder and the sequence manager.
pub trait DialectHooks: Send + Sync {
    /// Pagination clause for a limit/offset pair. May be empty when the
    /// dialect expresses pagination outside the clause text (see
    /// [`select_suffix`](Self::select_suffix)).
    fn pagination_fragment(&self, limit: u32, offset: u32) -> String;

    /// Fixed token appended to every SELECT after any pagination fragment.
    fn select_suffix(&self) -> &'static str {
        ""
    }

    /// Prepared-statement placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".to_string()
    }

    /// Column label used to disambiguate duplicate labels across joined
    /// tables. Read-only columns keep the bare label; writable columns are
    /// table-qualified.
    fn qualified_column_label(
        &self,
        table: &str,
        qualified_table: &str,
        read_only: bool,
        label: &str,
    ) -> String {
        let _ = qualified_table;
        if read_only {
            label.to_string()
        } else {
            format!("{table}.{label}")
        }
    }

    /// Table identifier used in generated statements and introspection.
    fn qualified_table_name(&self, database: &str, table: &str) -> String {
        format!("{database}.{table}")
    }

    /// Statement returning the current value of a sequence.
    fn sequence_current_value_sql(&self, sequence_name: &str) -> String;

    /// Statement restarting a sequence at `next_value`. `table` is carried
    /// for dialects whose identity counters belong to the table itself.
    fn sequence_advance_sql(&self, table: &str, sequence_name: &str, next_value: u64) -> String;

    /// Introspection query returning (column name, data type, identity flag)
    /// rows for a schema and table.
    fn columns_query(&self) -> &'static str;

    /// Introspection query returning primary-key column-name rows for a
    /// catalog and table via the constraint/key-usage join.
    fn primary_key_query(&self) -> &'static str;
}

/// Configured database dialect, resolving to its [`DialectHooks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    MsSql,
}

impl Dialect {
    pub fn hooks(&self) -> &'static dyn DialectHooks {
        match self {
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::MsSql => &MsSql,
        }
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            "mssql" | "sqlserver" => Ok(Dialect::MsSql),
            _ => Err(SqlError::UnknownDialect(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_parses_common_names() {
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("sqlserver".parse::<Dialect>().unwrap(), Dialect::MsSql);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn dialect_deserializes_snake_case() {
        let d: Dialect = serde_json::from_str(r#""ms_sql""#).unwrap();
        assert_eq!(d, Dialect::MsSql);
    }

    #[test]
    fn default_label_qualifies_writable_columns() {
        let hooks = Dialect::MySql.hooks();
        assert_eq!(
            hooks.qualified_column_label("film", "sakila.film", false, "id"),
            "film.id"
        );
        assert_eq!(
            hooks.qualified_column_label("film", "sakila.film", true, "id"),
            "id"
        );
    }
}
