//! MySQL dialect.

use super::DialectHooks;

/// MySQL hooks.
///
/// MySQL has no standalone sequences; identity columns are table-scoped
/// `AUTO_INCREMENT` counters, so the advance statement alters the table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

const COLUMNS_QUERY: &str = "select column_name, data_type, extra \
     from information_schema.columns where table_schema = ? and table_name = ?";

const PRIMARY_KEY_QUERY: &str = "select column_name \
     from information_schema.table_constraints tc, information_schema.key_column_usage kcu \
     where tc.constraint_schema = ? and tc.table_name = ? \
     and tc.constraint_type = 'PRIMARY KEY' \
     and tc.constraint_schema = kcu.constraint_schema and tc.table_name = kcu.table_name \
     and tc.constraint_name = kcu.constraint_name";

impl DialectHooks for MySql {
    fn pagination_fragment(&self, limit: u32, offset: u32) -> String {
        format!(" LIMIT {limit} OFFSET {offset}")
    }

    fn sequence_current_value_sql(&self, sequence_name: &str) -> String {
        format!(
            "select auto_increment from information_schema.tables \
             where table_schema = database() and table_name = '{sequence_name}'"
        )
    }

    fn sequence_advance_sql(&self, table: &str, _sequence_name: &str, next_value: u64) -> String {
        format!("ALTER TABLE {table} AUTO_INCREMENT = {next_value}")
    }

    fn columns_query(&self) -> &'static str {
        COLUMNS_QUERY
    }

    fn primary_key_query(&self) -> &'static str {
        PRIMARY_KEY_QUERY
    }
}
