//! PostgreSQL dialect.

use super::DialectHooks;

/// PostgreSQL hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

const COLUMNS_QUERY: &str = "select column_name, data_type, column_default \
     from information_schema.columns where table_schema = $1 and table_name = $2";

const PRIMARY_KEY_QUERY: &str = "select column_name \
     from information_schema.table_constraints tc, information_schema.key_column_usage kcu \
     where tc.constraint_catalog = $1 and tc.table_name = $2 \
     and tc.constraint_type = 'PRIMARY KEY' \
     and tc.constraint_schema = kcu.constraint_schema and tc.table_name = kcu.table_name \
     and tc.constraint_name = kcu.constraint_name";

impl DialectHooks for Postgres {
    fn pagination_fragment(&self, limit: u32, offset: u32) -> String {
        format!(" LIMIT {limit} OFFSET {offset}")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    // Statements address tables through the schema search path, not the
    // database name.
    fn qualified_table_name(&self, _database: &str, table: &str) -> String {
        table.to_string()
    }

    fn sequence_current_value_sql(&self, sequence_name: &str) -> String {
        format!("SELECT last_value FROM {sequence_name}")
    }

    fn sequence_advance_sql(&self, _table: &str, sequence_name: &str, next_value: u64) -> String {
        format!("ALTER SEQUENCE {sequence_name} RESTART WITH {next_value}")
    }

    fn columns_query(&self) -> &'static str {
        COLUMNS_QUERY
    }

    fn primary_key_query(&self) -> &'static str {
        PRIMARY_KEY_QUERY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(Postgres.placeholder(1), "$1");
        assert_eq!(Postgres.placeholder(12), "$12");
    }

    #[test]
    fn pagination_renders_limit_offset() {
        assert_eq!(Postgres.pagination_fragment(25, 50), " LIMIT 25 OFFSET 50");
    }

    #[test]
    fn table_name_is_unqualified() {
        assert_eq!(Postgres.qualified_table_name("sakila", "film"), "film");
    }

    #[test]
    fn sequence_statements() {
        assert_eq!(
            Postgres.sequence_current_value_sql("film_id_seq"),
            "SELECT last_value FROM film_id_seq"
        );
        assert_eq!(
            Postgres.sequence_advance_sql("film", "film_id_seq", 9),
            "ALTER SEQUENCE film_id_seq RESTART WITH 9"
        );
    }
}
