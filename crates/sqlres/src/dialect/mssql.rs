//! SQL Server dialect.

use super::DialectHooks;

/// SQL Server hooks.
///
/// Pagination is not expressed as a clause fragment; every SELECT instead
/// ends with the fixed `FOR BROWSE` marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSql;

const COLUMNS_QUERY: &str = "select column_name, data_type, \
     COLUMNPROPERTY(object_id(TABLE_SCHEMA+'.'+TABLE_NAME), COLUMN_NAME, 'IsIdentity') as IsIdentity \
     from information_schema.columns where table_schema = ? and table_name = ?";

const PRIMARY_KEY_QUERY: &str = "select column_name \
     from information_schema.table_constraints tc, information_schema.key_column_usage kcu \
     where tc.constraint_catalog = ? and tc.table_name = ? \
     and tc.constraint_type = 'PRIMARY KEY' \
     and tc.constraint_schema = kcu.constraint_schema and tc.table_name = kcu.table_name \
     and tc.constraint_name = kcu.constraint_name";

impl DialectHooks for MsSql {
    fn pagination_fragment(&self, _limit: u32, _offset: u32) -> String {
        String::new()
    }

    fn select_suffix(&self) -> &'static str {
        " FOR BROWSE"
    }

    fn qualified_column_label(
        &self,
        _table: &str,
        qualified_table: &str,
        read_only: bool,
        label: &str,
    ) -> String {
        // database.table.label keeps labels unambiguous across databases.
        if read_only {
            label.to_string()
        } else {
            format!("{qualified_table}.{label}")
        }
    }

    fn sequence_current_value_sql(&self, sequence_name: &str) -> String {
        format!("SELECT current_value FROM sys.sequences WHERE name = '{sequence_name}'")
    }

    fn sequence_advance_sql(&self, _table: &str, sequence_name: &str, next_value: u64) -> String {
        format!("ALTER SEQUENCE {sequence_name} RESTART WITH {next_value};")
    }

    fn columns_query(&self) -> &'static str {
        COLUMNS_QUERY
    }

    fn primary_key_query(&self) -> &'static str {
        PRIMARY_KEY_QUERY
    }
}
