//! Resource, table, and column metadata.
//!
//! A resource addresses one physical table or two joined tables
//! (parent/child) with independent primary keys. Metadata is resolved once
//! per resource through a [`MetadataProvider`] and is safe to cache for the
//! resource's configured lifetime; invalidation policy belongs to the
//! caller.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidRequest, SqlResult};
use crate::request::{RequestValue, Scalar};

/// Role a table plays within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    Parent,
    Child,
    Join,
}

/// Column metadata, owned by its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetaData {
    pub column_name: String,
    /// Table-qualified name used in SELECT conditions and ORDER BY.
    pub qualified_column_name: String,
    /// Label the column is projected under; qualified per dialect when the
    /// column is writable, bare when read-only.
    pub column_label: String,
    /// Computed or aliased columns that cannot be written or filtered on.
    pub read_only: bool,
    /// Join-key columns excluded from query conditions.
    pub nonqueried_foreign_key: bool,
    /// Char- or datetime-typed columns take single-quoted literals.
    pub char_or_datetime: bool,
    /// Identity/auto-increment flag from introspection.
    pub sequence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_name: Option<String>,
}

impl ColumnMetaData {
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            column_name: name.to_string(),
            qualified_column_name: format!("{table}.{name}"),
            column_label: name.to_string(),
            read_only: false,
            nonqueried_foreign_key: false,
            char_or_datetime: false,
            sequence: false,
            sequence_name: None,
        }
    }

    pub fn with_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn with_foreign_key(mut self) -> Self {
        self.nonqueried_foreign_key = true;
        self
    }

    pub fn with_char_or_datetime(mut self) -> Self {
        self.char_or_datetime = true;
        self
    }

    pub fn with_sequence(mut self, sequence_name: impl Into<String>) -> Self {
        self.sequence = true;
        self.sequence_name = Some(sequence_name.into());
        self
    }

    /// Coerce an incoming textual value to the column's target type.
    ///
    /// Numeric columns parse text into integers or floats; char and datetime
    /// columns keep text as-is. `In` element lists are coerced element by
    /// element.
    pub fn normalize_value(&self, value: &mut RequestValue) -> SqlResult<()> {
        if self.char_or_datetime {
            return Ok(());
        }
        self.coerce_numeric(&mut value.value)?;
        for element in &mut value.in_values {
            self.coerce_numeric(element)?;
        }
        Ok(())
    }

    fn coerce_numeric(&self, scalar: &mut Scalar) -> Result<(), InvalidRequest> {
        if let Scalar::Text(s) = scalar {
            let parsed = if let Ok(i) = s.parse::<i64>() {
                Scalar::Int(i)
            } else if let Ok(x) = s.parse::<f64>() {
                Scalar::Float(x)
            } else {
                return Err(InvalidRequest::BadValue {
                    column: self.column_label.clone(),
                    value: s.clone(),
                });
            };
            *scalar = parsed;
        }
        Ok(())
    }
}

/// Table metadata: role, naming, columns, and primary keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetaData {
    pub role: TableRole,
    pub table_name: String,
    /// Dialect-qualified name used in generated statements.
    pub qualified_table_name: String,
    columns: Vec<ColumnMetaData>,
    primary_keys: Vec<ColumnMetaData>,
}

impl TableMetaData {
    pub fn new(
        role: TableRole,
        table_name: impl Into<String>,
        qualified_table_name: impl Into<String>,
    ) -> Self {
        Self {
            role,
            table_name: table_name.into(),
            qualified_table_name: qualified_table_name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
        }
    }

    /// Add a column, replacing any column of the same name.
    pub fn add_column(&mut self, column: ColumnMetaData) -> &mut Self {
        match self
            .columns
            .iter_mut()
            .find(|c| c.column_name == column.column_name)
        {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self
    }

    /// Mark a column as a primary key; unknown names are ignored.
    pub fn add_primary_key(&mut self, name: &str) -> &mut Self {
        if let Some(column) = self.column(name) {
            let column = column.clone();
            if !self.primary_keys.iter().any(|c| c.column_name == name) {
                self.primary_keys.push(column);
            }
        }
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetaData> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Columns in introspection order.
    pub fn columns(&self) -> &[ColumnMetaData] {
        &self.columns
    }

    /// Primary key columns in key order.
    pub fn primary_keys(&self) -> &[ColumnMetaData] {
        &self.primary_keys
    }
}

/// Resource metadata spanning a parent table and an optional child table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlResourceMetaData {
    parent: TableMetaData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    child: Option<TableMetaData>,
}

impl SqlResourceMetaData {
    pub fn single(parent: TableMetaData) -> Self {
        Self {
            parent,
            child: None,
        }
    }

    pub fn joined(parent: TableMetaData, child: TableMetaData) -> Self {
        Self {
            parent,
            child: Some(child),
        }
    }

    pub fn parent(&self) -> &TableMetaData {
        &self.parent
    }

    pub fn child(&self) -> Option<&TableMetaData> {
        self.child.as_ref()
    }

    /// Tables in resource order, parent first.
    pub fn tables(&self) -> impl Iterator<Item = &TableMetaData> {
        std::iter::once(&self.parent).chain(self.child.as_ref())
    }
}

/// Supplies column and primary-key metadata per table.
///
/// Implementations typically run the dialect's
/// [`columns_query`](crate::dialect::DialectHooks::columns_query) and
/// [`primary_key_query`](crate::dialect::DialectHooks::primary_key_query)
/// against a live connection; a static implementation works for tests.
pub trait MetadataProvider {
    /// Columns for a table, in ordinal order, with the identity flag set.
    fn columns(&self, schema: &str, table: &str) -> SqlResult<Vec<ColumnMetaData>>;

    /// Primary-key column names for a table, in key order.
    fn primary_keys(&self, catalog: &str, table: &str) -> SqlResult<Vec<String>>;
}

/// Assemble table metadata from a provider, qualifying names and labels per
/// dialect.
pub fn resolve_table(
    provider: &impl MetadataProvider,
    dialect: &dyn crate::dialect::DialectHooks,
    role: TableRole,
    database: &str,
    table: &str,
) -> SqlResult<TableMetaData> {
    let qualified_table = dialect.qualified_table_name(database, table);
    let mut out = TableMetaData::new(role, table, qualified_table.clone());
    for mut column in provider.columns(database, table)? {
        column.qualified_column_name = format!("{table}.{}", column.column_name);
        column.column_label = dialect.qualified_column_label(
            table,
            &qualified_table,
            column.read_only,
            &column.column_label,
        );
        out.add_column(column);
    }
    for name in provider.primary_keys(database, table)? {
        out.add_primary_key(&name);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Operator;

    fn numeric_column() -> ColumnMetaData {
        ColumnMetaData::new("film", "year")
    }

    #[test]
    fn normalize_parses_int_text() {
        let mut value = RequestValue::eq("year", "1999");
        numeric_column().normalize_value(&mut value).unwrap();
        assert_eq!(value.value, Scalar::Int(1999));
    }

    #[test]
    fn normalize_parses_float_text() {
        let mut value = RequestValue::eq("year", "19.5");
        numeric_column().normalize_value(&mut value).unwrap();
        assert_eq!(value.value, Scalar::Float(19.5));
    }

    #[test]
    fn normalize_rejects_non_numeric_text() {
        let mut value = RequestValue::eq("year", "abc");
        let err = numeric_column().normalize_value(&mut value).unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn normalize_keeps_text_for_char_columns() {
        let column = ColumnMetaData::new("film", "title").with_char_or_datetime();
        let mut value = RequestValue::eq("title", "1999");
        column.normalize_value(&mut value).unwrap();
        assert_eq!(value.value, Scalar::from("1999"));
    }

    #[test]
    fn normalize_coerces_in_elements() {
        let mut value = RequestValue::new("year", Operator::In, Scalar::Null);
        value.in_values = vec![Scalar::from("1"), Scalar::Int(2)];
        numeric_column().normalize_value(&mut value).unwrap();
        assert_eq!(value.in_values, vec![Scalar::Int(1), Scalar::Int(2)]);
    }

    #[test]
    fn add_column_replaces_by_name() {
        let mut table = TableMetaData::new(TableRole::Parent, "film", "sakila.film");
        table.add_column(ColumnMetaData::new("film", "id"));
        table.add_column(ColumnMetaData::new("film", "id").with_read_only());
        assert_eq!(table.columns().len(), 1);
        assert!(table.column("id").unwrap().read_only);
    }

    #[test]
    fn tables_iterates_parent_first() {
        let parent = TableMetaData::new(TableRole::Parent, "film", "sakila.film");
        let child = TableMetaData::new(TableRole::Child, "actor", "sakila.actor");
        let metadata = SqlResourceMetaData::joined(parent, child);
        let roles: Vec<TableRole> = metadata.tables().map(|t| t.role).collect();
        assert_eq!(roles, vec![TableRole::Parent, TableRole::Child]);
    }

    #[test]
    fn resolve_table_qualifies_per_dialect() {
        struct StaticProvider;

        impl MetadataProvider for StaticProvider {
            fn columns(&self, _schema: &str, _table: &str) -> SqlResult<Vec<ColumnMetaData>> {
                Ok(vec![
                    ColumnMetaData::new("film", "id").with_sequence("film_seq"),
                    ColumnMetaData::new("film", "rating").with_read_only(),
                ])
            }

            fn primary_keys(&self, _catalog: &str, _table: &str) -> SqlResult<Vec<String>> {
                Ok(vec!["id".to_string()])
            }
        }

        let table = resolve_table(
            &StaticProvider,
            crate::dialect::Dialect::MsSql.hooks(),
            TableRole::Parent,
            "sakila",
            "film",
        )
        .unwrap();
        assert_eq!(table.qualified_table_name, "sakila.film");
        assert_eq!(table.column("id").unwrap().column_label, "sakila.film.id");
        // Read-only columns keep the bare label.
        assert_eq!(table.column("rating").unwrap().column_label, "rating");
        assert_eq!(table.primary_keys().len(), 1);
        assert!(table.column("id").unwrap().sequence);
    }

    #[test]
    fn primary_keys_keep_key_order() {
        let mut table = TableMetaData::new(TableRole::Parent, "film_actor", "sakila.film_actor");
        table.add_column(ColumnMetaData::new("film_actor", "film_id"));
        table.add_column(ColumnMetaData::new("film_actor", "actor_id"));
        table.add_primary_key("actor_id");
        table.add_primary_key("film_id");
        table.add_primary_key("missing");
        let names: Vec<&str> = table
            .primary_keys()
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(names, vec!["actor_id", "film_id"]);
    }
}
