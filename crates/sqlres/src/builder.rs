//! Core statement builder.
//!
//! [`StatementBuilder`] turns a generic [`Request`] plus resource metadata
//! into a compiled [`Statement`], appending name/operator/value conditions
//! to a [`SqlStruct`] accumulator. One builder serves every database; the
//! injected [`DialectHooks`] supply the dialect-specific fragments.

use tracing::debug;

use crate::dialect::DialectHooks;
use crate::error::{InvalidRequest, SqlResult};
use crate::metadata::{ColumnMetaData, SqlResourceMetaData, TableRole};
use crate::request::{Operator, Request, RequestKind, RequestValue};
use crate::sql::{SqlStruct, Statement, Target};

/// How a column appears in a condition: filtering rows or receiving an
/// UPDATE assignment. Drives LIKE promotion and NULL-assignment rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnUsage {
    Selector,
    SetTarget,
}

/// Builds SELECT, INSERT, UPDATE, and DELETE statements.
pub struct StatementBuilder<'a> {
    dialect: &'a dyn DialectHooks,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(dialect: &'a dyn DialectHooks) -> Self {
        Self { dialect }
    }

    /// Build a SELECT from a base statement text that already carries the
    /// projected columns and table list.
    ///
    /// Resource identifiers are appended first, then parameters, then ORDER
    /// BY over the tables' primary keys, then the dialect's pagination
    /// fragment and select suffix.
    pub fn build_select(
        &self,
        metadata: &SqlResourceMetaData,
        base_select_sql: &str,
        request: &Request,
    ) -> SqlResult<Statement> {
        let mut sql = SqlStruct::new(base_select_sql);
        self.append_filters(
            RequestKind::Select,
            metadata,
            &request.resource_identifiers,
            &mut sql,
        )?;
        self.append_filters(RequestKind::Select, metadata, &request.parameters, &mut sql)?;
        self.append_order_by(metadata, &mut sql);
        if let Some(limit) = request.select_limit {
            let offset = request.select_offset.unwrap_or(0);
            sql.push_clause(&self.dialect.pagination_fragment(limit, offset));
        }
        sql.push_clause(self.dialect.select_suffix());
        Ok(self.compile("select", &sql))
    }

    /// Build an INSERT into the resource's parent table from the request
    /// parameters.
    pub fn build_insert(
        &self,
        metadata: &SqlResourceMetaData,
        request: &Request,
    ) -> SqlResult<Statement> {
        let table = metadata.parent();
        let mut sql = SqlStruct::new(format!("INSERT INTO {} (", table.qualified_table_name));
        let mut first = true;
        for parameter in &request.parameters {
            let Some(column) = table.column(&parameter.name) else {
                continue;
            };
            if column.read_only {
                return Err(InvalidRequest::ReadOnlyParam(column.column_label.clone()).into());
            }
            if column.nonqueried_foreign_key {
                continue;
            }
            let mut parameter = parameter.clone();
            column.normalize_value(&mut parameter)?;
            if first {
                sql.push_clause(" VALUES (");
            } else {
                sql.push(Target::Main, ", ");
                sql.push_clause(",");
            }
            first = false;
            sql.push(Target::Main, &column.column_name);
            sql.bind(Target::Clause, parameter.value, column.char_or_datetime);
        }
        if first {
            return Err(InvalidRequest::NoValidParams.into());
        }
        sql.push(Target::Main, ")");
        sql.push_clause(")");
        Ok(self.compile("insert", &sql))
    }

    /// Build an UPDATE of the resource's parent table: SET assignments from
    /// the parameters, WHERE conditions from the resource identifiers.
    pub fn build_update(
        &self,
        metadata: &SqlResourceMetaData,
        request: &Request,
    ) -> SqlResult<Statement> {
        let table = metadata.parent();
        let mut sql = SqlStruct::new(format!("UPDATE {} SET ", table.qualified_table_name));
        let mut first = true;
        for parameter in &request.parameters {
            let Some(column) = table.column(&parameter.name) else {
                continue;
            };
            if column.read_only {
                return Err(InvalidRequest::ReadOnlyParam(column.column_label.clone()).into());
            }
            if column.nonqueried_foreign_key {
                continue;
            }
            if !first {
                sql.push(Target::Main, ", ");
            }
            first = false;
            self.render_condition(
                RequestKind::Update,
                column,
                parameter,
                ColumnUsage::SetTarget,
                Target::Main,
                &mut sql,
            )?;
        }
        if first {
            return Err(InvalidRequest::NoValidParams.into());
        }
        self.append_filters(
            RequestKind::Update,
            metadata,
            &request.resource_identifiers,
            &mut sql,
        )?;
        Ok(self.compile("update", &sql))
    }

    /// Build a DELETE from the resource's parent table, with WHERE
    /// conditions from the resource identifiers and then the parameters.
    pub fn build_delete(
        &self,
        metadata: &SqlResourceMetaData,
        request: &Request,
    ) -> SqlResult<Statement> {
        let table = metadata.parent();
        let mut sql = SqlStruct::new(format!("DELETE FROM {}", table.qualified_table_name));
        self.append_filters(
            RequestKind::Delete,
            metadata,
            &request.resource_identifiers,
            &mut sql,
        )?;
        self.append_filters(RequestKind::Delete, metadata, &request.parameters, &mut sql)?;
        Ok(self.compile("delete", &sql))
    }

    /// Append WHERE/AND conditions for a list of request values.
    ///
    /// The connective is decided per value, before column matching: AND once
    /// the main text carries a WHERE introducer or the clause is non-empty,
    /// WHERE otherwise. A value matching no column (or only foreign-key
    /// columns) still emits its connective but renders nothing, so a list
    /// with no queryable match leaves a dangling clause and is rejected.
    fn append_filters(
        &self,
        kind: RequestKind,
        metadata: &SqlResourceMetaData,
        values: &[RequestValue],
        sql: &mut SqlStruct,
    ) -> SqlResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let mut valid_param_found = false;
        for value in values {
            if sql.has_where_introducer() || !sql.clause_is_empty() {
                sql.push_clause(" AND ");
            } else {
                sql.push_clause(" WHERE ");
            }
            for table in metadata.tables() {
                // Write statements address the parent table only.
                if kind != RequestKind::Select && table.role != TableRole::Parent {
                    continue;
                }
                if let Some(column) = table.column(&value.name) {
                    if column.read_only {
                        return Err(
                            InvalidRequest::ReadOnlyParam(column.column_label.clone()).into()
                        );
                    }
                    if !column.nonqueried_foreign_key {
                        valid_param_found = true;
                        self.render_condition(
                            kind,
                            column,
                            value,
                            ColumnUsage::Selector,
                            Target::Clause,
                            sql,
                        )?;
                    }
                }
            }
        }
        if !sql.clause_is_empty() && !valid_param_found {
            return Err(InvalidRequest::NoValidParams.into());
        }
        Ok(())
    }

    /// Render one name/operator/value condition into the accumulator.
    fn render_condition(
        &self,
        kind: RequestKind,
        column: &ColumnMetaData,
        value: &RequestValue,
        usage: ColumnUsage,
        target: Target,
        sql: &mut SqlStruct,
    ) -> SqlResult<()> {
        let mut value = value.clone();
        column.normalize_value(&mut value)?;

        // Name: SELECT conditions qualify to disambiguate joined tables.
        if kind == RequestKind::Select {
            sql.push(target, &column.qualified_column_name);
        } else {
            sql.push(target, &column.column_name);
        }

        // Operator, with two overrides: a selector equality on a wildcard
        // value promotes to LIKE, and IsNull as an UPDATE target is an
        // assignment rather than a predicate.
        if usage == ColumnUsage::Selector
            && value.operator == Operator::Equals
            && value.value.contains_wildcard()
        {
            sql.push(target, " LIKE ");
        } else if usage == ColumnUsage::SetTarget
            && kind == RequestKind::Update
            && value.operator == Operator::IsNull
        {
            sql.push(target, " = ");
        } else {
            let operator_sql = match value.operator {
                Operator::Equals => " = ",
                Operator::In => " IN ",
                Operator::IsNull => " IS NULL",
                Operator::IsNotNull => " IS NOT NULL",
                Operator::LessThan => " < ",
                Operator::LessThanOrEqualTo => " <= ",
                Operator::GreaterThan => " > ",
                Operator::GreaterThanOrEqualTo => " >= ",
                Operator::NotEquals => " != ",
                Operator::Escaped => {
                    return Err(InvalidRequest::UnmappedOperator(value.operator).into());
                }
            };
            sql.push(target, operator_sql);
        }

        // Value. NULL predicates bind nothing; everything else binds exactly
        // one value per emitted literal.
        if value.operator == Operator::In {
            sql.push(target, "(");
            for (i, element) in value.in_values.iter().enumerate() {
                if i > 0 {
                    sql.push(target, ",");
                }
                sql.bind(target, element.clone(), column.char_or_datetime);
            }
            sql.push(target, ")");
        } else if (value.operator != Operator::IsNull && value.operator != Operator::IsNotNull)
            || (usage == ColumnUsage::SetTarget && kind == RequestKind::Update)
        {
            sql.bind(target, value.value, column.char_or_datetime);
        }
        Ok(())
    }

    /// Append ORDER BY over the qualified primary keys, parent table first.
    /// Omitted entirely when no table has primary keys.
    fn append_order_by(&self, metadata: &SqlResourceMetaData, sql: &mut SqlStruct) {
        let mut first = true;
        for table in metadata.tables() {
            for column in table.primary_keys() {
                if first {
                    sql.push_clause(" ORDER BY ");
                    first = false;
                } else {
                    sql.push_clause(", ");
                }
                sql.push_clause(&column.qualified_column_name);
            }
        }
    }

    fn compile(&self, kind: &'static str, sql: &SqlStruct) -> Statement {
        let statement = sql.compile(self.dialect);
        debug!(
            kind,
            sql = %statement.literal,
            binds = statement.values.len(),
            "compiled statement"
        );
        statement
    }
}
