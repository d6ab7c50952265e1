//! Dual-view SQL accumulator.
//!
//! [`SqlStruct`] records one ordered sequence of tokens per buffer — raw SQL
//! fragments and bound-value markers — and renders the literal statement,
//! the prepared statement, and the bound-value list from that single
//! sequence. A bound value can therefore never appear in one view without
//! its counterpart in the other.
//!
//! Two buffers are kept: `main` (seeded with the base statement text) and
//! `clause` (filters, ORDER BY, pagination). [`SqlStruct::compile`] joins
//! them once, main first, into a final [`Statement`].

use std::fmt::Write;

use crate::dialect::DialectHooks;
use crate::request::Scalar;

#[derive(Debug, Clone)]
enum SqlPart {
    Raw(String),
    Bind { value: Scalar, quoted: bool },
}

#[derive(Debug, Clone, Default)]
struct Buffer {
    parts: Vec<SqlPart>,
}

impl Buffer {
    fn push_raw(&mut self, sql: &str) {
        if sql.is_empty() {
            return;
        }
        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
    }

    fn push_bind(&mut self, value: Scalar, quoted: bool) {
        self.parts.push(SqlPart::Bind { value, quoted });
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn literal_into(&self, out: &mut String) {
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Bind { value, quoted } => {
                    // NULL is never quoted, regardless of column type.
                    if *quoted && !value.is_null() {
                        out.push('\'');
                        for ch in value.to_string().chars() {
                            if ch == '\'' {
                                out.push('\'');
                            }
                            out.push(ch);
                        }
                        out.push('\'');
                    } else {
                        let _ = write!(out, "{value}");
                    }
                }
            }
        }
    }

    fn prepared_into(&self, out: &mut String, index: &mut usize, dialect: &dyn DialectHooks) {
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Bind { .. } => {
                    *index += 1;
                    out.push_str(&dialect.placeholder(*index));
                }
            }
        }
    }

    fn values_into(&self, out: &mut Vec<Scalar>) {
        for part in &self.parts {
            if let SqlPart::Bind { value, .. } = part {
                out.push(value.clone());
            }
        }
    }

    fn bind_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Bind { .. }))
            .count()
    }
}

/// Buffer a fragment is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Main,
    Clause,
}

/// Incremental accumulator for one statement.
///
/// Exclusively owned by the request that builds it; created, populated, and
/// compiled once, never reused.
#[derive(Debug, Clone)]
pub struct SqlStruct {
    main: Buffer,
    clause: Buffer,
}

impl SqlStruct {
    pub fn new(main_sql: impl Into<String>) -> Self {
        let mut main = Buffer::default();
        main.push_raw(&main_sql.into());
        Self {
            main,
            clause: Buffer::default(),
        }
    }

    pub(crate) fn push(&mut self, target: Target, sql: &str) {
        self.buffer_mut(target).push_raw(sql);
    }

    pub(crate) fn bind(&mut self, target: Target, value: Scalar, quoted: bool) {
        self.buffer_mut(target).push_bind(value, quoted);
    }

    pub(crate) fn push_clause(&mut self, sql: &str) {
        self.clause.push_raw(sql);
    }

    fn buffer_mut(&mut self, target: Target) -> &mut Buffer {
        match target {
            Target::Main => &mut self.main,
            Target::Clause => &mut self.clause,
        }
    }

    pub fn clause_is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Whether the literal main text already carries a WHERE introducer.
    ///
    /// Known limitation: this is a substring scan of built text, so a column
    /// name or bound value containing `"where "` is a false positive.
    pub fn has_where_introducer(&self) -> bool {
        self.main_literal().to_ascii_lowercase().contains("where ")
    }

    /// Literal rendering of the main buffer.
    pub fn main_literal(&self) -> String {
        let mut out = String::new();
        self.main.literal_into(&mut out);
        out
    }

    /// Literal rendering of the clause buffer.
    pub fn clause_literal(&self) -> String {
        let mut out = String::new();
        self.clause.literal_into(&mut out);
        out
    }

    /// Total bound values recorded so far, main then clause.
    pub fn bind_count(&self) -> usize {
        self.main.bind_count() + self.clause.bind_count()
    }

    /// Concatenate main and clause into the final literal and prepared
    /// statements. Placeholder numbering runs across both buffers in
    /// emission order, positionally aligned with the value list.
    pub fn compile(&self, dialect: &dyn DialectHooks) -> Statement {
        let mut literal = String::new();
        self.main.literal_into(&mut literal);
        self.clause.literal_into(&mut literal);

        let mut prepared = String::new();
        let mut index = 0;
        self.main.prepared_into(&mut prepared, &mut index, dialect);
        self.clause.prepared_into(&mut prepared, &mut index, dialect);

        let mut values = Vec::with_capacity(index);
        self.main.values_into(&mut values);
        self.clause.values_into(&mut values);

        Statement {
            literal,
            prepared,
            values,
        }
    }
}

/// Final compiled statement handed to the execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Directly executable SQL with inline values.
    pub literal: String,
    /// Parameterized SQL with positional placeholders.
    pub prepared: String,
    /// Bound values in placeholder order.
    pub values: Vec<Scalar>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Dialect, DialectHooks};

    fn mssql() -> &'static dyn DialectHooks {
        Dialect::MsSql.hooks()
    }

    #[test]
    fn raw_fragments_merge() {
        let mut sql = SqlStruct::new("SELECT * FROM film");
        sql.push_clause(" WHERE ");
        sql.push_clause("id = ");
        sql.bind(Target::Clause, Scalar::Int(1), false);
        let statement = sql.compile(mssql());
        assert_eq!(statement.literal, "SELECT * FROM film WHERE id = 1");
        assert_eq!(statement.prepared, "SELECT * FROM film WHERE id = ?");
        assert_eq!(statement.values, vec![Scalar::Int(1)]);
    }

    #[test]
    fn quoted_bind_renders_quotes_only_in_literal() {
        let mut sql = SqlStruct::new("x = ");
        sql.bind(Target::Main, Scalar::from("a'b"), true);
        let statement = sql.compile(mssql());
        assert_eq!(statement.literal, "x = 'a''b'");
        assert_eq!(statement.prepared, "x = ?");
        assert_eq!(statement.values, vec![Scalar::from("a'b")]);
    }

    #[test]
    fn null_bind_is_never_quoted() {
        let mut sql = SqlStruct::new("x = ");
        sql.bind(Target::Main, Scalar::Null, true);
        let statement = sql.compile(mssql());
        assert_eq!(statement.literal, "x = NULL");
        assert_eq!(statement.prepared, "x = ?");
        assert_eq!(statement.values, vec![Scalar::Null]);
    }

    #[test]
    fn placeholder_numbering_runs_across_buffers() {
        let mut sql = SqlStruct::new("INSERT INTO t (a, b) VALUES (");
        sql.bind(Target::Main, Scalar::Int(1), false);
        sql.push(Target::Main, ", ");
        sql.bind(Target::Main, Scalar::Int(2), false);
        sql.push(Target::Main, ")");
        sql.push_clause(" RETURNING ");
        sql.bind(Target::Clause, Scalar::Int(3), false);
        let statement = sql.compile(Dialect::Postgres.hooks());
        assert_eq!(
            statement.prepared,
            "INSERT INTO t (a, b) VALUES ($1, $2) RETURNING $3"
        );
        assert_eq!(
            statement.values,
            vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]
        );
    }

    #[test]
    fn where_scan_is_case_insensitive() {
        let sql = SqlStruct::new("SELECT * FROM film WHERE deleted = 0");
        assert!(sql.has_where_introducer());
        let sql = SqlStruct::new("select * from film where deleted = 0");
        assert!(sql.has_where_introducer());
        let sql = SqlStruct::new("SELECT * FROM film");
        assert!(!sql.has_where_introducer());
    }

    #[test]
    fn buffers_render_independently() {
        let mut sql = SqlStruct::new("SELECT 1");
        sql.push_clause(" ORDER BY id");
        assert_eq!(sql.main_literal(), "SELECT 1");
        assert_eq!(sql.clause_literal(), " ORDER BY id");
    }

    #[test]
    fn bind_count_spans_both_buffers() {
        let mut sql = SqlStruct::new("a = ");
        sql.bind(Target::Main, Scalar::Int(1), false);
        sql.push_clause(" AND b = ");
        sql.bind(Target::Clause, Scalar::Int(2), false);
        assert_eq!(sql.bind_count(), 2);
    }
}
