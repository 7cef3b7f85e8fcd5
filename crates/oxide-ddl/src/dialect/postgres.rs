//! PostgreSQL dialect.

use super::{Dialect, DropOptions, QuotePolicy};
use crate::action::{
    DdlAction, LABEL_ADD_COLUMN, LABEL_COMMENT_COLUMN, LABEL_DROP_COLUMN, LABEL_MODIFY_COLUMN,
    LABEL_RENAME_COLUMN, LABEL_RENAME_VIEW,
};
use crate::catalog::{DataKind, DataTypeEntry, TypeCatalog, TypeParams};
use crate::error::Result;
use crate::modifier::{ColumnModifier, ModifierId};
use crate::schema::{ColumnSpec, ObjectIdentity, ViewKind, ViewSpec};

const TYPES: &[DataTypeEntry] = &[
    DataTypeEntry::new("varchar", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("character varying", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("char", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("character", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("bpchar", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("text", DataKind::String, TypeParams::None),
    DataTypeEntry::new("integer", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("int", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("int4", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("smallint", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("int2", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("bigint", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("int8", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("serial", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("smallserial", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("bigserial", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("numeric", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("decimal", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("real", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("float4", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("double precision", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("float8", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("money", DataKind::Numeric, TypeParams::None),
    DataTypeEntry::new("boolean", DataKind::Boolean, TypeParams::None),
    DataTypeEntry::new("bool", DataKind::Boolean, TypeParams::None),
    DataTypeEntry::new("timestamp", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("timestamptz", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("date", DataKind::DateTime, TypeParams::None),
    DataTypeEntry::new("time", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("timetz", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("interval", DataKind::DateTime, TypeParams::None),
    DataTypeEntry::new("bytea", DataKind::Binary, TypeParams::None),
    DataTypeEntry::new("jsonb", DataKind::Json, TypeParams::None),
    DataTypeEntry::new("json", DataKind::Json, TypeParams::None),
    DataTypeEntry::new("uuid", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("inet", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("cidr", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("xml", DataKind::Other, TypeParams::None),
];

static CATALOG: TypeCatalog = TypeCatalog::new("postgresql", TYPES, TYPES[6]);

// Comments are separate statements; auto-generation lives in the type
// (serial, identity), so neither has a declaration clause here.
const MODIFIERS: &[ColumnModifier] = &[
    ColumnModifier::builtin(ModifierId::DataType),
    ColumnModifier::builtin(ModifierId::Default),
    ColumnModifier::builtin(ModifierId::NullNotNull),
];

const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "both", "case", "cast",
    "check", "collate", "column", "constraint", "create", "current_date", "current_time",
    "current_timestamp", "current_user", "default", "desc", "distinct", "do", "else", "end",
    "except", "false", "for", "foreign", "from", "grant", "group", "having", "in", "into",
    "leading", "limit", "not", "null", "offset", "on", "only", "or", "order", "primary",
    "references", "returning", "select", "table", "then", "to", "true", "union", "unique", "user",
    "using", "when", "where", "window", "with",
];

/// Maps the serial pseudo-types to the integer types they are stored as.
///
/// `serial` is only valid when a column is created; `ALTER COLUMN ... TYPE`
/// needs the underlying type.
fn storage_type(full_type: &str) -> &str {
    match full_type.to_ascii_lowercase().as_str() {
        "smallserial" | "serial2" => "smallint",
        "serial" | "serial4" => "integer",
        "bigserial" | "serial8" => "bigint",
        _ => full_type,
    }
}

/// PostgreSQL dialect for DDL generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect {
    quote_policy: QuotePolicy,
}

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect that quotes every identifier.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quote_policy: QuotePolicy::Always,
        }
    }

    /// Sets the quoting policy.
    #[must_use]
    pub const fn with_quote_policy(mut self, quote_policy: QuotePolicy) -> Self {
        self.quote_policy = quote_policy;
        self
    }

    /// `COMMENT ON COLUMN` for a set comment; an empty comment clears it.
    fn comment_action(&self, table: &ObjectIdentity, column: &ColumnSpec) -> Option<DdlAction> {
        let comment = column.comment.as_ref()?;
        let value = if comment.is_empty() {
            "NULL".to_string()
        } else {
            format!("'{}'", comment.replace('\'', "''"))
        };
        Some(DdlAction::new(
            LABEL_COMMENT_COLUMN,
            format!(
                "COMMENT ON COLUMN {}.{} IS {}",
                self.qualified_name(table),
                self.quote_identifier(&column.name),
                value
            ),
        ))
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn quote_policy(&self) -> QuotePolicy {
        self.quote_policy
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn folds_to_lowercase(&self) -> bool {
        true
    }

    fn type_catalog(&self) -> &'static TypeCatalog {
        &CATALOG
    }

    fn modifiers(&self) -> &'static [ColumnModifier] {
        MODIFIERS
    }

    fn view_keyword(&self, kind: ViewKind) -> Result<&'static str> {
        Ok(match kind {
            ViewKind::View => "VIEW",
            ViewKind::Materialized => "MATERIALIZED VIEW",
        })
    }

    fn add_column(
        &self,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        let mut actions = vec![DdlAction::new(
            LABEL_ADD_COLUMN,
            format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.qualified_name(table),
                declaration
            ),
        )];
        if column.comment.as_deref().is_some_and(|c| !c.is_empty()) {
            actions.extend(self.comment_action(table, column));
        }
        Ok(actions)
    }

    fn modify_column(
        &self,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        _declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        let name = self.quote_identifier(&column.name);
        let mut clauses = vec![format!(
            "ALTER COLUMN {name} TYPE {}",
            storage_type(&column.full_type_name())
        )];
        match column.default_expr.as_deref().filter(|d| !d.is_empty()) {
            Some(expr) => clauses.push(format!("ALTER COLUMN {name} SET DEFAULT {expr}")),
            // An auto-generated column keeps its sequence default
            None if column.auto_generated => {}
            None => clauses.push(format!("ALTER COLUMN {name} DROP DEFAULT")),
        }
        if column.nullable {
            clauses.push(format!("ALTER COLUMN {name} DROP NOT NULL"));
        } else {
            clauses.push(format!("ALTER COLUMN {name} SET NOT NULL"));
        }

        let mut actions = vec![DdlAction::new(
            LABEL_MODIFY_COLUMN,
            format!(
                "ALTER TABLE {} {}",
                self.qualified_name(table),
                clauses.join(", ")
            ),
        )];
        actions.extend(self.comment_action(table, column));
        Ok(actions)
    }

    fn rename_column(
        &self,
        table: &ObjectIdentity,
        old_name: &str,
        column: &ColumnSpec,
        _declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        Ok(vec![DdlAction::new(
            LABEL_RENAME_COLUMN,
            format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.qualified_name(table),
                self.quote_identifier(old_name),
                self.quote_identifier(&column.name)
            ),
        )])
    }

    fn drop_column(
        &self,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        options: DropOptions,
    ) -> Result<Vec<DdlAction>> {
        let mut sql = format!("ALTER TABLE {} DROP COLUMN ", self.qualified_name(table));
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote_identifier(&column.name));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        Ok(vec![DdlAction::new(LABEL_DROP_COLUMN, sql)])
    }

    fn rename_view(
        &self,
        schema: &[String],
        old_name: &str,
        view: &ViewSpec,
    ) -> Result<Vec<DdlAction>> {
        // RENAME TO takes a bare name; the view stays in its schema
        Ok(vec![DdlAction::new(
            LABEL_RENAME_VIEW,
            format!(
                "ALTER {} {} RENAME TO {}",
                self.view_keyword(view.view_kind)?,
                self.qualified_name(&ObjectIdentity::qualified(schema, old_name)),
                self.quote_identifier(&view.name)
            ),
        )])
    }
}
