//! MySQL dialect.
//!
//! MySQL changes a column by restating its whole declaration: `MODIFY COLUMN`
//! for definition changes and `CHANGE <old> <declaration>` for renames.

use super::{Dialect, QuotePolicy};
use crate::action::{DdlAction, LABEL_MODIFY_COLUMN, LABEL_RENAME_COLUMN, LABEL_RENAME_VIEW};
use crate::catalog::{DataKind, DataTypeEntry, TypeCatalog, TypeParams};
use crate::error::{DdlError, Result};
use crate::modifier::{ColumnModifier, ModifierId};
use crate::schema::{ColumnSpec, ObjectIdentity, ViewKind, ViewSpec};

const TYPES: &[DataTypeEntry] = &[
    DataTypeEntry::new("varchar", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("char", DataKind::String, TypeParams::Length),
    DataTypeEntry::new("tinytext", DataKind::String, TypeParams::None),
    DataTypeEntry::new("text", DataKind::String, TypeParams::None),
    DataTypeEntry::new("mediumtext", DataKind::String, TypeParams::None),
    DataTypeEntry::new("longtext", DataKind::String, TypeParams::None),
    DataTypeEntry::new("int", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("integer", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("tinyint", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("smallint", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("mediumint", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("bigint", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("decimal", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("numeric", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("float", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("double", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("real", DataKind::Numeric, TypeParams::Precision),
    DataTypeEntry::new("bit", DataKind::Numeric, TypeParams::Length),
    DataTypeEntry::new("boolean", DataKind::Boolean, TypeParams::None),
    DataTypeEntry::new("bool", DataKind::Boolean, TypeParams::None),
    DataTypeEntry::new("datetime", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("timestamp", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("date", DataKind::DateTime, TypeParams::None),
    DataTypeEntry::new("time", DataKind::DateTime, TypeParams::Precision),
    DataTypeEntry::new("year", DataKind::DateTime, TypeParams::None),
    DataTypeEntry::new("varbinary", DataKind::Binary, TypeParams::Length),
    DataTypeEntry::new("binary", DataKind::Binary, TypeParams::Length),
    DataTypeEntry::new("tinyblob", DataKind::Binary, TypeParams::None),
    DataTypeEntry::new("blob", DataKind::Binary, TypeParams::None),
    DataTypeEntry::new("mediumblob", DataKind::Binary, TypeParams::None),
    DataTypeEntry::new("longblob", DataKind::Binary, TypeParams::None),
    DataTypeEntry::new("json", DataKind::Json, TypeParams::None),
    DataTypeEntry::new("enum", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("set", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("geometry", DataKind::Other, TypeParams::None),
    DataTypeEntry::new("point", DataKind::Other, TypeParams::None),
];

static CATALOG: TypeCatalog = TypeCatalog::new("mysql", TYPES, TYPES[7]);

const MODIFIERS: &[ColumnModifier] = &[
    ColumnModifier::builtin(ModifierId::DataType),
    ColumnModifier::builtin(ModifierId::Default),
    ColumnModifier::builtin(ModifierId::NullNotNull),
    ColumnModifier::builtin(ModifierId::ExtraInfo),
    ColumnModifier::builtin(ModifierId::AutoIncrement),
    ColumnModifier::builtin(ModifierId::Comment),
];

const RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "change", "check", "column",
    "constraint", "create", "database", "default", "delete", "desc", "distinct", "drop", "exists",
    "foreign", "from", "group", "having", "in", "index", "insert", "interval", "into", "is",
    "join", "key", "like", "limit", "not", "null", "on", "or", "order", "primary", "range",
    "references", "rename", "select", "set", "show", "table", "to", "union", "unique", "update",
    "usage", "use", "values", "where", "with",
];

/// MySQL dialect for DDL generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect {
    quote_policy: QuotePolicy,
}

impl MySqlDialect {
    /// Creates a new MySQL dialect that quotes every identifier.
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
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn quote_policy(&self) -> QuotePolicy {
        self.quote_policy
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn type_catalog(&self) -> &'static TypeCatalog {
        &CATALOG
    }

    fn modifiers(&self) -> &'static [ColumnModifier] {
        MODIFIERS
    }

    fn view_keyword(&self, kind: ViewKind) -> Result<&'static str> {
        match kind {
            ViewKind::View => Ok("VIEW"),
            ViewKind::Materialized => Err(DdlError::unsupported(
                self.name(),
                "materialized view",
            )),
        }
    }

    fn modify_column(
        &self,
        table: &ObjectIdentity,
        _column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        Ok(vec![DdlAction::new(
            LABEL_MODIFY_COLUMN,
            format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                self.qualified_name(table),
                declaration
            ),
        )])
    }

    fn rename_column(
        &self,
        table: &ObjectIdentity,
        old_name: &str,
        _column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        // CHANGE needs the full declaration, even when only the name differs
        Ok(vec![DdlAction::new(
            LABEL_RENAME_COLUMN,
            format!(
                "ALTER TABLE {} CHANGE {} {}",
                self.qualified_name(table),
                self.quote_identifier(old_name),
                declaration
            ),
        )])
    }

    fn rename_view(
        &self,
        schema: &[String],
        old_name: &str,
        view: &ViewSpec,
    ) -> Result<Vec<DdlAction>> {
        self.view_keyword(view.view_kind)?;
        Ok(vec![DdlAction::new(
            LABEL_RENAME_VIEW,
            format!(
                "RENAME TABLE {} TO {}",
                self.qualified_name(&ObjectIdentity::qualified(schema, old_name)),
                self.qualified_name(&ObjectIdentity::qualified(schema, &view.name))
            ),
        )])
    }
}
