//! Database dialect implementations.
//!
//! A dialect knows how its engine quotes identifiers, which types it has,
//! which clauses make up a column declaration, and the statement grammar for
//! every change the synthesizer can request. Shared grammar lives in the
//! trait's default methods; engines override what differs.

mod mysql;
mod postgres;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::action::{
    DdlAction, LABEL_ADD_COLUMN, LABEL_CREATE_VIEW, LABEL_DROP_COLUMN, LABEL_DROP_VIEW,
};
use crate::catalog::TypeCatalog;
use crate::error::{DdlError, Result};
use crate::modifier::ColumnModifier;
use crate::schema::{ColumnSpec, ObjectIdentity, ViewKind, ViewSpec};

/// When identifiers get quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuotePolicy {
    /// Quote every identifier.
    #[default]
    Always,
    /// Quote only identifiers that would not survive unquoted: reserved
    /// words, names with special characters, names in the wrong case.
    WhenNeeded,
}

/// Modifiers for drop statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropOptions {
    /// Add `IF EXISTS`.
    pub if_exists: bool,
    /// Add `CASCADE`.
    pub cascade: bool,
}

fn plain_identifier() -> &'static Regex {
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    PLAIN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Returns true if the view source is already a complete CREATE statement.
fn is_full_create(source: &str) -> bool {
    source
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("CREATE"))
}

/// Turns `CREATE ...` into `CREATE OR REPLACE ...` unless it already is.
fn with_or_replace(source: &str) -> String {
    let rest = source.trim_start()["CREATE".len()..].trim_start();
    let mut words = rest.split_whitespace();
    let replaces = words.next().is_some_and(|w| w.eq_ignore_ascii_case("OR"))
        && words.next().is_some_and(|w| w.eq_ignore_ascii_case("REPLACE"));
    if replaces {
        source.to_string()
    } else {
        format!("CREATE OR REPLACE {rest}")
    }
}

/// Trait for dialect-specific DDL generation.
pub trait Dialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char;

    /// Returns the quoting policy.
    fn quote_policy(&self) -> QuotePolicy {
        QuotePolicy::Always
    }

    /// Lowercase reserved words that must always be quoted.
    fn reserved_words(&self) -> &'static [&'static str];

    /// Returns whether the engine folds unquoted identifiers to lowercase.
    fn folds_to_lowercase(&self) -> bool {
        false
    }

    /// Returns the type catalog.
    fn type_catalog(&self) -> &'static TypeCatalog;

    /// Returns the ordered column modifier table.
    fn modifiers(&self) -> &'static [ColumnModifier];

    /// Returns whether `name` can be written without quotes.
    fn is_plain_identifier(&self, name: &str) -> bool {
        plain_identifier().is_match(name)
            && !self.reserved_words().contains(&name.to_lowercase().as_str())
            && !(self.folds_to_lowercase() && name.chars().any(char::is_uppercase))
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        if self.quote_policy() == QuotePolicy::WhenNeeded && self.is_plain_identifier(name) {
            return name.to_string();
        }
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Quotes every path segment and the name, joined with dots.
    fn qualified_name(&self, identity: &ObjectIdentity) -> String {
        identity
            .qualified_path
            .iter()
            .chain(std::iter::once(&identity.name))
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns the keyword naming a view kind in statements.
    fn view_keyword(&self, kind: ViewKind) -> Result<&'static str>;

    /// Returns whether `CREATE OR REPLACE` exists for the view kind.
    fn supports_or_replace(&self, kind: ViewKind) -> bool {
        kind == ViewKind::View
    }

    /// Generates SQL for adding a column.
    fn add_column(
        &self,
        table: &ObjectIdentity,
        _column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>> {
        Ok(vec![DdlAction::new(
            LABEL_ADD_COLUMN,
            format!(
                "ALTER TABLE {} ADD COLUMN {}",
                self.qualified_name(table),
                declaration
            ),
        )])
    }

    /// Generates SQL for changing a column's definition.
    fn modify_column(
        &self,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>>;

    /// Generates SQL for renaming a column.
    ///
    /// `column` carries the new name; `declaration` is built from it.
    fn rename_column(
        &self,
        table: &ObjectIdentity,
        old_name: &str,
        column: &ColumnSpec,
        declaration: &str,
    ) -> Result<Vec<DdlAction>>;

    /// Generates SQL for dropping a column.
    fn drop_column(
        &self,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        _options: DropOptions,
    ) -> Result<Vec<DdlAction>> {
        Ok(vec![DdlAction::new(
            LABEL_DROP_COLUMN,
            format!(
                "ALTER TABLE {} DROP COLUMN {}",
                self.qualified_name(table),
                self.quote_identifier(&column.name)
            ),
        )])
    }

    /// Generates SQL for creating a view.
    ///
    /// A source that already is a full CREATE statement is used as is, so
    /// the name and schema written in it take precedence over the snapshot's.
    /// Only `OR REPLACE` is added when requested and missing.
    fn create_view(
        &self,
        schema: &[String],
        view: &ViewSpec,
        or_replace: bool,
    ) -> Result<Vec<DdlAction>> {
        let keyword = self.view_keyword(view.view_kind)?;
        let source = view.source_text.trim().trim_end_matches(';').trim_end();
        if is_full_create(source) {
            debug!(view = %view.name, "View source is a full CREATE statement");
            let sql = if or_replace && self.supports_or_replace(view.view_kind) {
                with_or_replace(source)
            } else {
                source.to_string()
            };
            return Ok(vec![DdlAction::new(LABEL_CREATE_VIEW, sql)]);
        }

        let mut sql = String::from("CREATE ");
        if or_replace && self.supports_or_replace(view.view_kind) {
            sql.push_str("OR REPLACE ");
        }
        sql.push_str(keyword);
        sql.push(' ');
        sql.push_str(&self.qualified_name(&ObjectIdentity::qualified(schema, &view.name)));
        sql.push_str(" AS ");
        sql.push_str(source);
        Ok(vec![DdlAction::new(LABEL_CREATE_VIEW, sql)])
    }

    /// Generates SQL for changing a view's definition.
    ///
    /// Views that can be replaced in place are re-created with `OR REPLACE`;
    /// the others are dropped and created again.
    fn modify_view(&self, schema: &[String], view: &ViewSpec) -> Result<Vec<DdlAction>> {
        if self.supports_or_replace(view.view_kind) {
            return self.create_view(schema, view, true);
        }
        let mut actions = self.drop_view(schema, view, DropOptions::default())?;
        actions.extend(self.create_view(schema, view, false)?);
        Ok(actions)
    }

    /// Generates SQL for renaming a view.
    fn rename_view(
        &self,
        schema: &[String],
        old_name: &str,
        view: &ViewSpec,
    ) -> Result<Vec<DdlAction>>;

    /// Generates SQL for dropping a view.
    fn drop_view(
        &self,
        schema: &[String],
        view: &ViewSpec,
        options: DropOptions,
    ) -> Result<Vec<DdlAction>> {
        let mut sql = format!("DROP {} ", self.view_keyword(view.view_kind)?);
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.qualified_name(&ObjectIdentity::qualified(schema, &view.name)));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        Ok(vec![DdlAction::new(LABEL_DROP_VIEW, sql)])
    }
}

/// The dialects this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
}

impl DialectKind {
    /// Builds the dialect with the given quoting policy.
    #[must_use]
    pub fn build(self, quote_policy: QuotePolicy) -> Box<dyn Dialect> {
        match self {
            Self::MySql => Box::new(MySqlDialect::new().with_quote_policy(quote_policy)),
            Self::Postgres => Box::new(PostgresDialect::new().with_quote_policy(quote_policy)),
        }
    }
}

impl FromStr for DialectKind {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DdlError::UnknownDialect(other.to_string())),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MySql => f.write_str("mysql"),
            Self::Postgres => f.write_str("postgresql"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_kind_from_str() {
        assert_eq!("MySQL".parse::<DialectKind>().unwrap(), DialectKind::MySql);
        assert_eq!("mariadb".parse::<DialectKind>().unwrap(), DialectKind::MySql);
        assert_eq!("pg".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!(
            " PostgreSQL ".parse::<DialectKind>().unwrap(),
            DialectKind::Postgres
        );
        assert!(matches!(
            "oracle".parse::<DialectKind>(),
            Err(DdlError::UnknownDialect(name)) if name == "oracle"
        ));
    }

    #[test]
    fn test_build_uses_policy() {
        let dialect = DialectKind::Postgres.build(QuotePolicy::WhenNeeded);
        assert_eq!(dialect.name(), "postgresql");
        assert_eq!(dialect.quote_identifier("orders"), "orders");
        assert_eq!(dialect.quote_identifier("Orders"), "\"Orders\"");
    }

    #[test]
    fn test_quote_identifier_escapes_quote_char() {
        let mysql = MySqlDialect::new();
        assert_eq!(mysql.quote_identifier("we`ird"), "`we``ird`");
        let pg = PostgresDialect::new();
        assert_eq!(pg.quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_when_needed_quotes_reserved_and_special_names() {
        let mysql = MySqlDialect::new().with_quote_policy(QuotePolicy::WhenNeeded);
        assert_eq!(mysql.quote_identifier("customer_id"), "customer_id");
        // MySQL keeps case, so mixed case stays bare
        assert_eq!(mysql.quote_identifier("CustomerId"), "CustomerId");
        assert_eq!(mysql.quote_identifier("order"), "`order`");
        assert_eq!(mysql.quote_identifier("first name"), "`first name`");
        assert_eq!(mysql.quote_identifier("1st"), "`1st`");
    }

    #[test]
    fn test_qualified_name() {
        let pg = PostgresDialect::new();
        let id = ObjectIdentity::new("orders").within("shop").within("sales");
        assert_eq!(pg.qualified_name(&id), "\"shop\".\"sales\".\"orders\"");
        assert_eq!(pg.qualified_name(&ObjectIdentity::new("t")), "\"t\"");
    }

    #[test]
    fn test_with_or_replace() {
        assert_eq!(
            with_or_replace("create view v as select 1"),
            "CREATE OR REPLACE view v as select 1"
        );
        assert_eq!(
            with_or_replace("CREATE Or  Replace VIEW v AS SELECT 1"),
            "CREATE Or  Replace VIEW v AS SELECT 1"
        );
        assert_eq!(
            with_or_replace("CREATE ALGORITHM=MERGE VIEW v AS SELECT 1"),
            "CREATE OR REPLACE ALGORITHM=MERGE VIEW v AS SELECT 1"
        );
    }

    #[test]
    fn test_modify_full_create_source_replaces() {
        let view = ViewSpec::new("v", "CREATE VIEW public.other AS SELECT 2;");
        for dialect in [
            DialectKind::MySql.build(QuotePolicy::Always),
            DialectKind::Postgres.build(QuotePolicy::Always),
        ] {
            let actions = dialect.modify_view(&[], &view).unwrap();
            assert_eq!(actions.len(), 1);
            assert_eq!(
                actions[0].statement,
                "CREATE OR REPLACE VIEW public.other AS SELECT 2"
            );

            // Create honours or_replace = false
            let actions = dialect.create_view(&[], &view, false).unwrap();
            assert_eq!(actions[0].statement, "CREATE VIEW public.other AS SELECT 2");
        }
    }

    #[test]
    fn test_is_full_create() {
        assert!(is_full_create("create view v as select 1"));
        assert!(is_full_create("  CREATE OR REPLACE VIEW v AS SELECT 1"));
        assert!(!is_full_create("SELECT 1"));
        assert!(!is_full_create("created_at"));
        assert!(!is_full_create(""));
    }
}
