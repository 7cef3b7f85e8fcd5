//! Action synthesis.
//!
//! The [`ActionSynthesizer`] turns one [`ChangeCommand`] into the ordered DDL
//! actions that carry it out. It validates the snapshot, builds column
//! declarations and hands the statement grammar to the dialect. Synthesis is
//! pure: the same command and dialect always produce the same actions.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::action::DdlAction;
use crate::catalog::{TypeRequest, TypeResolution};
use crate::command::{
    ChangeCommand, ChangeKind, CommandOptions, ObjectSnapshot, OPTION_CASCADE, OPTION_IF_EXISTS,
    OPTION_OR_REPLACE,
};
use crate::declaration::DeclarationBuilder;
use crate::dialect::{Dialect, DropOptions};
use crate::error::{DdlError, Result};
use crate::schema::{ColumnSpec, ObjectIdentity, ViewSpec};

/// Generates DDL actions for change commands.
#[derive(Clone, Copy)]
pub struct ActionSynthesizer<'d> {
    dialect: &'d dyn Dialect,
    strict_types: bool,
}

impl<'d> ActionSynthesizer<'d> {
    /// Creates a synthesizer for the given dialect.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            strict_types: false,
        }
    }

    /// Rejects new columns whose type is not in the dialect's catalog instead
    /// of substituting the default type.
    #[must_use]
    pub fn strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Synthesizes the actions for one command.
    ///
    /// On error no actions are returned.
    pub fn synthesize(&self, command: &ChangeCommand) -> Result<Vec<DdlAction>> {
        let actions = match &command.target {
            ObjectSnapshot::Column { table, column } => {
                self.column_actions(&command.kind, table, column, &command.options)?
            }
            ObjectSnapshot::View { schema, view } => {
                self.view_actions(&command.kind, schema, view, &command.options)?
            }
        };

        for action in &actions {
            debug!(
                dialect = self.dialect.name(),
                change = command.kind.verb(),
                object = command.target.object_type(),
                name = command.target.name(),
                label = %action.label,
                sql = %action.statement,
                "Synthesized action"
            );
        }
        Ok(actions)
    }

    /// Synthesizes a batch of commands, concatenating their actions in order.
    ///
    /// Stops at the first command that fails.
    pub fn synthesize_all(&self, commands: &[ChangeCommand]) -> Result<Vec<DdlAction>> {
        let mut actions = Vec::new();
        for command in commands {
            actions.extend(self.synthesize(command)?);
        }
        Ok(actions)
    }

    fn column_actions(
        &self,
        kind: &ChangeKind,
        table: &ObjectIdentity,
        column: &ColumnSpec,
        options: &CommandOptions,
    ) -> Result<Vec<DdlAction>> {
        require_name("table", &table.name)?;
        require_name("column", &column.name)?;
        let builder = DeclarationBuilder::new(self.dialect);

        match kind {
            ChangeKind::Create => {
                let column = self.resolve_column_type(column)?;
                let declaration = builder.build(&column, kind);
                self.dialect.add_column(table, &column, &declaration)
            }
            ChangeKind::Modify => {
                require_type(column)?;
                let declaration = builder.build(column, kind);
                self.dialect.modify_column(table, column, &declaration)
            }
            ChangeKind::Rename { old_name } => {
                require_name("column", old_name)?;
                require_type(column)?;
                let declaration = builder.build(column, kind);
                self.dialect.rename_column(table, old_name, column, &declaration)
            }
            ChangeKind::Delete => self.dialect.drop_column(table, column, drop_options(options)),
        }
    }

    fn view_actions(
        &self,
        kind: &ChangeKind,
        schema: &[String],
        view: &ViewSpec,
        options: &CommandOptions,
    ) -> Result<Vec<DdlAction>> {
        require_name("view", &view.name)?;

        match kind {
            ChangeKind::Create => {
                require_source(view)?;
                self.dialect.create_view(schema, view, options.flag(OPTION_OR_REPLACE, true))
            }
            ChangeKind::Modify => {
                require_source(view)?;
                self.dialect.modify_view(schema, view)
            }
            ChangeKind::Rename { old_name } => {
                require_name("view", old_name)?;
                self.dialect.rename_view(schema, old_name, view)
            }
            ChangeKind::Delete => self.dialect.drop_view(schema, view, drop_options(options)),
        }
    }

    /// Checks a new column's type against the catalog.
    ///
    /// Unknown types are replaced by the catalog default, dropping any length
    /// or precision, unless strict typing is on.
    fn resolve_column_type<'c>(&self, column: &'c ColumnSpec) -> Result<Cow<'c, ColumnSpec>> {
        let catalog = self.dialect.type_catalog();
        match catalog.resolve_or_default(&TypeRequest::named(&column.declared_type)) {
            TypeResolution::Resolved(_) => Ok(Cow::Borrowed(column)),
            TypeResolution::Fallback {
                requested,
                substitute,
            } => {
                if self.strict_types {
                    return Err(DdlError::validation(
                        "column",
                        format!(
                            "type {requested} of column '{}' is not known to {}",
                            column.name,
                            self.dialect.name()
                        ),
                    ));
                }
                warn!(
                    dialect = self.dialect.name(),
                    column = %column.name,
                    requested = %requested,
                    substitute = %substitute.name,
                    "Unknown column type, using the default type"
                );
                let mut column = column.clone();
                column.declared_type = substitute.name;
                column.max_length = substitute.length;
                column.precision = None;
                column.scale = None;
                Ok(Cow::Owned(column))
            }
        }
    }
}

fn require_name(object: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DdlError::validation(object, "name must not be empty"));
    }
    Ok(())
}

/// Existing columns are restated with their type, so it must be present.
fn require_type(column: &ColumnSpec) -> Result<()> {
    if column.declared_type.trim().is_empty() {
        return Err(DdlError::validation(
            "column",
            format!("'{}' has no type", column.name),
        ));
    }
    Ok(())
}

fn require_source(view: &ViewSpec) -> Result<()> {
    if view.source_text.trim().is_empty() {
        return Err(DdlError::validation(
            "view",
            format!("'{}' has no source text", view.name),
        ));
    }
    Ok(())
}

fn drop_options(options: &CommandOptions) -> DropOptions {
    DropOptions {
        if_exists: options.flag(OPTION_IF_EXISTS, false),
        cascade: options.flag(OPTION_CASCADE, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DialectKind, MySqlDialect, PostgresDialect, QuotePolicy};

    fn mysql() -> MySqlDialect {
        MySqlDialect::new()
    }

    fn postgres() -> PostgresDialect {
        PostgresDialect::new()
    }

    fn orders() -> ObjectIdentity {
        ObjectIdentity::new("orders").within("shop")
    }

    fn shop() -> Vec<String> {
        vec!["shop".to_string()]
    }

    #[test]
    fn test_create_column() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::column(
            ChangeKind::Create,
            orders(),
            ColumnSpec::new("title", "varchar").max_length(100),
        );
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Add column");
        assert_eq!(
            actions[0].statement,
            "ALTER TABLE `shop`.`orders` ADD COLUMN `title` varchar(100)"
        );
    }

    #[test]
    fn test_create_column_unknown_type_falls_back() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::column(
            ChangeKind::Create,
            orders(),
            ColumnSpec::new("location", "money").max_length(12).not_null(),
        );
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(
            actions[0].statement,
            "ALTER TABLE `shop`.`orders` ADD COLUMN `location` integer NOT NULL"
        );
    }

    #[test]
    fn test_create_column_unknown_type_strict() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect).strict_types(true);
        let cmd = ChangeCommand::column(
            ChangeKind::Create,
            orders(),
            ColumnSpec::new("location", "money"),
        );
        let err = synth.synthesize(&cmd).unwrap_err();
        assert!(matches!(err, DdlError::Validation { object: "column", .. }));
        assert!(err.to_string().contains("'money'"));
    }

    #[test]
    fn test_modify_only_resolves_nothing() {
        // Existing columns keep their type even when the catalog lacks it
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect).strict_types(true);
        let cmd = ChangeCommand::column(
            ChangeKind::Modify,
            orders(),
            ColumnSpec::new("shape", "multipolygon"),
        );
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(
            actions[0].statement,
            "ALTER TABLE `shop`.`orders` MODIFY COLUMN `shape` multipolygon"
        );
    }

    #[test]
    fn test_create_column_empty_name() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::column(ChangeKind::Create, orders(), ColumnSpec::new("  ", "int"));
        assert!(matches!(
            synth.synthesize(&cmd),
            Err(DdlError::Validation { object: "column", .. })
        ));
    }

    #[test]
    fn test_modify_and_rename_require_type() {
        for dialect in [DialectKind::MySql, DialectKind::Postgres] {
            let dialect = dialect.build(QuotePolicy::Always);
            let synth = ActionSynthesizer::new(dialect.as_ref());
            let untyped = ColumnSpec::new("c", "  ");
            let commands = [
                ChangeCommand::column(ChangeKind::Modify, orders(), untyped.clone()),
                ChangeCommand::rename(
                    "old_c",
                    ObjectSnapshot::Column {
                        table: orders(),
                        column: untyped.clone(),
                    },
                ),
            ];
            for cmd in &commands {
                let err = synth.synthesize(cmd).unwrap_err();
                assert!(matches!(err, DdlError::Validation { object: "column", .. }));
                assert_eq!(err.to_string(), "Invalid column: 'c' has no type");
            }

            // New columns still fall back to the default type
            let cmd = ChangeCommand::column(ChangeKind::Create, orders(), untyped);
            let actions = synth.synthesize(&cmd).unwrap();
            assert!(actions[0].statement.ends_with(" integer"));
        }
    }

    #[test]
    fn test_rename_column_reuses_declaration() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::rename(
            "old_col",
            ObjectSnapshot::Column {
                table: orders(),
                column: ColumnSpec::new("new_col", "varchar")
                    .max_length(50)
                    .not_null(),
            },
        );
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Rename column");
        assert!(actions[0].statement.contains("`old_col`"));
        assert!(actions[0]
            .statement
            .contains("`new_col` varchar(50) NOT NULL"));
    }

    #[test]
    fn test_rename_requires_old_name() {
        let dialect = postgres();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::rename(
            "",
            ObjectSnapshot::View {
                schema: shop(),
                view: ViewSpec::new("v", "SELECT 1"),
            },
        );
        assert!(synth.synthesize(&cmd).is_err());
    }

    #[test]
    fn test_create_view() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::view(ChangeKind::Create, shop(), ViewSpec::new("v", "SELECT 1"));
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Create view");
        assert_eq!(
            actions[0].statement,
            "CREATE OR REPLACE VIEW `shop`.`v` AS SELECT 1"
        );

        let cmd = cmd.option(OPTION_OR_REPLACE, false);
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions[0].statement, "CREATE VIEW `shop`.`v` AS SELECT 1");
    }

    #[test]
    fn test_create_view_empty_source() {
        let dialect = postgres();
        let synth = ActionSynthesizer::new(&dialect);
        for source in ["", "  \n "] {
            let cmd =
                ChangeCommand::view(ChangeKind::Create, shop(), ViewSpec::new("v", source));
            let err = synth.synthesize(&cmd).unwrap_err();
            assert!(matches!(err, DdlError::Validation { object: "view", .. }));
        }
    }

    #[test]
    fn test_modify_view_replaces() {
        let dialect = postgres();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::view(
            ChangeKind::Modify,
            shop(),
            ViewSpec::new("v", "SELECT 2"),
        );
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].statement,
            "CREATE OR REPLACE VIEW \"shop\".\"v\" AS SELECT 2"
        );
    }

    #[test]
    fn test_drop_view() {
        let dialect = postgres();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::view(ChangeKind::Delete, shop(), ViewSpec::new("v", ""))
            .option(OPTION_IF_EXISTS, true);
        let actions = synth.synthesize(&cmd).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Drop view");
        assert_eq!(actions[0].statement, "DROP VIEW IF EXISTS \"shop\".\"v\"");
    }

    #[test]
    fn test_mysql_materialized_view_unsupported() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::view(
            ChangeKind::Create,
            shop(),
            ViewSpec::new("mv", "SELECT 1").materialized(),
        );
        assert!(matches!(
            synth.synthesize(&cmd),
            Err(DdlError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_synthesize_all_stops_at_first_error() {
        let dialect = mysql();
        let synth = ActionSynthesizer::new(&dialect);
        let commands = vec![
            ChangeCommand::view(ChangeKind::Create, shop(), ViewSpec::new("a", "SELECT 1")),
            ChangeCommand::view(ChangeKind::Create, shop(), ViewSpec::new("b", "")),
            ChangeCommand::view(ChangeKind::Delete, shop(), ViewSpec::new("c", "")),
        ];
        assert!(synth.synthesize_all(&commands).is_err());

        let actions = synth.synthesize_all(&[commands[0].clone(), commands[2].clone()]).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].statement, "DROP VIEW `shop`.`c`");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let dialect = postgres();
        let synth = ActionSynthesizer::new(&dialect);
        let cmd = ChangeCommand::column(
            ChangeKind::Modify,
            orders(),
            ColumnSpec::new("total", "numeric").precision(10, Some(2)),
        );
        assert_eq!(
            synth.synthesize(&cmd).unwrap(),
            synth.synthesize(&cmd).unwrap()
        );
    }
}
