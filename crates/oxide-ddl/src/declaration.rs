//! Column declaration builder.
//!
//! A declaration is the quoted column name followed by the fragments of the
//! dialect's modifier table, in table order, each preceded by one space.

use crate::command::ChangeKind;
use crate::dialect::Dialect;
use crate::modifier::ColumnModifier;
use crate::schema::ColumnSpec;

/// Builds column declarations for one dialect.
#[derive(Clone, Copy)]
pub struct DeclarationBuilder<'d> {
    dialect: &'d dyn Dialect,
    modifiers: &'d [ColumnModifier],
}

impl<'d> DeclarationBuilder<'d> {
    /// Creates a builder using the dialect's modifier table.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            modifiers: dialect.modifiers(),
        }
    }

    /// Replaces the modifier table.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: &'d [ColumnModifier]) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builds the declaration of `column` for the pending change.
    #[must_use]
    pub fn build(&self, column: &ColumnSpec, change: &ChangeKind) -> String {
        let mut decl = self.dialect.quote_identifier(&column.name);
        for modifier in self.modifiers {
            if let Some(fragment) = modifier.apply(column, change) {
                if fragment.is_empty() {
                    continue;
                }
                decl.push(' ');
                decl.push_str(&fragment);
            }
        }
        decl
    }
}
