//! Column modifiers.
//!
//! A modifier renders one clause of a column declaration from the column
//! snapshot. Dialects list their modifiers in a static table; the order of
//! that table is the order of the clauses in the declaration.

use std::fmt;

use crate::command::ChangeKind;
use crate::schema::ColumnSpec;

/// MySQL's auto-increment keyword.
pub const AUTO_INCREMENT: &str = "AUTO_INCREMENT";

/// Renders one declaration fragment, or `None` when the clause does not apply.
pub type ModifierFn = fn(&ColumnSpec, &ChangeKind) -> Option<String>;

/// Identifies a built-in modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierId {
    /// Full type name.
    DataType,
    /// `DEFAULT <expr>`.
    Default,
    /// `NOT NULL`.
    NullNotNull,
    /// Server-reported extra clause.
    ExtraInfo,
    /// `AUTO_INCREMENT`.
    AutoIncrement,
    /// `COMMENT '<text>'`.
    Comment,
}

/// A modifier table entry.
#[derive(Clone, Copy)]
pub struct ColumnModifier {
    /// Which clause this is.
    pub id: ModifierId,
    /// Fragment generator.
    pub render: ModifierFn,
}

impl ColumnModifier {
    /// Returns the built-in modifier for an id.
    #[must_use]
    pub const fn builtin(id: ModifierId) -> Self {
        let render: ModifierFn = match id {
            ModifierId::DataType => data_type,
            ModifierId::Default => default_value,
            ModifierId::NullNotNull => null_not_null,
            ModifierId::ExtraInfo => extra_info,
            ModifierId::AutoIncrement => auto_increment,
            ModifierId::Comment => comment,
        };
        Self { id, render }
    }

    /// Renders this modifier's fragment.
    #[must_use]
    pub fn apply(&self, column: &ColumnSpec, change: &ChangeKind) -> Option<String> {
        (self.render)(column, change)
    }
}

impl fmt::Debug for ColumnModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnModifier").field(&self.id).finish()
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

/// `varchar(100)`, `decimal(10,2)`, ...
#[must_use]
pub fn data_type(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    Some(column.full_type_name())
}

/// `DEFAULT <expr>` when a default expression is set.
#[must_use]
pub fn default_value(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    non_empty(column.default_expr.as_ref()).map(|expr| format!("DEFAULT {expr}"))
}

/// `NOT NULL` for required columns.
#[must_use]
pub fn null_not_null(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    (!column.nullable).then(|| "NOT NULL".to_string())
}

/// The extra clause, verbatim.
#[must_use]
pub fn extra_info(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    non_empty(column.extra_info.as_ref()).map(str::to_string)
}

/// `AUTO_INCREMENT`, unless the extra clause already carries it.
#[must_use]
pub fn auto_increment(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    if !column.auto_generated {
        return None;
    }
    let already_present = non_empty(column.extra_info.as_ref())
        .is_some_and(|extra| extra.to_lowercase().contains("auto_increment"));
    (!already_present).then(|| AUTO_INCREMENT.to_string())
}

/// `COMMENT '<text>'` with quotes escaped.
#[must_use]
pub fn comment(column: &ColumnSpec, _change: &ChangeKind) -> Option<String> {
    non_empty(column.comment.as_ref()).map(|text| format!("COMMENT '{}'", escape_comment(text)))
}

/// Escapes single quotes with a backslash.
///
/// Backslashes already in the text are left untouched, so this is not a
/// general-purpose string literal escaper.
#[must_use]
pub fn escape_comment(comment: &str) -> String {
    comment.replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(id: ModifierId, column: &ColumnSpec) -> Option<String> {
        ColumnModifier::builtin(id).apply(column, &ChangeKind::Modify)
    }

    #[test]
    fn test_data_type_modifier() {
        let col = ColumnSpec::new("name", "varchar").max_length(50);
        assert_eq!(
            render(ModifierId::DataType, &col),
            Some("varchar(50)".to_string())
        );
    }

    #[test]
    fn test_optional_modifiers_skip_empty_fields() {
        let col = ColumnSpec::new("name", "varchar")
            .default_expr("")
            .extra_info("")
            .comment("");
        assert_eq!(render(ModifierId::Default, &col), None);
        assert_eq!(render(ModifierId::ExtraInfo, &col), None);
        assert_eq!(render(ModifierId::Comment, &col), None);
        assert_eq!(render(ModifierId::NullNotNull, &col), None);
        assert_eq!(render(ModifierId::AutoIncrement, &col), None);
    }

    #[test]
    fn test_default_and_not_null() {
        let col = ColumnSpec::new("qty", "int").default_expr("0").not_null();
        assert_eq!(
            render(ModifierId::Default, &col),
            Some("DEFAULT 0".to_string())
        );
        assert_eq!(
            render(ModifierId::NullNotNull, &col),
            Some("NOT NULL".to_string())
        );
    }

    #[test]
    fn test_auto_increment_suppressed_by_extra_info() {
        let col = ColumnSpec::new("id", "bigint").auto_generated();
        assert_eq!(
            render(ModifierId::AutoIncrement, &col),
            Some("AUTO_INCREMENT".to_string())
        );

        let col = col.extra_info("auto_increment");
        assert_eq!(render(ModifierId::AutoIncrement, &col), None);

        let col = ColumnSpec::new("id", "bigint")
            .auto_generated()
            .extra_info("Auto_Increment");
        assert_eq!(render(ModifierId::AutoIncrement, &col), None);
    }

    #[test]
    fn test_escape_comment() {
        assert_eq!(escape_comment("O'Brien"), "O\\'Brien");
        assert_eq!(escape_comment("a\\b \"c\""), "a\\b \"c\"");
        let col = ColumnSpec::new("owner", "varchar").comment("O'Brien's");
        assert_eq!(
            render(ModifierId::Comment, &col),
            Some("COMMENT 'O\\'Brien\\'s'".to_string())
        );
    }
}
