//! Object snapshot types.
//!
//! These types describe the columns and views a change command targets. They
//! are owned by whoever edits the catalog; synthesis only reads them.

use serde::{Deserialize, Serialize};

/// Name of a database object together with the containers it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    /// Object name.
    pub name: String,
    /// Parent containers (catalog, schema), outermost first.
    #[serde(default)]
    pub qualified_path: Vec<String>,
}

impl ObjectIdentity {
    /// Creates an unqualified identity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_path: Vec::new(),
        }
    }

    /// Adds a parent container (appended after the existing ones).
    #[must_use]
    pub fn within(mut self, container: impl Into<String>) -> Self {
        self.qualified_path.push(container.into());
        self
    }

    /// Creates an identity from a schema path and a name.
    #[must_use]
    pub fn qualified(path: &[String], name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_path: path.to_vec(),
        }
    }
}

/// Snapshot of a table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Type name as the dialect spells it (e.g. "varchar", "decimal(10,2)").
    pub declared_type: String,
    /// Maximum length for character and binary types.
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Numeric precision.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Numeric scale.
    #[serde(default)]
    pub scale: Option<u32>,
    /// Whether the column allows NULL values.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Default value expression, emitted verbatim.
    #[serde(default)]
    pub default_expr: Option<String>,
    /// Whether the server generates values for this column.
    #[serde(default)]
    pub auto_generated: bool,
    /// Extra column clause reported by the server (e.g. "on update CURRENT_TIMESTAMP").
    #[serde(default)]
    pub extra_info: Option<String>,
    /// Column comment.
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSpec {
    /// Creates a nullable column with the given type and no other attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            max_length: None,
            precision: None,
            scale: None,
            nullable: true,
            default_expr: None,
            auto_generated: false,
            extra_info: None,
            comment: None,
        }
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Sets precision and scale.
    #[must_use]
    pub fn precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default_expr = Some(expr.into());
        self
    }

    /// Marks the column as server-generated.
    #[must_use]
    pub fn auto_generated(mut self) -> Self {
        self.auto_generated = true;
        self
    }

    /// Sets the extra clause.
    #[must_use]
    pub fn extra_info(mut self, extra: impl Into<String>) -> Self {
        self.extra_info = Some(extra.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns the type with its length or precision, e.g. `varchar(100)`.
    ///
    /// Parameters go right after the type name, before attributes and array
    /// suffixes: `int unsigned` with length 11 is `int(11) unsigned`. A
    /// declared type that already carries parameters is returned as is.
    /// Zero lengths are treated as absent.
    #[must_use]
    pub fn full_type_name(&self) -> String {
        let declared = self.declared_type.trim();
        if declared.contains('(') {
            return declared.to_string();
        }
        let params = if let Some(length) = self.max_length.filter(|l| *l > 0) {
            format!("({length})")
        } else {
            match (self.precision.filter(|p| *p > 0), self.scale) {
                (Some(p), Some(s)) => format!("({p},{s})"),
                (Some(p), None) => format!("({p})"),
                _ => return declared.to_string(),
            }
        };
        let (name, suffix) = split_type_suffix(declared);
        format!("{name}{params}{suffix}")
    }
}

// Words that follow the parameter list rather than precede it.
const TYPE_ATTRIBUTES: &[&str] = &[
    " unsigned",
    " signed",
    " zerofill",
    " with time zone",
    " without time zone",
];

/// Splits a type into its name and the attributes or `[]` suffix after it.
fn split_type_suffix(declared: &str) -> (&str, &str) {
    let lower = declared.to_ascii_lowercase();
    let at = TYPE_ATTRIBUTES
        .iter()
        .filter_map(|attr| lower.find(attr))
        .chain(lower.find('['))
        .min()
        .unwrap_or(declared.len());
    declared.split_at(at)
}

/// Whether a view is a plain view or stores its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Plain view.
    #[default]
    View,
    /// Materialized view.
    Materialized,
}

/// Snapshot of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// View name.
    pub name: String,
    /// The SELECT defining the view, or a complete CREATE statement.
    #[serde(default)]
    pub source_text: String,
    /// View kind.
    #[serde(default)]
    pub view_kind: ViewKind,
}

impl ViewSpec {
    /// Creates a plain view.
    #[must_use]
    pub fn new(name: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_text: source_text.into(),
            view_kind: ViewKind::View,
        }
    }

    /// Makes this a materialized view.
    #[must_use]
    pub fn materialized(mut self) -> Self {
        self.view_kind = ViewKind::Materialized;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_type_name() {
        assert_eq!(
            ColumnSpec::new("a", "varchar").max_length(50).full_type_name(),
            "varchar(50)"
        );
        assert_eq!(
            ColumnSpec::new("a", "decimal")
                .precision(10, Some(2))
                .full_type_name(),
            "decimal(10,2)"
        );
        assert_eq!(
            ColumnSpec::new("a", "float").precision(7, None).full_type_name(),
            "float(7)"
        );
        assert_eq!(
            ColumnSpec::new("a", "integer").max_length(0).full_type_name(),
            "integer"
        );
        assert_eq!(
            ColumnSpec::new("a", "character varying")
                .max_length(20)
                .full_type_name(),
            "character varying(20)"
        );
        // Already parameterized types are left alone
        assert_eq!(
            ColumnSpec::new("a", "enum('a','b')")
                .max_length(10)
                .full_type_name(),
            "enum('a','b')"
        );
    }

    #[test]
    fn test_full_type_name_keeps_attributes_after_params() {
        assert_eq!(
            ColumnSpec::new("n", "int unsigned").max_length(11).full_type_name(),
            "int(11) unsigned"
        );
        assert_eq!(
            ColumnSpec::new("n", "INT UNSIGNED ZEROFILL")
                .max_length(8)
                .full_type_name(),
            "INT(8) UNSIGNED ZEROFILL"
        );
        assert_eq!(
            ColumnSpec::new("tags", "varchar[]").max_length(20).full_type_name(),
            "varchar(20)[]"
        );
        assert_eq!(
            ColumnSpec::new("at", "timestamp with time zone")
                .precision(3, None)
                .full_type_name(),
            "timestamp(3) with time zone"
        );
        assert_eq!(
            ColumnSpec::new("price", "decimal unsigned")
                .precision(10, Some(2))
                .full_type_name(),
            "decimal(10,2) unsigned"
        );
        assert_eq!(
            ColumnSpec::new("n", "int unsigned").full_type_name(),
            "int unsigned"
        );
    }

    #[test]
    fn test_column_spec_deserialize_defaults() {
        let col: ColumnSpec =
            serde_json::from_str(r#"{"name": "id", "declared_type": "bigint"}"#).unwrap();
        assert!(col.nullable);
        assert!(!col.auto_generated);
        assert_eq!(col.comment, None);
    }

    #[test]
    fn test_identity_builder() {
        let id = ObjectIdentity::new("orders").within("shop");
        assert_eq!(id.name, "orders");
        assert_eq!(id.qualified_path, vec!["shop"]);
    }
}
