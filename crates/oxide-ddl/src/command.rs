//! Change commands.
//!
//! A [`ChangeCommand`] describes one pending change to one object: what kind
//! of change, a snapshot of the object as it should look afterwards, and a
//! bag of options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnSpec, ObjectIdentity, ViewSpec};

/// Option key: add `IF EXISTS` to drop statements.
pub const OPTION_IF_EXISTS: &str = "if_exists";
/// Option key: add `CASCADE` to drop statements.
pub const OPTION_CASCADE: &str = "cascade";
/// Option key: use `CREATE OR REPLACE` for views (default true).
pub const OPTION_OR_REPLACE: &str = "or_replace";

/// What is being done to the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeKind {
    /// The object is new.
    Create,
    /// The object exists and its definition changed.
    Modify,
    /// The object exists under `old_name`; the snapshot carries the new name.
    Rename {
        /// Name before the rename.
        old_name: String,
    },
    /// The object is removed.
    Delete,
}

impl ChangeKind {
    /// Short lowercase name used in logs and error messages.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Rename { .. } => "rename",
            Self::Delete => "delete",
        }
    }
}

/// The object a command targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum ObjectSnapshot {
    /// A table column.
    Column {
        /// The owning table.
        table: ObjectIdentity,
        /// The column.
        column: ColumnSpec,
    },
    /// A view.
    View {
        /// Containers the view lives in, outermost first.
        #[serde(default)]
        schema: Vec<String>,
        /// The view.
        view: ViewSpec,
    },
}

impl ObjectSnapshot {
    /// Returns the object's (new) name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Column { column, .. } => &column.name,
            Self::View { view, .. } => &view.name,
        }
    }

    /// Returns "column" or "view".
    #[must_use]
    pub fn object_type(&self) -> &'static str {
        match self {
            Self::Column { .. } => "column",
            Self::View { .. } => "view",
        }
    }
}

/// Extra settings attached to a command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandOptions(BTreeMap<String, serde_json::Value>);

impl CommandOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a raw option value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Returns a boolean option, or `default` when absent or not a boolean.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(default)
    }

    /// Returns true if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One pending change to one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeCommand {
    /// The kind of change.
    pub kind: ChangeKind,
    /// The target object.
    pub target: ObjectSnapshot,
    /// Options.
    #[serde(default, skip_serializing_if = "CommandOptions::is_empty")]
    pub options: CommandOptions,
}

impl ChangeCommand {
    /// Creates a command with no options.
    #[must_use]
    pub fn new(kind: ChangeKind, target: ObjectSnapshot) -> Self {
        Self {
            kind,
            target,
            options: CommandOptions::new(),
        }
    }

    /// Creates a command targeting a column.
    #[must_use]
    pub fn column(kind: ChangeKind, table: ObjectIdentity, column: ColumnSpec) -> Self {
        Self::new(kind, ObjectSnapshot::Column { table, column })
    }

    /// Creates a command targeting a view.
    #[must_use]
    pub fn view(kind: ChangeKind, schema: Vec<String>, view: ViewSpec) -> Self {
        Self::new(kind, ObjectSnapshot::View { schema, view })
    }

    /// Creates a rename command.
    #[must_use]
    pub fn rename(old_name: impl Into<String>, target: ObjectSnapshot) -> Self {
        Self::new(
            ChangeKind::Rename {
                old_name: old_name.into(),
            },
            target,
        )
    }

    /// Sets an option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options = self.options.with(key, value);
        self
    }
}
