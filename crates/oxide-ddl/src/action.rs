//! DDL actions and their execution contract.
//!
//! Synthesis produces an ordered list of [`DdlAction`]s. Running them is up to
//! an [`ActionExecutor`]; [`execute_actions`] drives one in order and stops at
//! the first failure.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label for adding a column.
pub const LABEL_ADD_COLUMN: &str = "Add column";
/// Label for modifying a column.
pub const LABEL_MODIFY_COLUMN: &str = "Modify column";
/// Label for renaming a column.
pub const LABEL_RENAME_COLUMN: &str = "Rename column";
/// Label for dropping a column.
pub const LABEL_DROP_COLUMN: &str = "Drop column";
/// Label for setting a column comment.
pub const LABEL_COMMENT_COLUMN: &str = "Comment column";
/// Label for creating (or replacing) a view.
pub const LABEL_CREATE_VIEW: &str = "Create view";
/// Label for renaming a view.
pub const LABEL_RENAME_VIEW: &str = "Rename view";
/// Label for dropping a view.
pub const LABEL_DROP_VIEW: &str = "Drop view";

/// One statement to execute, with a label for previews and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdlAction {
    /// Short imperative description. Never parsed.
    pub label: String,
    /// The statement text, without a trailing delimiter.
    pub statement: String,
}

impl DdlAction {
    /// Creates an action.
    #[must_use]
    pub fn new(label: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            statement: statement.into(),
        }
    }
}

/// Renders actions as a SQL script, one labelled statement per action.
#[must_use]
pub fn render_script(actions: &[DdlAction]) -> String {
    actions
        .iter()
        .map(|action| format!("-- {}\n{};\n", action.label, action.statement))
        .collect()
}

/// Something that can run DDL actions, one at a time.
pub trait ActionExecutor {
    /// Error produced by a failed action.
    type Error: std::error::Error + 'static;

    /// Runs one action.
    fn execute(&mut self, action: &DdlAction) -> Result<(), Self::Error>;
}

/// An action failed; the ones after it were not run.
#[derive(Debug, thiserror::Error)]
#[error("Action #{index} ({label}) failed: {source}")]
pub struct ExecutionError<E: std::error::Error + 'static> {
    /// Zero-based position of the failed action.
    pub index: usize,
    /// Label of the failed action.
    pub label: String,
    /// Executor error.
    #[source]
    pub source: E,
}

/// Runs actions in order, stopping at the first failure.
///
/// Returns the number of actions executed.
pub fn execute_actions<X: ActionExecutor>(
    executor: &mut X,
    actions: &[DdlAction],
) -> Result<usize, ExecutionError<X::Error>> {
    for (index, action) in actions.iter().enumerate() {
        debug!(index, label = %action.label, "Executing action");
        executor
            .execute(action)
            .map_err(|source| ExecutionError {
                index,
                label: action.label.clone(),
                source,
            })?;
    }
    Ok(actions.len())
}

/// Executor that writes each action to a script instead of a database.
pub struct ScriptWriter<W: Write> {
    out: W,
}

impl<W: Write> ScriptWriter<W> {
    /// Creates a script writer.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ActionExecutor for ScriptWriter<W> {
    type Error = std::io::Error;

    fn execute(&mut self, action: &DdlAction) -> Result<(), Self::Error> {
        write!(self.out, "{}", render_script(std::slice::from_ref(action)))
    }
}
