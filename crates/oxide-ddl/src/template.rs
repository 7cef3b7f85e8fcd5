//! Placeholder objects.
//!
//! Editors create a new column or view from a template and let the user fill
//! in the details before any DDL is synthesized.

use crate::catalog::{DataKind, TypeRequest};
use crate::dialect::Dialect;
use crate::schema::{ColumnSpec, ViewSpec};

/// Name given to new views.
pub const NEW_VIEW_NAME: &str = "new_view";

/// Length given to new string columns.
pub const NEW_COLUMN_LENGTH: u32 = 100;

/// Returns the first `column<N>` name (N >= 1) not in `existing`.
///
/// Comparison is case-insensitive.
#[must_use]
pub fn next_column_name<S: AsRef<str>>(existing: &[S]) -> String {
    let taken: Vec<String> = existing
        .iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();
    (1..)
        .map(|n| format!("column{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default()
}

/// Creates a nullable placeholder column for a table with the given columns.
///
/// The type is the dialect's `varchar` with a length of 100, or its default
/// type without a length when the catalog has no `varchar`.
#[must_use]
pub fn new_column<S: AsRef<str>>(dialect: &dyn Dialect, existing: &[S]) -> ColumnSpec {
    let name = next_column_name(existing);
    let catalog = dialect.type_catalog();
    match catalog.resolve(&TypeRequest::named("varchar")) {
        Ok(resolved) if resolved.kind == DataKind::String => {
            ColumnSpec::new(name, resolved.name).max_length(NEW_COLUMN_LENGTH)
        }
        Ok(resolved) => ColumnSpec::new(name, resolved.name),
        Err(_) => ColumnSpec::new(name, catalog.default_type().name),
    }
}

/// Creates an empty placeholder view.
///
/// Its source text is empty, so it must be filled in before it can be created.
#[must_use]
pub fn new_view() -> ViewSpec {
    ViewSpec::new(NEW_VIEW_NAME, "")
}
