//! Dialect-aware DDL synthesis for schema editors.
//!
//! `oxide-ddl` turns a description of one pending schema change (create,
//! modify, rename or delete a column or view) into the ordered list of DDL
//! statements that carry it out on a specific database engine.
//!
//! # Architecture
//!
//! - **Dialect** - Quoting, type catalog, modifier table and statement
//!   grammar of one engine (MySQL, PostgreSQL)
//! - **Modifiers** - Fragment generators that make up a column declaration,
//!   listed per dialect in declaration order
//! - **Declaration builder** - Joins the quoted name and modifier fragments
//! - **Synthesizer** - Validates a [`command::ChangeCommand`] and emits
//!   [`action::DdlAction`]s
//! - **Actions** - Labelled statements, script rendering and an in-order
//!   executor contract
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let dialect = MySqlDialect::new();
//! let command = ChangeCommand::rename(
//!     "old_col",
//!     ObjectSnapshot::Column {
//!         table: ObjectIdentity::new("orders").within("shop"),
//!         column: ColumnSpec::new("new_col", "varchar").max_length(50).not_null(),
//!     },
//! );
//!
//! let actions = ActionSynthesizer::new(&dialect).synthesize(&command)?;
//! assert_eq!(
//!     actions[0].statement,
//!     "ALTER TABLE `shop`.`orders` CHANGE `old_col` `new_col` varchar(50) NOT NULL"
//! );
//! # Ok::<(), oxide_ddl::error::DdlError>(())
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the DDL script for a change file
//! oxide-ddl --dialect postgresql changes.json
//!
//! # Read commands from stdin, emit JSON actions
//! cat changes.json | oxide-ddl --format json
//! ```

pub mod action;
pub mod catalog;
pub mod command;
pub mod declaration;
pub mod dialect;
pub mod error;
pub mod input;
pub mod modifier;
pub mod schema;
pub mod synthesizer;
pub mod template;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::action::{
        execute_actions, render_script, ActionExecutor, DdlAction, ExecutionError, ScriptWriter,
    };
    pub use crate::catalog::{DataKind, ResolvedType, TypeCatalog, TypeRequest, TypeResolution};
    pub use crate::command::{ChangeCommand, ChangeKind, CommandOptions, ObjectSnapshot};
    pub use crate::declaration::DeclarationBuilder;
    pub use crate::dialect::{
        Dialect, DialectKind, DropOptions, MySqlDialect, PostgresDialect, QuotePolicy,
    };
    pub use crate::error::{DdlError, Result};
    pub use crate::modifier::{ColumnModifier, ModifierId};
    pub use crate::schema::{ColumnSpec, ObjectIdentity, ViewKind, ViewSpec};
    pub use crate::synthesizer::ActionSynthesizer;
}
