//! Example: Column Editor Preview
//!
//! This example walks a table through the changes a schema editor would
//! make, printing the DDL preview for MySQL and PostgreSQL side by side.
//!
//! Run with: cargo run --example column_editor -p oxide-ddl

use oxide_ddl::prelude::*;
use oxide_ddl::template;

// =============================================================================
// Changes
// =============================================================================

fn changes(dialect: &dyn Dialect) -> Vec<ChangeCommand> {
    let table = ObjectIdentity::new("customers").within("crm");
    let existing = ["id", "email", "column1"];

    // A fresh column starts from the template, then gets edited
    let placeholder = template::new_column(dialect, &existing);
    let nickname = ColumnSpec {
        comment: Some("Display name".to_string()),
        ..placeholder.clone()
    };

    vec![
        ChangeCommand::column(ChangeKind::Create, table.clone(), nickname),
        ChangeCommand::column(
            ChangeKind::Modify,
            table.clone(),
            ColumnSpec::new("email", "varchar")
                .max_length(320)
                .not_null(),
        ),
        ChangeCommand::rename(
            placeholder.name,
            ObjectSnapshot::Column {
                table: table.clone(),
                column: ColumnSpec::new("nickname", "varchar").max_length(100),
            },
        ),
        ChangeCommand::view(
            ChangeKind::Create,
            vec!["crm".to_string()],
            ViewSpec::new("active_customers", "SELECT id, email FROM crm.customers"),
        ),
        ChangeCommand::column(ChangeKind::Delete, table, ColumnSpec::new("legacy_flag", "bool"))
            .option("if_exists", true),
    ]
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    for kind in [DialectKind::MySql, DialectKind::Postgres] {
        let dialect = kind.build(QuotePolicy::WhenNeeded);
        let synthesizer = ActionSynthesizer::new(dialect.as_ref());
        let actions = synthesizer.synthesize_all(&changes(dialect.as_ref()))?;

        println!("-- ==== {kind} ====");
        print!("{}", render_script(&actions));
        println!();
    }
    Ok(())
}
