//! Info command implementation - read-only history report

use anyhow::{Context, Result};
use stratum_core::{HistoryRecord, HistoryTable};
use stratum_db::{ClientFactory, PgClientFactory};

use crate::cli::{GlobalArgs, InfoArgs};
use crate::commands::common;

/// Execute the info command
pub(crate) async fn execute(args: &InfoArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = common::load_config(global)?;
    if args.database_url.is_some() {
        config.database_url = args.database_url.clone();
    }
    let database_url = config
        .database_url
        .as_deref()
        .context("database_url not set (pass --database-url or set DATABASE_URL)")?;

    log::info!("HistoryTable: {}", config.history_table);

    let history = HistoryTable::new(
        config.history_table.clone(),
        config.history_schema.clone(),
    );
    let client = PgClientFactory
        .connect(database_url)
        .await
        .context("Failed to connect to the database")?;
    let rows = client
        .query(&history.history_sql())
        .await
        .context("Failed to read migration history")?;
    let records = rows
        .iter()
        .map(HistoryRecord::from_row)
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to decode migration history")?;

    log::info!("Migrations: {}", records.len());

    let report: Vec<InfoRow> = records.iter().map(InfoRow::from_record).collect();
    print_table(&report);
    Ok(())
}

/// History row prepared for display
#[derive(Debug)]
struct InfoRow {
    category: &'static str,
    version: String,
    description: String,
    migration_type: String,
    installed_on: String,
    state: &'static str,
    undoable: &'static str,
}

impl InfoRow {
    fn from_record(record: &HistoryRecord) -> Self {
        let state = if record.success { "Success" } else { "Failed" };
        let category = if record.success && record.version.is_none() {
            "Repeatable"
        } else {
            "Versioned"
        };
        let undoable = if record.migration_type == "UNDO_SQL" {
            "Yes"
        } else {
            "No"
        };
        InfoRow {
            category,
            version: record.version.clone().unwrap_or_else(|| "-".to_string()),
            description: record.description.clone(),
            migration_type: record.migration_type.clone(),
            // Trim the server's fractional seconds down to wall-clock.
            installed_on: record.installed_on.chars().take(19).collect(),
            state,
            undoable,
        }
    }
}

/// Print history rows in table format
fn print_table(rows: &[InfoRow]) {
    let category_width = width(rows.iter().map(|r| r.category.len()), "CATEGORY".len());
    let version_width = width(rows.iter().map(|r| r.version.len()), "VERSION".len());
    let description_width = width(
        rows.iter().map(|r| r.description.len()),
        "DESCRIPTION".len(),
    );
    let type_width = width(rows.iter().map(|r| r.migration_type.len()), "TYPE".len());
    let installed_width = width(
        rows.iter().map(|r| r.installed_on.len()),
        "INSTALLED ON".len(),
    );
    let state_width = width(rows.iter().map(|r| r.state.len()), "STATE".len());

    println!(
        "{:<category_width$}  {:<version_width$}  {:<description_width$}  {:<type_width$}  {:<installed_width$}  {:<state_width$}  UNDOABLE",
        "CATEGORY", "VERSION", "DESCRIPTION", "TYPE", "INSTALLED ON", "STATE",
    );
    println!(
        "{:-<category_width$}  {:-<version_width$}  {:-<description_width$}  {:-<type_width$}  {:-<installed_width$}  {:-<state_width$}  {}",
        "", "", "", "", "", "", "-".repeat("UNDOABLE".len()),
    );

    for row in rows {
        println!(
            "{:<category_width$}  {:<version_width$}  {:<description_width$}  {:<type_width$}  {:<installed_width$}  {:<state_width$}  {}",
            row.category,
            row.version,
            row.description,
            row.migration_type,
            row.installed_on,
            row.state,
            row.undoable,
        );
    }

    println!();
    println!("{} migrations recorded", rows.len());
}

fn width(lengths: impl Iterator<Item = usize>, header: usize) -> usize {
    lengths.max().unwrap_or(header).max(header)
}

#[cfg(test)]
#[path = "info_test.rs"]
mod tests;
