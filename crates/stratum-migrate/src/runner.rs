//! The migration runner: two-phase apply loop, lifecycle callbacks,
//! per-unit transactions, and checksum-drift detection.

use std::collections::BTreeMap;
use std::time::Instant;

use stratum_core::{
    natural_cmp, CallbackKind, Config, HistoryRecord, HistoryTable, Migration,
};
use stratum_db::{ClientFactory, PgClientFactory, SqlClient, SqlRow};

use crate::callback_index::CallbackIndex;
use crate::error::{MigrateError, MigrateResult};
use crate::executor::SqlExecutor;
use crate::loader::{ContentLoader, FsContentLoader};
use crate::locator::{FileLister, FsFileLister};

/// Fully-resolved options for one runner instance, as produced by the
/// config layer.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub dry_run: bool,
    pub database_url: Option<String>,
    pub locations: Vec<String>,
    pub history_table: String,
    pub history_schema: Option<String>,
    pub sql_migration_suffixes: Vec<String>,
    pub sql_migration_separator: String,
    pub sql_migration_statement_separator: String,
}

impl MigrateOptions {
    /// Build runner options from a loaded config plus the per-run flag.
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            dry_run,
            database_url: config.database_url.clone(),
            locations: config.locations.clone(),
            history_table: config.history_table.clone(),
            history_schema: config.history_schema.clone(),
            sql_migration_suffixes: config.sql_migration_suffixes.clone(),
            sql_migration_separator: config.sql_migration_separator.clone(),
            sql_migration_statement_separator: config
                .sql_migration_statement_separator
                .clone(),
        }
    }
}

/// The two apply phases, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Versioned,
    Repeatable,
}

/// Per-statement callback context for a migration being applied.
struct StatementHooks<'a> {
    index: &'a CallbackIndex,
    placeholders: &'a BTreeMap<String, String>,
}

/// Orchestrates one migration run.
///
/// Collaborators are constructor-injected and default to the
/// filesystem/Postgres implementations; tests swap in doubles.
pub struct MigrationRunner {
    options: MigrateOptions,
    history: HistoryTable,
    executor: SqlExecutor,
    lister: Box<dyn FileLister>,
    loader: Box<dyn ContentLoader>,
    factory: Box<dyn ClientFactory>,
}

impl MigrationRunner {
    /// Create a runner with the default collaborators.
    pub fn new(options: MigrateOptions) -> MigrateResult<Self> {
        Self::with_collaborators(
            options,
            Box::new(FsFileLister),
            Box::new(FsContentLoader),
            Box::new(PgClientFactory),
        )
    }

    /// Create a runner with injected collaborators.
    pub fn with_collaborators(
        options: MigrateOptions,
        lister: Box<dyn FileLister>,
        loader: Box<dyn ContentLoader>,
        factory: Box<dyn ClientFactory>,
    ) -> MigrateResult<Self> {
        if !options.dry_run && options.database_url.is_none() {
            return Err(MigrateError::MissingDatabaseUrl);
        }
        let history = HistoryTable::new(
            options.history_table.clone(),
            options.history_schema.clone(),
        );
        let executor = SqlExecutor::new(options.dry_run);
        Ok(Self {
            options,
            history,
            executor,
            lister,
            loader,
            factory,
        })
    }

    /// Run the full migration sequence: discover, order, parse, ensure
    /// the ledger, then apply versioned and repeatable migrations.
    pub async fn migrate(&self) -> MigrateResult<()> {
        if self.options.dry_run {
            log::info!("Dry run: true");
        }
        log::info!("Locations: {}", self.options.locations.join(","));
        log::info!("HistoryTable: {}", self.options.history_table);
        if let Some(url) = &self.options.database_url {
            log::info!("DatabaseUrl: {}", mask_database_url(url));
        }

        let migrations = self.load_migrations()?;
        log::info!(
            "Migrations: {}",
            migrations.iter().filter(|m| m.is_tracked()).count()
        );

        let client = match &self.options.database_url {
            Some(url) if !self.options.dry_run => Some(self.factory.connect(url).await?),
            _ => None,
        };
        let client = client.as_deref();

        self.apply_simple_unit(
            client,
            &Migration::from_statements(vec![self.history.create_table_sql()]),
            &BTreeMap::new(),
        )
        .await?;

        let history_rows = self
            .apply_simple_unit(
                client,
                &Migration::from_statements(vec![self.history.history_sql()]),
                &BTreeMap::new(),
            )
            .await?;
        let histories = history_rows
            .iter()
            .map(HistoryRecord::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let index = CallbackIndex::build(&migrations);

        self.run_phase(client, &migrations, &histories, &index, Phase::Versioned)
            .await?;
        self.run_phase(client, &migrations, &histories, &index, Phase::Repeatable)
            .await?;
        Ok(())
    }

    /// Discover, naturally order, and parse all candidate files.
    fn load_migrations(&self) -> MigrateResult<Vec<Migration>> {
        let mut files = self.lister.list(
            &self.options.locations,
            &self.options.sql_migration_suffixes,
        )?;
        files.sort_by(|a, b| {
            natural_cmp(&a.filepath.to_string_lossy(), &b.filepath.to_string_lossy())
        });

        let mut migrations = Vec::with_capacity(files.len());
        for file in files {
            let content = self.loader.load(&file.filepath)?;
            migrations.push(Migration::parse(
                &file.filepath,
                &file.location,
                &file.suffix,
                &self.options.sql_migration_separator,
                &self.options.sql_migration_statement_separator,
                &content,
            ));
        }
        Ok(migrations)
    }

    /// Run one apply phase over the migrations it selects.
    ///
    /// Phase-end callbacks fire only when the phase attempted at least
    /// one migration, so a run that applies nothing dispatches nothing.
    async fn run_phase(
        &self,
        client: Option<&dyn SqlClient>,
        migrations: &[Migration],
        histories: &[HistoryRecord],
        index: &CallbackIndex,
        phase: Phase,
    ) -> MigrateResult<()> {
        let pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| match phase {
                // Versioned: no successful row with this script+checksum.
                Phase::Versioned => {
                    m.kind.is_versioned()
                        && !histories.iter().any(|h| {
                            Some(h.script.as_str()) == m.script.as_deref()
                                && h.checksum == m.checksum
                                && h.success
                        })
                }
                // Repeatable: no row at all with this script+checksum -
                // a failed attempt with the same content counts as tried.
                Phase::Repeatable => {
                    m.kind.is_repeatable()
                        && !histories.iter().any(|h| {
                            Some(h.script.as_str()) == m.script.as_deref()
                                && h.checksum == m.checksum
                        })
                }
            })
            .collect();

        let mut attempted = 0usize;
        let outcome = self
            .apply_pending(client, &pending, histories, index, phase, &mut attempted)
            .await;

        let empty = BTreeMap::new();
        match outcome {
            Ok(()) => {
                if attempted > 0 {
                    self.run_callbacks(client, index, CallbackKind::AfterMigrate, &empty)
                        .await?;
                    self.run_callbacks(client, index, CallbackKind::AfterMigrateApplied, &empty)
                        .await?;
                    if phase == Phase::Versioned {
                        self.run_callbacks(client, index, CallbackKind::AfterVersioned, &empty)
                            .await?;
                    }
                }
                Ok(())
            }
            Err(error) => {
                if attempted > 0 {
                    self.run_callbacks(client, index, CallbackKind::AfterMigrateError, &empty)
                        .await?;
                }
                Err(error)
            }
        }
    }

    /// Apply each pending migration in order, dispatching the
    /// per-migration callbacks from its explicit outcome.
    async fn apply_pending(
        &self,
        client: Option<&dyn SqlClient>,
        pending: &[&Migration],
        histories: &[HistoryRecord],
        index: &CallbackIndex,
        phase: Phase,
        attempted: &mut usize,
    ) -> MigrateResult<()> {
        for &migration in pending {
            if phase == Phase::Versioned {
                // A successful row whose checksum no longer matches the
                // file is drift: abort before touching anything else.
                if let Some(record) = histories.iter().find(|h| {
                    Some(h.script.as_str()) == migration.script.as_deref() && h.success
                }) {
                    if record.checksum != migration.checksum {
                        return Err(MigrateError::ChecksumMismatch {
                            script: record.script.clone(),
                            recorded: display_checksum(record.checksum),
                            actual: display_checksum(migration.checksum),
                        });
                    }
                }
            }

            *attempted += 1;
            let placeholders = migration.placeholders();
            let named = migration.filename.is_some();

            if named {
                self.run_callbacks(client, index, CallbackKind::BeforeMigrate, &placeholders)
                    .await?;
                self.run_callbacks(client, index, CallbackKind::BeforeEachMigrate, &placeholders)
                    .await?;
            }

            let hooks = StatementHooks {
                index,
                placeholders: &placeholders,
            };
            let result = self
                .apply_migration(client, migration, &BTreeMap::new(), named.then_some(&hooks))
                .await;

            match result {
                Ok(_) => {
                    if named {
                        self.run_callbacks(
                            client,
                            index,
                            CallbackKind::AfterEachMigrate,
                            &placeholders,
                        )
                        .await?;
                    }
                }
                Err(error) => {
                    if named {
                        self.run_callbacks(
                            client,
                            index,
                            CallbackKind::AfterEachMigrateError,
                            &placeholders,
                        )
                        .await?;
                    }
                    return Err(error);
                }
            }
        }
        Ok(())
    }

    /// Apply one migration with ledger bookkeeping and per-statement
    /// callback hooks.
    ///
    /// Only file-backed, non-callback units receive ledger rows: the
    /// next rank is computed and a pending row inserted before the
    /// unit's transaction opens, and the row's outcome recorded after
    /// it closes either way.
    async fn apply_migration(
        &self,
        client: Option<&dyn SqlClient>,
        migration: &Migration,
        placeholders: &BTreeMap<String, String>,
        hooks: Option<&StatementHooks<'_>>,
    ) -> MigrateResult<Vec<SqlRow>> {
        let tracked = migration.filepath.is_some() && !migration.kind.is_callback();
        let own_placeholders = migration.placeholders();

        let mut installed_rank = 0;
        if tracked {
            let rows = self
                .apply_simple_unit(
                    client,
                    &Migration::from_statements(vec![self.history.next_rank_sql()]),
                    &own_placeholders,
                )
                .await?;
            installed_rank = rows
                .first()
                .and_then(|row| row.get("installed_rank").cloned().flatten())
                .and_then(|rank| rank.parse().ok())
                .unwrap_or(1);
        }

        let started = Instant::now();
        if tracked {
            self.apply_simple_unit(
                client,
                &Migration::from_statements(vec![
                    self.history.begin_row_sql(migration, installed_rank)
                ]),
                &own_placeholders,
            )
            .await?;
        }

        let result = self
            .run_transaction(client, migration, placeholders, hooks)
            .await;
        let execution_time = started.elapsed().as_millis() as i64;

        match result {
            Ok(rows) => {
                if tracked {
                    self.apply_simple_unit(
                        client,
                        &Migration::from_statements(vec![self.history.end_row_sql(
                            installed_rank,
                            execution_time,
                            true,
                        )]),
                        &own_placeholders,
                    )
                    .await?;
                }
                Ok(rows)
            }
            Err(error) => {
                if tracked {
                    self.apply_simple_unit(
                        client,
                        &Migration::from_statements(vec![self.history.end_row_sql(
                            installed_rank,
                            execution_time,
                            false,
                        )]),
                        &own_placeholders,
                    )
                    .await?;
                }
                Err(error)
            }
        }
    }

    /// Apply a unit with no ledger rows and no statement hooks:
    /// callbacks and housekeeping SQL.
    ///
    /// Callbacks themselves run through here, so this path must not
    /// dispatch callbacks of its own.
    async fn apply_simple_unit(
        &self,
        client: Option<&dyn SqlClient>,
        migration: &Migration,
        placeholders: &BTreeMap<String, String>,
    ) -> MigrateResult<Vec<SqlRow>> {
        let mut rows = Vec::new();
        self.executor.exec(client, "BEGIN", placeholders).await?;

        for (position, statement) in migration.statements.iter().enumerate() {
            match self.executor.exec(client, statement, placeholders).await {
                Ok(mut result) => rows.append(&mut result),
                Err(error) => {
                    self.log_statement_error(migration, position, statement, &error);
                    self.rollback(client, placeholders).await;
                    return Err(error);
                }
            }
        }

        match self.executor.exec(client, "COMMIT", placeholders).await {
            Ok(_) => Ok(rows),
            Err(error) => {
                self.rollback(client, placeholders).await;
                Err(error)
            }
        }
    }

    /// `BEGIN`, every statement with its callbacks, `COMMIT` - rolling
    /// back on any error, including one thrown by a callback.
    async fn run_transaction(
        &self,
        client: Option<&dyn SqlClient>,
        migration: &Migration,
        placeholders: &BTreeMap<String, String>,
        hooks: Option<&StatementHooks<'_>>,
    ) -> MigrateResult<Vec<SqlRow>> {
        match self
            .run_statements(client, migration, placeholders, hooks)
            .await
        {
            Ok(rows) => Ok(rows),
            Err(error) => {
                self.rollback(client, placeholders).await;
                Err(error)
            }
        }
    }

    /// The happy path of a migration transaction; any error here makes
    /// the caller roll back.
    async fn run_statements(
        &self,
        client: Option<&dyn SqlClient>,
        migration: &Migration,
        placeholders: &BTreeMap<String, String>,
        hooks: Option<&StatementHooks<'_>>,
    ) -> MigrateResult<Vec<SqlRow>> {
        let mut rows = Vec::new();
        self.executor.exec(client, "BEGIN", placeholders).await?;

        for (position, statement) in migration.statements.iter().enumerate() {
            if let Some(hooks) = hooks {
                self.run_callbacks(
                    client,
                    hooks.index,
                    CallbackKind::BeforeEachMigrateStatement,
                    hooks.placeholders,
                )
                .await?;
            }

            match self.executor.exec(client, statement, placeholders).await {
                Ok(mut result) => {
                    rows.append(&mut result);
                    if let Some(hooks) = hooks {
                        self.run_callbacks(
                            client,
                            hooks.index,
                            CallbackKind::AfterEachMigrateStatement,
                            hooks.placeholders,
                        )
                        .await?;
                    }
                }
                Err(error) => {
                    self.log_statement_error(migration, position, statement, &error);
                    if let Some(hooks) = hooks {
                        self.run_callbacks(
                            client,
                            hooks.index,
                            CallbackKind::AfterEachMigrateStatementError,
                            hooks.placeholders,
                        )
                        .await?;
                    }
                    return Err(error);
                }
            }
        }

        self.executor.exec(client, "COMMIT", placeholders).await?;
        Ok(rows)
    }

    /// Roll the current transaction back, logging (not raising) any
    /// rollback failure so the original error survives. Skipped
    /// entirely in dry-run.
    async fn rollback(&self, client: Option<&dyn SqlClient>, placeholders: &BTreeMap<String, String>) {
        if self.options.dry_run {
            return;
        }
        if let Err(error) = self.executor.exec(client, "ROLLBACK", placeholders).await {
            log::error!("rollback failed: {}", error);
        }
    }

    /// Dispatch every callback registered for a lifecycle hook.
    async fn run_callbacks(
        &self,
        client: Option<&dyn SqlClient>,
        index: &CallbackIndex,
        kind: CallbackKind,
        placeholders: &BTreeMap<String, String>,
    ) -> MigrateResult<()> {
        for callback in index.get(kind) {
            self.apply_simple_unit(client, callback, placeholders)
                .await?;
        }
        Ok(())
    }

    /// Point at the failing statement with a `file:line:column` that
    /// editors can jump to.
    fn log_statement_error(
        &self,
        migration: &Migration,
        position: usize,
        statement: &str,
        error: &MigrateError,
    ) {
        let line = if position == 0 {
            1
        } else {
            migration
                .statement_lines
                .get(position - 1)
                .copied()
                .unwrap_or(0)
                + 1
        };
        if let Some(filepath) = &migration.filepath {
            log::error!("statement failed at {}:{}:1", filepath.display(), line);
        }
        log::error!("statement error: {}", error);
        log::error!("statement query: {}", statement);
    }
}

/// Render an optional ledger checksum for error messages.
fn display_checksum(checksum: Option<i32>) -> String {
    checksum.map_or_else(|| "null".to_string(), |c| c.to_string())
}

/// Mask the password portion of a connection string for logging.
fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let credentials_start = scheme_end + 3;
    let rest = &url[credentials_start..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    let credentials = &rest[..at];
    match credentials.find(':') {
        Some(colon) => format!(
            "{}{}:********{}",
            &url[..credentials_start],
            &credentials[..colon],
            &rest[at..],
        ),
        None => url.to_string(),
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
