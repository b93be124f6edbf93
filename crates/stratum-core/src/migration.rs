//! Migration entity: filename classification, statement splitting, and
//! placeholder exposure.
//!
//! A [`Migration`] is built once per file per run. Its checksum and
//! statement list are derived solely from the file content at parse
//! time and are never recomputed; if the underlying file changes, the
//! file must be re-parsed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::checksum::content_checksum;

/// The twelve lifecycle callback hooks, in lifecycle order.
pub const CALLBACK_KINDS: [CallbackKind; 12] = [
    CallbackKind::BeforeMigrate,
    CallbackKind::BeforeRepeatables,
    CallbackKind::BeforeEachMigrate,
    CallbackKind::BeforeEachMigrateStatement,
    CallbackKind::AfterEachMigrateStatement,
    CallbackKind::AfterEachMigrateStatementError,
    CallbackKind::AfterEachMigrate,
    CallbackKind::AfterEachMigrateError,
    CallbackKind::AfterMigrate,
    CallbackKind::AfterMigrateApplied,
    CallbackKind::AfterVersioned,
    CallbackKind::AfterMigrateError,
];

/// Lifecycle hook a callback migration is named after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Before migrate runs
    BeforeMigrate,
    /// Before all repeatable migrations during migrate
    BeforeRepeatables,
    /// Before every single migration during migrate
    BeforeEachMigrate,
    /// Before every single statement of a migration
    BeforeEachMigrateStatement,
    /// After every single successful statement of a migration
    AfterEachMigrateStatement,
    /// After every single failed statement of a migration
    AfterEachMigrateStatementError,
    /// After every single successful migration
    AfterEachMigrate,
    /// After every single failed migration
    AfterEachMigrateError,
    /// After successful migrate runs
    AfterMigrate,
    /// After successful migrate runs that applied at least one migration
    AfterMigrateApplied,
    /// After all versioned migrations during migrate
    AfterVersioned,
    /// After failed migrate runs
    AfterMigrateError,
}

impl CallbackKind {
    /// The reserved filename prefix for this hook.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackKind::BeforeMigrate => "beforeMigrate",
            CallbackKind::BeforeRepeatables => "beforeRepeatables",
            CallbackKind::BeforeEachMigrate => "beforeEachMigrate",
            CallbackKind::BeforeEachMigrateStatement => "beforeEachMigrateStatement",
            CallbackKind::AfterEachMigrateStatement => "afterEachMigrateStatement",
            CallbackKind::AfterEachMigrateStatementError => "afterEachMigrateStatementError",
            CallbackKind::AfterEachMigrate => "afterEachMigrate",
            CallbackKind::AfterEachMigrateError => "afterEachMigrateError",
            CallbackKind::AfterMigrate => "afterMigrate",
            CallbackKind::AfterMigrateApplied => "afterMigrateApplied",
            CallbackKind::AfterVersioned => "afterVersioned",
            CallbackKind::AfterMigrateError => "afterMigrateError",
        }
    }

    /// Classify a filename against the reserved callback names.
    ///
    /// Longest prefix wins: `afterEachMigrateStatementError.sql` must
    /// resolve to that hook, not to `afterEachMigrateStatement`.
    fn from_filename(filename: &str) -> Option<CallbackKind> {
        CALLBACK_KINDS
            .iter()
            .filter(|kind| filename.starts_with(kind.as_str()))
            .max_by_key(|kind| kind.as_str().len())
            .copied()
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationKind {
    /// Uniquely numbered, applied exactly once, in order
    Versioned,
    /// Filename-recognized rollback file; never executed by the apply loops
    Undo,
    /// Unnumbered, re-applied whenever its checksum changes
    Repeatable,
    /// Lifecycle hook script, executed at the matching point in the loop
    Callback(CallbackKind),
    /// In-memory statement list (housekeeping SQL) or an unclassified file
    Adhoc,
}

impl MigrationKind {
    /// True for versioned migrations.
    pub fn is_versioned(&self) -> bool {
        matches!(self, MigrationKind::Versioned)
    }

    /// True for repeatable migrations.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, MigrationKind::Repeatable)
    }

    /// True for undo migrations.
    pub fn is_undo(&self) -> bool {
        matches!(self, MigrationKind::Undo)
    }

    /// True for callback migrations.
    pub fn is_callback(&self) -> bool {
        matches!(self, MigrationKind::Callback(_))
    }

    /// The callback hook, when this is a callback migration.
    pub fn callback(&self) -> Option<CallbackKind> {
        match self {
            MigrationKind::Callback(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// A single classified, checksummed, statement-split migration.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Path the file was discovered at; `None` for ad-hoc units
    pub filepath: Option<PathBuf>,
    /// Root location the file was discovered under
    pub location: Option<String>,
    /// File suffix the discovery matched (e.g. `.sql`)
    pub suffix: Option<String>,
    /// Directory portion of `filepath`
    pub filedir: Option<String>,
    /// Final path component of `filepath`
    pub filename: Option<String>,
    /// Path relative to the location root; the ledger lookup key
    pub script: Option<String>,
    /// Human description from the filename segment after the separator
    pub name: Option<String>,
    pub kind: MigrationKind,
    /// Version number for versioned/undo migrations
    pub version: Option<i64>,
    /// Signed CRC-32 of the file content, computed at parse time
    pub checksum: Option<i32>,
    /// SQL statements in file order
    pub statements: Vec<String>,
    /// 1-based line number on which each statement ends
    pub statement_lines: Vec<usize>,
}

impl Migration {
    /// Parse a migration file into a classified record.
    ///
    /// Never fails: filenames that match no prefix rule degrade to
    /// [`MigrationKind::Adhoc`], which neither apply loop selects.
    pub fn parse(
        filepath: &Path,
        location: &str,
        suffix: &str,
        version_separator: &str,
        statement_separator: &str,
        content: &str,
    ) -> Migration {
        let filename = filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filedir = filepath
            .parent()
            .map(|d| d.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (kind, version, name) = classify(&filename, suffix, version_separator);
        let (statements, statement_lines) = split_statements(content, statement_separator);

        Migration {
            filepath: Some(filepath.to_path_buf()),
            location: Some(location.to_string()),
            suffix: Some(suffix.to_string()),
            filedir: Some(filedir),
            filename: Some(filename),
            script: Some(compute_script(filepath, location)),
            name,
            kind,
            version,
            checksum: Some(content_checksum(content)),
            statements,
            statement_lines,
        }
    }

    /// Build an in-memory ad-hoc migration from raw statements.
    ///
    /// Used for housekeeping SQL (history-table DDL and queries); such
    /// units carry no filepath and never receive ledger rows.
    pub fn from_statements(statements: Vec<String>) -> Migration {
        Migration {
            filepath: None,
            location: None,
            suffix: None,
            filedir: None,
            filename: None,
            script: None,
            name: None,
            kind: MigrationKind::Adhoc,
            version: None,
            checksum: None,
            statements,
            statement_lines: Vec::new(),
        }
    }

    /// True for file-backed migrations the ledger tracks (versioned,
    /// repeatable, undo) - excludes callbacks and ad-hoc units.
    pub fn is_tracked(&self) -> bool {
        matches!(
            self.kind,
            MigrationKind::Versioned | MigrationKind::Repeatable | MigrationKind::Undo
        )
    }

    /// Placeholder map exposing this migration's fields to callback SQL
    /// as `%filepath%`, `%filename%`, `%script%` and friends.
    pub fn placeholders(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Some(filepath) = &self.filepath {
            map.insert("filepath".to_string(), filepath.display().to_string());
        }
        if let Some(filedir) = &self.filedir {
            map.insert("filedir".to_string(), filedir.clone());
        }
        if let Some(filename) = &self.filename {
            map.insert("filename".to_string(), filename.clone());
        }
        if let Some(script) = &self.script {
            map.insert("script".to_string(), script.clone());
        }
        if let Some(name) = &self.name {
            map.insert("name".to_string(), name.clone());
        }
        if let Some(version) = self.version {
            map.insert("version".to_string(), version.to_string());
        }
        if let Some(checksum) = self.checksum {
            map.insert("checksum".to_string(), checksum.to_string());
        }
        map
    }
}

/// Classify a filename by its prefix, per the migration grammar
/// `{V|U|R|<callback-name>}[<number>]<separator><description>.<suffix>`.
fn classify(
    filename: &str,
    suffix: &str,
    version_separator: &str,
) -> (MigrationKind, Option<i64>, Option<String>) {
    let parts: Vec<&str> = filename.split(version_separator).collect();
    let description = parts
        .get(1)
        .and_then(|part| part.split(suffix).next())
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string());

    if filename.starts_with('V') {
        return (MigrationKind::Versioned, parse_version(parts[0]), description);
    }
    if filename.starts_with('U') {
        return (MigrationKind::Undo, parse_version(parts[0]), description);
    }
    if filename.starts_with('R') {
        return (MigrationKind::Repeatable, None, description);
    }
    if let Some(kind) = CallbackKind::from_filename(filename) {
        // Callback files usually have no description segment; fall back
        // to the first segment stripped of the suffix.
        let description = description.or_else(|| {
            parts
                .first()
                .and_then(|part| part.split(suffix).next())
                .filter(|d| !d.is_empty())
                .map(|d| d.to_string())
        });
        return (MigrationKind::Callback(kind), None, description);
    }
    (MigrationKind::Adhoc, None, description)
}

/// Parse the numeric tail of a version segment such as `V202` or `U7`.
fn parse_version(segment: &str) -> Option<i64> {
    segment.trim().get(1..).and_then(|v| v.parse::<i64>().ok())
}

/// Split file content into statements on lines that exactly equal the
/// statement separator.
///
/// Every delimiter closes a statement, including at end-of-file, and
/// the delimiter line itself is excluded. Returns the statements and
/// the 1-based line number each one ended on.
fn split_statements(content: &str, statement_separator: &str) -> (Vec<String>, Vec<usize>) {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut statements = Vec::new();
    let mut statement_lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (index, line) in lines.iter().copied().enumerate() {
        let is_separator = line == statement_separator;
        let is_last = index == lines.len() - 1;
        if !is_separator {
            current.push(line);
        }
        if is_separator || is_last {
            statements.push(current.join("\n"));
            statement_lines.push(index + 1);
            current.clear();
        }
    }

    (statements, statement_lines)
}

/// Compute the ledger `script` key: the path relative to its location
/// root. When the relative form does not exist on disk (non-canonical
/// inputs), fall back to a plain prefix-strip of the location string.
fn compute_script(filepath: &Path, location: &str) -> String {
    let location = location.strip_prefix("./").unwrap_or(location);
    let abs_file = std::path::absolute(filepath).unwrap_or_else(|_| filepath.to_path_buf());
    let abs_location =
        std::path::absolute(location).unwrap_or_else(|_| PathBuf::from(location));

    let relative = abs_file
        .strip_prefix(&abs_location)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| abs_file.to_string_lossy().into_owned());
    if Path::new(&relative).exists() {
        return relative;
    }

    let prefix = format!("{}{}", location, MAIN_SEPARATOR);
    let filepath = filepath.to_string_lossy();
    filepath.replacen(&prefix, "", 1)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
