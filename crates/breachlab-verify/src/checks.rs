//! The six verification stages, in their fixed run order: toolchain,
//! dependencies, project files, directories, database, vulnerability
//! signatures.
//!
//! Each stage prints its own findings as it runs; [`run`] collects the
//! verdicts into a [`VerifyReport`]. Stages never abort the run, so one
//! pass reports every problem at once.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::process::Command;

use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

use crate::report::{StageResult, VerifyReport};
use crate::signatures::{self, PRIMARY_SOURCE, VulnSignature};

/// Oldest toolchain the workspace builds on (edition 2024).
pub const RUST_VERSION_FLOOR: (u64, u64) = (1, 85);

/// Crates the application cannot run without.
pub const REQUIRED_CRATES: &[&str] = &["axum", "sqlx", "minijinja", "bincode"];

/// Files a complete checkout must contain, relative to the root.
pub const REQUIRED_FILES: &[&str] = &[
    "Cargo.toml",
    "README.md",
    "static/style.css",
    "crates/breachlab-server/src/sinks.rs",
    "crates/breachlab-server/src/handlers.rs",
    "crates/breachlab-server/src/pages.rs",
    "crates/breachlab-server/src/templates.rs",
    "crates/breachlab-cli/src/commands/init_db.rs",
    "crates/breachlab-verify/signatures.json",
];

/// Directories a complete checkout must contain.
pub const REQUIRED_DIRS: &[&str] = &["crates", "static", "uploads"];

/// Database file name, relative to the root.
pub const DATABASE_FILE: &str = "users.db";

// ============================================================================
// Main Runner
// ============================================================================

/// Run all six stages against a checkout rooted at `root`. A stage that
/// cannot even probe (unreadable file, broken database) counts as a FAIL
/// with a printed reason; the report always carries all six verdicts.
pub async fn run(root: &Path) -> VerifyReport {
    println!("{}", "=".repeat(60));
    println!("🔓 Vulnerable Web Application - Setup Verification");
    println!("{}", "=".repeat(60));

    let toolchain_ok = check_toolchain();
    let deps_ok = check_dependencies(root);
    let files_ok = check_files(root);
    let dirs_ok = check_directories(root);
    let database_ok = check_database(root).await;
    let vulns_ok = check_vulnerabilities(root);

    VerifyReport {
        stages: vec![
            StageResult::new("Rust Version", toolchain_ok),
            StageResult::new("Dependencies", deps_ok),
            StageResult::new("Project Files", files_ok),
            StageResult::new("Directories", dirs_ok),
            StageResult::new("Database", database_ok),
            StageResult::new("Vulnerabilities", vulns_ok),
        ],
    }
}

// ============================================================================
// Stage 1: Toolchain
// ============================================================================

fn check_toolchain() -> bool {
    println!("🔍 Checking Rust version...");
    match rustc_version() {
        Some(version) if version_meets_floor(version) => {
            let (major, minor, patch) = version;
            println!("  ✅ Rust {major}.{minor}.{patch} - OK");
            true
        }
        Some((major, minor, patch)) => {
            println!(
                "  ❌ Rust {major}.{minor}.{patch} - Need {}.{}+",
                RUST_VERSION_FLOOR.0, RUST_VERSION_FLOOR.1
            );
            false
        }
        None => {
            println!("  ❌ rustc not found - Install from https://rustup.rs");
            false
        }
    }
}

/// Installed rustc version, if one can be queried.
pub fn rustc_version() -> Option<(u64, u64, u64)> {
    let output = Command::new("rustc").arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_rustc_version(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `rustc 1.85.0 (hash date)` output, nightly suffixes included.
pub fn parse_rustc_version(text: &str) -> Option<(u64, u64, u64)> {
    let version = text.split_whitespace().nth(1)?;
    let version = version.split('-').next()?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor, patch))
}

pub fn version_meets_floor(version: (u64, u64, u64)) -> bool {
    (version.0, version.1) >= RUST_VERSION_FLOOR
}

// ============================================================================
// Stage 2: Dependencies
// ============================================================================

fn check_dependencies(root: &Path) -> bool {
    println!("\n🔍 Checking dependencies...");
    let Some(packages) = locked_packages(root) else {
        println!("  ❌ Cargo.lock not found - Run: cargo fetch");
        return false;
    };

    let mut all_installed = true;
    for package in REQUIRED_CRATES {
        if packages.contains(*package) {
            println!("  ✅ {package} - Installed");
        } else {
            println!("  ❌ {package} - Not installed");
            all_installed = false;
        }
    }
    all_installed
}

/// Package names pinned in the root `Cargo.lock`, if one exists.
pub fn locked_packages(root: &Path) -> Option<HashSet<String>> {
    let lock = fs::read_to_string(root.join("Cargo.lock")).ok()?;
    Some(parse_lock_packages(&lock))
}

pub fn parse_lock_packages(lock: &str) -> HashSet<String> {
    lock.lines()
        .filter_map(|line| line.trim().strip_prefix("name = \""))
        .filter_map(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Stages 3 and 4: Files and Directories
// ============================================================================

fn check_files(root: &Path) -> bool {
    println!("\n🔍 Checking project files...");
    let missing = missing_files(root);
    for file in REQUIRED_FILES {
        if missing.contains(file) {
            println!("  ❌ {file} - Missing");
        } else {
            println!("  ✅ {file}");
        }
    }
    missing.is_empty()
}

fn check_directories(root: &Path) -> bool {
    println!("\n🔍 Checking directories...");
    let missing = missing_dirs(root);
    for dir in REQUIRED_DIRS {
        if missing.contains(dir) {
            println!("  ❌ {dir}/ - Missing");
        } else {
            println!("  ✅ {dir}/");
        }
    }
    missing.is_empty()
}

pub fn missing_files(root: &Path) -> Vec<&'static str> {
    REQUIRED_FILES
        .iter()
        .copied()
        .filter(|file| !root.join(file).is_file())
        .collect()
}

pub fn missing_dirs(root: &Path) -> Vec<&'static str> {
    REQUIRED_DIRS
        .iter()
        .copied()
        .filter(|dir| !root.join(dir).is_dir())
        .collect()
}

// ============================================================================
// Stage 5: Database
// ============================================================================

/// What the database readiness probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    /// `users` table present with this many rows.
    Ready(i64),
    /// No database file at the expected path.
    NotFound,
    /// File exists but has no `users` table.
    MissingUsersTable,
    /// Table exists but holds no rows.
    Empty,
    /// The probe itself failed.
    Error(String),
}

async fn check_database(root: &Path) -> bool {
    println!("\n🔍 Checking database...");
    match database_status(root).await {
        DatabaseStatus::Ready(count) => {
            println!("  ✅ Database OK - {count} users found");
            true
        }
        DatabaseStatus::NotFound => {
            println!("  ❌ Database not found - Run: breachlab init-db");
            false
        }
        DatabaseStatus::MissingUsersTable => {
            println!("  ❌ Users table not found");
            false
        }
        DatabaseStatus::Empty => {
            println!("  ❌ No users in database");
            false
        }
        DatabaseStatus::Error(e) => {
            println!("  ❌ Database error: {e}");
            false
        }
    }
}

/// Probe `users.db` under `root` without writing to it.
pub async fn database_status(root: &Path) -> DatabaseStatus {
    let path = root.join(DATABASE_FILE);
    if !path.is_file() {
        return DatabaseStatus::NotFound;
    }

    match probe_database(&path).await {
        Ok(status) => status,
        Err(e) => DatabaseStatus::Error(e.to_string()),
    }
}

async fn probe_database(path: &Path) -> Result<DatabaseStatus, sqlx::Error> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    let table: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name='users'")
            .fetch_optional(&mut conn)
            .await?;
    if table.is_none() {
        return Ok(DatabaseStatus::MissingUsersTable);
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut conn)
        .await?;

    Ok(if count > 0 {
        DatabaseStatus::Ready(count)
    } else {
        DatabaseStatus::Empty
    })
}

// ============================================================================
// Stage 6: Vulnerability Signatures
// ============================================================================

fn check_vulnerabilities(root: &Path) -> bool {
    println!("\n🔍 Checking vulnerabilities in code...");
    let signatures = match signatures::load() {
        Ok(signatures) => signatures,
        Err(e) => {
            println!("  ❌ Signature table could not be loaded - {e}");
            return false;
        }
    };

    let source_path = root.join(PRIMARY_SOURCE);
    let source = match fs::read_to_string(&source_path) {
        Ok(source) => source,
        Err(e) => {
            println!("  ❌ {PRIMARY_SOURCE} could not be read - {e}");
            return false;
        }
    };

    let hits = scan_signatures(&source, &signatures);
    let mut found = 0;
    for (signature, present) in signatures.iter().zip(&hits) {
        if *present {
            println!("  ✅ VULN #{}: {}", signature.id, signature.name);
            found += 1;
        } else {
            println!("  ❌ VULN #{}: {} - Not found", signature.id, signature.name);
        }
    }
    found == signatures.len()
}

/// Which signatures occur in `source`, in table order.
pub fn scan_signatures(source: &str, signatures: &[VulnSignature]) -> Vec<bool> {
    signatures
        .iter()
        .map(|signature| source.contains(&signature.pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn repo_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    #[test]
    fn test_version_parsing_handles_release_and_nightly() {
        assert_eq!(
            parse_rustc_version("rustc 1.85.0 (4d91de4e4 2025-02-17)"),
            Some((1, 85, 0))
        );
        assert_eq!(
            parse_rustc_version("rustc 1.91.0-nightly (a1b2c3d4e 2025-08-01)"),
            Some((1, 91, 0))
        );
        assert_eq!(parse_rustc_version("rustc"), None);
        assert_eq!(parse_rustc_version("not a version at all"), None);
    }

    #[test]
    fn test_floor_comparison_ignores_patch() {
        assert!(version_meets_floor((1, 85, 0)));
        assert!(version_meets_floor((1, 90, 3)));
        assert!(version_meets_floor((2, 0, 0)));
        assert!(!version_meets_floor((1, 84, 9)));
    }

    #[test]
    fn test_build_toolchain_is_detectable() {
        // Tests run under cargo, so rustc is on PATH.
        assert!(rustc_version().is_some());
    }

    #[test]
    fn test_lock_parsing_extracts_package_names() {
        let lock = r#"
[[package]]
name = "axum"
version = "0.8.4"

[[package]]
name = "sqlx"
version = "0.8.6"
"#;
        let packages = parse_lock_packages(lock);
        assert!(packages.contains("axum"));
        assert!(packages.contains("sqlx"));
        assert!(!packages.contains("0.8.4"));
        assert_eq!(packages.len(), 2);
    }

    #[test]
    fn test_repo_checkout_has_all_required_files_and_dirs() {
        let root = repo_root();
        assert_eq!(missing_files(&root), Vec::<&str>::new());
        assert_eq!(missing_dirs(&root), Vec::<&str>::new());
    }

    #[test]
    fn test_empty_root_is_missing_everything() {
        let dir = TempDir::new().unwrap();
        assert_eq!(missing_files(dir.path()).len(), REQUIRED_FILES.len());
        assert_eq!(missing_dirs(dir.path()).len(), REQUIRED_DIRS.len());
    }

    #[test]
    fn test_all_seven_signatures_occur_in_the_primary_source() {
        let source = fs::read_to_string(repo_root().join(PRIMARY_SOURCE)).unwrap();
        let signatures = signatures::load().unwrap();
        let hits = scan_signatures(&source, &signatures);
        for (signature, present) in signatures.iter().zip(&hits) {
            assert!(
                *present,
                "VULN #{} ({}) pattern missing from {}",
                signature.id, signature.name, PRIMARY_SOURCE
            );
        }
    }

    #[test]
    fn test_scan_reports_absent_patterns() {
        let signatures = signatures::load().unwrap();
        let hits = scan_signatures("fn main() {}", &signatures);
        assert!(hits.iter().all(|present| !present));
    }

    async fn connect_rw(path: &Path) -> SqliteConnection {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        SqliteConnection::connect_with(&options).await.unwrap()
    }

    #[tokio::test]
    async fn test_database_probe_distinguishes_absence_table_and_rows() {
        let dir = TempDir::new().unwrap();
        assert_eq!(database_status(dir.path()).await, DatabaseStatus::NotFound);

        let db = dir.path().join(DATABASE_FILE);
        let mut conn = connect_rw(&db).await;
        sqlx::query("CREATE TABLE other (id INTEGER)")
            .execute(&mut conn)
            .await
            .unwrap();
        drop(conn);
        assert_eq!(
            database_status(dir.path()).await,
            DatabaseStatus::MissingUsersTable
        );

        let mut conn = connect_rw(&db).await;
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT)")
            .execute(&mut conn)
            .await
            .unwrap();
        drop(conn);
        assert_eq!(database_status(dir.path()).await, DatabaseStatus::Empty);

        let mut conn = connect_rw(&db).await;
        sqlx::query("INSERT INTO users (username) VALUES ('admin'), ('john_doe')")
            .execute(&mut conn)
            .await
            .unwrap();
        drop(conn);
        assert_eq!(database_status(dir.path()).await, DatabaseStatus::Ready(2));
    }

    #[tokio::test]
    async fn test_run_reports_failures_instead_of_aborting() {
        // A bare directory fails every checkout-dependent stage, and the
        // run still comes back with all six verdicts.
        let dir = TempDir::new().unwrap();
        let report = run(dir.path()).await;

        let names: Vec<&str> = report.stages.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Rust Version",
                "Dependencies",
                "Project Files",
                "Directories",
                "Database",
                "Vulnerabilities",
            ]
        );
        assert!(!report.passed());
        for stage in &report.stages[1..] {
            assert!(!stage.passed, "{} should fail on an empty root", stage.name);
        }
    }
}
