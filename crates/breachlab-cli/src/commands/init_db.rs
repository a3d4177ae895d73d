//! Database initialization command.
//!
//! `breachlab init-db` - Create the SQLite database with sample data for
//! the vulnerable web application. An existing database is replaced.

use std::path::Path;

use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

/// Sample users seeded into the lab database. Passwords are stored in
/// plaintext; `/user/{id}` renders them straight back out.
pub const SAMPLE_USERS: &[(&str, &str, &str, &str)] = &[
    ("admin", "admin@vulnerable-app.local", "admin123", "administrator"),
    ("john_doe", "john@example.com", "password123", "user"),
    ("jane_smith", "jane@example.com", "qwerty456", "user"),
    ("bob_wilson", "bob@example.com", "letmein789", "user"),
    ("alice_jones", "alice@example.com", "welcome2024", "moderator"),
    ("charlie_brown", "charlie@example.com", "passw0rd!", "user"),
    ("david_miller", "david@example.com", "123456abc", "user"),
    ("emma_davis", "emma@example.com", "password!", "user"),
];

/// Run the command: rebuild the database at `path` and report on stdout.
pub async fn init_db(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        tokio::fs::remove_file(path).await?;
        println!("Removed existing database");
    }

    initialize_database(path).await?;

    println!("Database initialized successfully!");
    println!("Created {} sample users", SAMPLE_USERS.len());
    println!("\nSample credentials:");
    println!("  Username: admin | Password: admin123");
    println!("  Username: john_doe | Password: password123");
    Ok(())
}

/// Create the schema and seed rows at `path`. Expects no database file
/// to be present.
pub async fn initialize_database(path: &Path) -> anyhow::Result<()> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options).await?;

    sqlx::query(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            password TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&mut conn)
    .await?;

    for (username, email, password, role) in SAMPLE_USERS {
        sqlx::query("INSERT INTO users (username, email, password, role) VALUES (?, ?, ?, ?)")
            .bind(username)
            .bind(email)
            .bind(password)
            .bind(role)
            .execute(&mut conn)
            .await?;
    }

    // The sessions table exists for the walkthrough; the cookie codec
    // never reads it.
    sqlx::query(
        "CREATE TABLE sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            session_token TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )",
    )
    .execute(&mut conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn connect(path: &Path) -> SqliteConnection {
        let options = SqliteConnectOptions::new().filename(path);
        SqliteConnection::connect_with(&options).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_schema_and_seeds() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("users.db");
        initialize_database(&db).await.unwrap();

        let mut conn = connect(&db).await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(count, SAMPLE_USERS.len() as i64);

        let (email, password, role): (String, String, String) =
            sqlx::query_as("SELECT email, password, role FROM users WHERE username = 'admin'")
                .fetch_one(&mut conn)
                .await
                .unwrap();
        assert_eq!(email, "admin@vulnerable-app.local");
        assert_eq!(password, "admin123");
        assert_eq!(role, "administrator");
    }

    #[tokio::test]
    async fn test_admin_is_row_one() {
        // The walkthrough points students at /user/1 first.
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("users.db");
        initialize_database(&db).await.unwrap();

        let mut conn = connect(&db).await;
        let (username,): (String,) = sqlx::query_as("SELECT username FROM users WHERE id = 1")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(username, "admin");
    }

    #[tokio::test]
    async fn test_sessions_table_is_created_empty() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("users.db");
        initialize_database(&db).await.unwrap();

        let mut conn = connect(&db).await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_init_db_replaces_an_existing_file() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("users.db");
        std::fs::write(&db, b"stale bytes").unwrap();
        init_db(&db).await.unwrap();

        let mut conn = connect(&db).await;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(count, SAMPLE_USERS.len() as i64);
    }
}
