use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    create_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

async fn table_exists(conn: &DatabaseConnection, name: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?;",
            [name.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

async fn column_exists(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
) -> anyhow::Result<bool> {
    let pragma = format!("PRAGMA table_info('{}');", table);
    let cols = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
        .await?;
    for row in cols {
        let name: String = row.try_get("", "name").unwrap_or_default();
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn create_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    // a001_member
    if !table_exists(conn, "a001_member").await? {
        tracing::info!("Creating a001_member table");
        let sql = r#"
            CREATE TABLE a001_member (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'regular',
                color TEXT NOT NULL DEFAULT '',
                pin TEXT NOT NULL DEFAULT '0000',
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    } else if !column_exists(conn, "a001_member", "pin").await? {
        // Databases created before PIN login shipped
        tracing::info!("Adding pin column to a001_member");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "ALTER TABLE a001_member ADD COLUMN pin TEXT NOT NULL DEFAULT '0000';".to_string(),
        ))
        .await?;
    }

    // a002_report
    if !table_exists(conn, "a002_report").await? {
        tracing::info!("Creating a002_report table");
        let sql = r#"
            CREATE TABLE a002_report (
                id TEXT PRIMARY KEY NOT NULL,
                member_id TEXT NOT NULL,
                report_date TEXT NOT NULL,
                reach INTEGER NOT NULL DEFAULT 0,
                responses INTEGER NOT NULL DEFAULT 0,
                deals INTEGER NOT NULL DEFAULT 0,
                revenue INTEGER NOT NULL DEFAULT 0,
                product TEXT,
                channel TEXT,
                warehouse TEXT,
                order_code TEXT,
                order_date TEXT,
                customer_name TEXT,
                phone TEXT,
                address TEXT,
                note TEXT,
                status TEXT,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    } else if !column_exists(conn, "a002_report", "phone").await? {
        tracing::info!("Adding phone column to a002_report");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "ALTER TABLE a002_report ADD COLUMN phone TEXT;".to_string(),
        ))
        .await?;
    }

    // a003_team_target
    if !table_exists(conn, "a003_team_target").await? {
        tracing::info!("Creating a003_team_target table");
        let sql = r#"
            CREATE TABLE a003_team_target (
                id TEXT PRIMARY KEY NOT NULL,
                month TEXT NOT NULL UNIQUE,
                target INTEGER NOT NULL DEFAULT 0,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                updated_at TEXT,
                version INTEGER NOT NULL DEFAULT 0
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    // a004_target_allocation
    if !table_exists(conn, "a004_target_allocation").await? {
        tracing::info!("Creating a004_target_allocation table");
        let sql = r#"
            CREATE TABLE a004_target_allocation (
                id TEXT PRIMARY KEY NOT NULL,
                member_id TEXT NOT NULL,
                month TEXT NOT NULL,
                percent REAL NOT NULL DEFAULT 0,
                created_at TEXT,
                UNIQUE(member_id, month)
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    // sys_settings
    if !table_exists(conn, "sys_settings").await? {
        tracing::info!("Creating sys_settings table");
        let sql = r#"
            CREATE TABLE sys_settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                description TEXT,
                created_at TEXT,
                updated_at TEXT
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    // sys_refresh_tokens
    if !table_exists(conn, "sys_refresh_tokens").await? {
        tracing::info!("Creating sys_refresh_tokens table");
        let sql = r#"
            CREATE TABLE sys_refresh_tokens (
                id TEXT PRIMARY KEY NOT NULL,
                member_id TEXT NOT NULL,
                token_hash TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT,
                revoked_at TEXT
            );
        "#;
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}
