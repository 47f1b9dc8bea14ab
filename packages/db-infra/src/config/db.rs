use std::env;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Which database a process is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    /// Test profile; the database name must end in `_test`.
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    /// Private in-memory SQLite; each pool gets a fresh database.
    SqliteMemory,
}

/// Access level of the connecting role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application role used by the running service
    App,
    /// Schema owner used for migrations
    Owner,
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => sea_orm::DatabaseBackend::Postgres,
            DbKind::SqliteMemory => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

impl std::str::FromStr for RuntimeEnv {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            other => Err(DbInfraError::config(format!(
                "unknown runtime env '{other}' (expected prod or test)"
            ))),
        }
    }
}

impl std::str::FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "sqlite-memory" | "memory" => Ok(Self::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown db kind '{other}' (expected postgres or sqlite-memory)"
            ))),
        }
    }
}

/// Connection string for the given environment, backend and role.
pub fn make_conn_spec(
    env: RuntimeEnv,
    kind: DbKind,
    owner: DbOwner,
) -> Result<String, DbInfraError> {
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::Postgres => db_url(env, owner),
    }
}

/// Builds a Postgres URL from `POSTGRES_*`, `PROD_DB`/`TEST_DB` and role credentials.
pub fn db_url(env: RuntimeEnv, owner: DbOwner) -> Result<String, DbInfraError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = db_name(env)?;
    let (username, password) = credentials(owner)?;
    let password = utf8_percent_encode(&password, NON_ALPHANUMERIC);

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn db_name(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), DbInfraError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((must_var("DB_OWNER_USER")?, must_var("DB_OWNER_PASSWORD")?)),
    }
}

/// Required environment variable or a config error naming it.
pub fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("Required environment variable '{name}' is not set"))
    })
}
