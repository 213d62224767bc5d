use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod app_migrator;
pub mod engine;
pub mod migrator;
pub mod repositories;

pub use crate::entities::request_logs::Model as RequestLog;
pub use engine::{MigrationEngine, MigrationError, SeaOrmMigrationEngine};
pub use repositories::account::AccountRow;

use crate::entities::{accounts, roles};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Connects without touching the schema; migrations are run explicitly.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` would see its own empty database.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        info!(
            "Database connected (pool: {}-{})",
            if in_memory { 1 } else { min_connections },
            if in_memory { 1 } else { max_connections }
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn schema_migrations(&self) -> SeaOrmMigrationEngine<migrator::Migrator> {
        SeaOrmMigrationEngine::new(self.conn.clone(), "schema")
    }

    #[must_use]
    pub fn app_migrations(&self) -> SeaOrmMigrationEngine<app_migrator::AppMigrator> {
        SeaOrmMigrationEngine::new(self.conn.clone(), "app")
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn role_repo(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    fn request_log_repo(&self) -> repositories::request_log::RequestLogRepository {
        repositories::request_log::RequestLogRepository::new(self.conn.clone())
    }

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<accounts::Model>> {
        self.account_repo().find_by_email(email).await
    }

    pub async fn insert_account(&self, row: AccountRow) -> Result<accounts::Model> {
        self.account_repo().insert(row).await
    }

    pub async fn delete_account(&self, id: &str) -> Result<bool> {
        self.account_repo().delete(id).await
    }

    pub async fn any_account_exists(&self) -> Result<bool> {
        self.account_repo().any_exists().await
    }

    pub async fn get_account_roles(&self, account_id: &str) -> Result<Vec<String>> {
        self.account_repo().role_names(account_id).await
    }

    pub async fn set_account_roles(&self, account_id: &str, role_ids: &[String]) -> Result<()> {
        self.account_repo().set_roles(account_id, role_ids).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        self.role_repo().find_by_name(name).await
    }

    pub async fn create_role(&self, name: &str) -> Result<roles::Model> {
        self.role_repo().insert(name).await
    }

    pub async fn list_roles(&self) -> Result<Vec<roles::Model>> {
        self.role_repo().list().await
    }

    pub async fn add_request_log(
        &self,
        method: &str,
        path: &str,
        status_code: u16,
        duration_ms: i64,
        user_email: Option<String>,
    ) -> Result<()> {
        self.request_log_repo()
            .add(method, path, status_code, duration_ms, user_email)
            .await
    }

    pub async fn recent_request_logs(&self, limit: u64) -> Result<Vec<RequestLog>> {
        self.request_log_repo().recent(limit).await
    }
}
