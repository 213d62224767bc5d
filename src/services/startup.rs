//! Sequences schema migrations with seed reconciliation.
//!
//! Used by the operator commands (`migrate`, `migrate.revert`, `migrate.users`)
//! and by the on-boot hook of the web host.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{BootSeedMode, Config, SeedConfig};
use crate::db::{MigrationEngine, MigrationError, Store};
use crate::services::identity_service::{AccountStore, RoleStore};
use crate::services::identity_service_impl::{SeaOrmAccountStore, SeaOrmRoleStore};
use crate::services::seed::{SeedReconciler, SeedReport};

/// What the on-boot hook does before the host starts serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// Migrate, then reconcile on every start.
    Always { force_recreate: bool },
    /// Migrate and reconcile only when no account exists or the probe fails.
    WhenUninitialized,
    Disabled,
}

impl BootMode {
    #[must_use]
    pub const fn from_config(seed: &SeedConfig) -> Self {
        match seed.boot_mode {
            BootSeedMode::Always => Self::Always {
                force_recreate: seed.boot_force_recreate,
            },
            BootSeedMode::WhenUninitialized => Self::WhenUninitialized,
            BootSeedMode::Disabled => Self::Disabled,
        }
    }
}

#[derive(Debug, Error)]
pub enum BootError {
    #[error("Database migration failed: {0}")]
    Migration(#[from] MigrationError),
}

pub struct Startup {
    schema: Arc<dyn MigrationEngine>,
    app: Arc<dyn MigrationEngine>,
    accounts: Arc<dyn AccountStore>,
    reconciler: SeedReconciler,
}

impl Startup {
    #[must_use]
    pub fn new(
        schema: Arc<dyn MigrationEngine>,
        app: Arc<dyn MigrationEngine>,
        accounts: Arc<dyn AccountStore>,
        roles: Arc<dyn RoleStore>,
        seed: SeedConfig,
    ) -> Self {
        let reconciler = SeedReconciler::new(Arc::clone(&accounts), roles, seed);
        Self {
            schema,
            app,
            accounts,
            reconciler,
        }
    }

    /// Wires the `SeaORM` engines and stores over one connection pool.
    #[must_use]
    pub fn from_store(store: &Store, config: &Config) -> Self {
        Self::new(
            Arc::new(store.schema_migrations()),
            Arc::new(store.app_migrations()),
            Arc::new(SeaOrmAccountStore::new(
                store.clone(),
                config.security.clone(),
            )),
            Arc::new(SeaOrmRoleStore::new(store.clone())),
            config.seed.clone(),
        )
    }

    #[must_use]
    pub const fn reconciler(&self) -> &SeedReconciler {
        &self.reconciler
    }

    /// Applies pending units of both engines, schema first.
    pub async fn run_migrations(&self) -> Result<(), MigrationError> {
        info!("Running schema migrations...");
        self.schema.run_pending().await?;
        info!("Database schema migrations completed.");

        info!("Running application migrations...");
        self.app.run_pending().await?;
        info!("Application migrations completed.");

        Ok(())
    }

    /// `migrate`: both engines to completion, then a non-forced reconciliation.
    ///
    /// # Errors
    ///
    /// Migration failures propagate; seeding failures are only logged.
    pub async fn migrate(&self) -> Result<SeedReport, MigrationError> {
        self.run_migrations().await?;

        info!("Ensuring all users exist with correct credentials...");
        Ok(self.reconciler.reconcile(false).await)
    }

    /// `migrate.revert <name>`: reverts units of the application engine only.
    pub async fn revert(&self, name: &str) -> Result<Vec<String>, MigrationError> {
        info!("Reverting application migration: {}", name);
        self.app.revert(name).await
    }

    /// `migrate.users`: forced reconciliation without touching the schema.
    pub async fn recreate_users(&self) -> SeedReport {
        info!("Force recreating all users...");
        let report = self.reconciler.reconcile(true).await;
        info!("User recreation complete.");
        report
    }

    /// The on-boot hook. Errors are returned for the caller to log and discard.
    pub async fn boot(&self, mode: BootMode) -> Result<SeedReport, BootError> {
        let force_recreate = match mode {
            BootMode::Disabled => {
                info!("Boot-time seeding is disabled in config");
                return Ok(SeedReport::default());
            }
            BootMode::Always { force_recreate } => force_recreate,
            BootMode::WhenUninitialized => match self.accounts.any_exists().await {
                Ok(true) => {
                    info!("Accounts present, skipping boot-time migration and seeding");
                    return Ok(SeedReport::default());
                }
                Ok(false) => {
                    info!("No accounts found, initializing database");
                    false
                }
                Err(e) => {
                    warn!("Account probe failed, treating database as uninitialized: {}", e);
                    false
                }
            },
        };

        self.run_migrations().await?;

        info!("Database is ready. Running user seeding...");
        Ok(self.reconciler.reconcile(force_recreate).await)
    }
}

/// Runs the boot hook and discards any failure so the host still starts.
pub async fn run_boot_hook(startup: &Startup, mode: BootMode) -> Option<SeedReport> {
    match startup.boot(mode).await {
        Ok(report) => Some(report),
        Err(e) => {
            error!(
                "Error during startup database check: {}. You may need to run migrations manually.",
                e
            );
            None
        }
    }
}
