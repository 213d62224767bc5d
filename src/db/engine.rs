//! Uniform "run pending / revert by name" surface over `sea-orm-migration` migrators.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::prelude::{Alias, Expr, Query};
use sea_orm_migration::{MigrationTrait, MigratorTrait, SchemaManager};
use thiserror::Error;
use tracing::info;

use crate::constants::migrations::{REVERT_ALL, REVERT_LAST};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Unknown migration: {0}")]
    Unknown(String),

    #[error("Migration {0} has not been applied")]
    NotApplied(String),

    #[error("Nothing to revert")]
    NothingApplied,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// An engine that owns an ordered set of named migration units.
#[async_trait]
pub trait MigrationEngine: Send + Sync {
    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Applies every unapplied unit in order and returns the names applied.
    async fn run_pending(&self) -> Result<Vec<String>, MigrationError>;

    /// Reverts `name` together with every unit applied after it, newest
    /// first, and returns the names reverted.
    ///
    /// `last` reverts the most recently applied unit; `all` reverts every
    /// applied unit.
    async fn revert(&self, name: &str) -> Result<Vec<String>, MigrationError>;

    /// Names of applied units, oldest first.
    async fn applied(&self) -> Result<Vec<String>, MigrationError>;
}

pub struct SeaOrmMigrationEngine<M> {
    conn: DatabaseConnection,
    label: &'static str,
    _migrator: PhantomData<fn() -> M>,
}

impl<M> SeaOrmMigrationEngine<M>
where
    M: MigratorTrait,
{
    #[must_use]
    pub const fn new(conn: DatabaseConnection, label: &'static str) -> Self {
        Self {
            conn,
            label,
            _migrator: PhantomData,
        }
    }

    fn find_unit(name: &str) -> Option<Box<dyn MigrationTrait>> {
        M::migrations().into_iter().find(|m| m.name() == name)
    }

    async fn revert_unit(&self, name: &str) -> Result<(), MigrationError> {
        let unit = Self::find_unit(name).ok_or_else(|| MigrationError::Unknown(name.to_string()))?;
        let manager = SchemaManager::new(&self.conn);

        unit.down(&manager).await?;

        let delete = Query::delete()
            .from_table(M::migration_table_name())
            .and_where(Expr::col(Alias::new("version")).eq(name))
            .to_owned();
        manager.exec_stmt(delete).await?;

        info!("[{}] Reverted migration {}", self.label, name);
        Ok(())
    }
}

#[async_trait]
impl<M> MigrationEngine for SeaOrmMigrationEngine<M>
where
    M: MigratorTrait + Send + Sync,
{
    fn label(&self) -> &'static str {
        self.label
    }

    async fn run_pending(&self) -> Result<Vec<String>, MigrationError> {
        let pending: Vec<String> = M::get_pending_migrations(&self.conn)
            .await?
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        if pending.is_empty() {
            info!("[{}] No pending migrations", self.label);
            return Ok(pending);
        }

        M::up(&self.conn, None).await?;

        info!(
            "[{}] Applied {} migration(s): {}",
            self.label,
            pending.len(),
            pending.join(", ")
        );
        Ok(pending)
    }

    async fn revert(&self, name: &str) -> Result<Vec<String>, MigrationError> {
        let applied = self.applied().await?;

        let targets: Vec<String> = match name {
            REVERT_ALL => applied.into_iter().rev().collect(),
            REVERT_LAST => applied.last().cloned().into_iter().collect(),
            _ => {
                if Self::find_unit(name).is_none() {
                    return Err(MigrationError::Unknown(name.to_string()));
                }
                // Units applied after `name` depend on it and go first.
                let Some(position) = applied.iter().position(|a| a == name) else {
                    return Err(MigrationError::NotApplied(name.to_string()));
                };
                applied.into_iter().skip(position).rev().collect()
            }
        };

        if targets.is_empty() {
            return Err(MigrationError::NothingApplied);
        }

        for target in &targets {
            self.revert_unit(target).await?;
        }

        Ok(targets)
    }

    async fn applied(&self) -> Result<Vec<String>, MigrationError> {
        Ok(M::get_applied_migrations(&self.conn)
            .await?
            .iter()
            .map(|m| m.name().to_string())
            .collect())
    }
}
