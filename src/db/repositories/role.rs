use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::account::normalize;
use crate::entities::{prelude::*, roles};

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        Roles::find()
            .filter(roles::Column::NormalizedName.eq(normalize(name)))
            .one(&self.conn)
            .await
            .context("Failed to query role by name")
    }

    pub async fn insert(&self, name: &str) -> Result<roles::Model> {
        let id = uuid::Uuid::new_v4().to_string();

        Roles::insert(roles::ActiveModel {
            id: Set(id.clone()),
            name: Set(name.to_string()),
            normalized_name: Set(normalize(name)),
        })
        .exec_without_returning(&self.conn)
        .await
        .with_context(|| format!("Failed to insert role {name}"))?;

        Roles::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created role {name}"))
    }

    pub async fn list(&self) -> Result<Vec<roles::Model>> {
        Roles::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list roles")
    }
}
