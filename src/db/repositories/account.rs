use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};

use crate::entities::{account_roles, accounts, prelude::*};

/// Fields needed to insert an account row. The hash is computed by the caller.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub email_confirmed: bool,
    pub password_hash: String,
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>> {
        Accounts::find()
            .filter(accounts::Column::NormalizedEmail.eq(normalize(email)))
            .one(&self.conn)
            .await
            .context("Failed to query account by email")
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<accounts::Model>> {
        Accounts::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query account by ID")
    }

    pub async fn insert(&self, row: AccountRow) -> Result<accounts::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            id: Set(row.id.clone()),
            user_name: Set(row.email.clone()),
            email: Set(row.email.clone()),
            normalized_email: Set(normalize(&row.email)),
            display_name: Set(row.display_name),
            first_name: Set(row.first_name),
            last_name: Set(row.last_name),
            profile_url: Set(row.profile_url),
            email_confirmed: Set(row.email_confirmed),
            password_hash: Set(row.password_hash),
            security_stamp: Set(uuid::Uuid::new_v4().to_string()),
            created_at: Set(now),
        };

        Accounts::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .with_context(|| format!("Failed to insert account {}", row.email))?;

        self.find_by_id(&row.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created account {}", row.email))
    }

    /// Deletes the account and its role memberships.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let txn = self.conn.begin().await?;

        AccountRoles::delete_many()
            .filter(account_roles::Column::AccountId.eq(id))
            .exec(&txn)
            .await?;

        let result = Accounts::delete_by_id(id.to_string()).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    /// Returns true if at least one account row exists.
    pub async fn any_exists(&self) -> Result<bool> {
        let first = Accounts::find()
            .select_only()
            .column(accounts::Column::Id)
            .into_tuple::<String>()
            .one(&self.conn)
            .await
            .context("Failed to probe accounts table")?;

        Ok(first.is_some())
    }

    pub async fn role_names(&self, account_id: &str) -> Result<Vec<String>> {
        let rows = AccountRoles::find()
            .filter(account_roles::Column::AccountId.eq(account_id))
            .find_also_related(Roles)
            .all(&self.conn)
            .await
            .context("Failed to query account roles")?;

        let mut names: Vec<String> = rows
            .into_iter()
            .filter_map(|(_, role)| role.map(|r| r.name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Replaces the account's memberships with exactly `role_ids`.
    pub async fn set_roles(&self, account_id: &str, role_ids: &[String]) -> Result<()> {
        let txn = self.conn.begin().await?;

        AccountRoles::delete_many()
            .filter(account_roles::Column::AccountId.eq(account_id))
            .exec(&txn)
            .await?;

        if !role_ids.is_empty() {
            let models: Vec<account_roles::ActiveModel> = role_ids
                .iter()
                .map(|role_id| account_roles::ActiveModel {
                    account_id: Set(account_id.to_string()),
                    role_id: Set(role_id.clone()),
                })
                .collect();

            AccountRoles::insert_many(models)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

/// Lookup key for emails and role names.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Admin@Email.com "), "ADMIN@EMAIL.COM");
        assert_eq!(normalize("Manager"), "MANAGER");
    }
}
