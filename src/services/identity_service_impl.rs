//! `SeaORM` implementations of the `AccountStore` and `RoleStore` traits.

use anyhow::Context;
use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::{AccountRow, Store};
use crate::services::identity_service::{
    Account, AccountStore, IdentityError, NewAccount, RoleStore,
};
use crate::services::password::{hash_password, verify_password};

pub struct SeaOrmAccountStore {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountStore {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AccountStore for SeaOrmAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        let account = self.store.get_account_by_email(email).await?;
        Ok(account.map(Account::from))
    }

    async fn create(
        &self,
        account: NewAccount,
        password: &str,
    ) -> Result<Account, IdentityError> {
        let email = account.email.trim().to_string();
        let mut errors = Vec::new();

        if !is_valid_email(&email) {
            errors.push(format!("Email '{email}' is invalid."));
        } else if self.store.get_account_by_email(&email).await?.is_some() {
            errors.push(format!("Email '{email}' is already taken."));
        }

        errors.extend(self.security.password_policy.violations(password));

        if !errors.is_empty() {
            return Err(IdentityError::Rejected(errors));
        }

        // Argon2 is CPU-bound; keep it off the async workers.
        let password = password.to_string();
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let model = self
            .store
            .insert_account(AccountRow {
                id: uuid::Uuid::new_v4().to_string(),
                email,
                display_name: account.display_name,
                first_name: account.first_name,
                last_name: account.last_name,
                profile_url: account.profile_url,
                email_confirmed: account.email_confirmed,
                password_hash,
            })
            .await?;

        Ok(Account::from(model))
    }

    async fn delete(&self, account: &Account) -> Result<(), IdentityError> {
        self.store.delete_account(&account.id).await?;
        Ok(())
    }

    async fn assign_roles(
        &self,
        account: &Account,
        roles: &[String],
    ) -> Result<(), IdentityError> {
        let mut role_ids: Vec<String> = Vec::with_capacity(roles.len());

        for name in roles {
            let role = self
                .store
                .get_role_by_name(name)
                .await?
                .ok_or_else(|| IdentityError::RoleNotFound(name.clone()))?;

            if !role_ids.contains(&role.id) {
                role_ids.push(role.id);
            }
        }

        self.store.set_account_roles(&account.id, &role_ids).await?;
        Ok(())
    }

    async fn roles_of(&self, account: &Account) -> Result<Vec<String>, IdentityError> {
        Ok(self.store.get_account_roles(&account.id).await?)
    }

    async fn any_exists(&self) -> Result<bool, IdentityError> {
        Ok(self.store.any_account_exists().await?)
    }

    async fn check_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, IdentityError> {
        let Some(model) = self.store.get_account_by_email(email).await? else {
            return Ok(None);
        };

        let password_hash = model.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(is_valid.then(|| Account::from(model)))
    }
}

pub struct SeaOrmRoleStore {
    store: Store,
}

impl SeaOrmRoleStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoleStore for SeaOrmRoleStore {
    async fn exists(&self, name: &str) -> Result<bool, IdentityError> {
        Ok(self.store.get_role_by_name(name).await?.is_some())
    }

    async fn create(&self, name: &str) -> Result<(), IdentityError> {
        self.store.create_role(name).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, IdentityError> {
        let roles = self.store.list_roles().await?;
        Ok(roles.into_iter().map(|r| r.name).collect())
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("admin@email.com"));
        assert!(is_valid_email("new@user.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("admin"));
        assert!(!is_valid_email("@email.com"));
        assert!(!is_valid_email("admin@"));
        assert!(!is_valid_email("a@b@c"));
        assert!(!is_valid_email("ad min@email.com"));
    }
}
