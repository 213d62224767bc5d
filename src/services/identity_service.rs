//! Domain traits for the account and role stores the seed reconciler works against.

use serde::Serialize;
use thiserror::Error;

use crate::config::SeedUser;
use crate::entities::accounts;

/// Errors specific to identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The store refused to create the account. Each entry is one reason.
    #[error("Account rejected: {}", .0.join(", "))]
    Rejected(Vec<String>),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for IdentityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A persisted account, without its credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub email_confirmed: bool,
    pub created_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            first_name: model.first_name,
            last_name: model.last_name,
            profile_url: model.profile_url,
            email_confirmed: model.email_confirmed,
            created_at: model.created_at,
        }
    }
}

/// Fields for a new account; the password is passed separately.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_url: Option<String>,
    pub email_confirmed: bool,
}

impl From<&SeedUser> for NewAccount {
    fn from(user: &SeedUser) -> Self {
        Self {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_url: user.profile_url.clone(),
            email_confirmed: true,
        }
    }
}

#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError>;

    /// Creates an account with `password` as its initial credential.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Rejected`] with every validation failure when
    /// the email or password is not acceptable.
    async fn create(&self, account: NewAccount, password: &str)
    -> Result<Account, IdentityError>;

    async fn delete(&self, account: &Account) -> Result<(), IdentityError>;

    /// Sets the account's role memberships to exactly `roles`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::RoleNotFound`] if any role does not exist.
    async fn assign_roles(&self, account: &Account, roles: &[String])
    -> Result<(), IdentityError>;

    async fn roles_of(&self, account: &Account) -> Result<Vec<String>, IdentityError>;

    /// Whether any account exists at all. Fails when the schema is missing.
    async fn any_exists(&self) -> Result<bool, IdentityError>;

    /// Returns the account when `password` matches its credential.
    async fn check_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, IdentityError>;
}

#[async_trait::async_trait]
pub trait RoleStore: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, IdentityError>;

    async fn create(&self, name: &str) -> Result<(), IdentityError>;

    async fn list(&self) -> Result<Vec<String>, IdentityError>;
}
