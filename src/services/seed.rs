//! Seed account reconciliation.
//!
//! Makes the account and role stores match the configured catalog. An
//! existing account is never edited in place: it is either left alone or
//! deleted and created again.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::{SeedConfig, SeedUser};
use crate::services::identity_service::{
    Account, AccountStore, IdentityError, NewAccount, RoleStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedFailure {
    pub email: String,
    pub reason: String,
}

/// What a reconciliation pass did. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub roles_created: Vec<String>,
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<SeedFailure>,
}

impl SeedReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

enum UserOutcome {
    Created,
    Skipped,
}

/// Decides whether an existing seed account must be deleted and recreated.
#[must_use]
pub fn should_replace(
    existing: Option<&Account>,
    force_recreate: bool,
    always_replace: bool,
) -> bool {
    match existing {
        None => true,
        Some(account) => force_recreate || always_replace || !account.email_confirmed,
    }
}

#[derive(Clone)]
pub struct SeedReconciler {
    accounts: Arc<dyn AccountStore>,
    roles: Arc<dyn RoleStore>,
    config: SeedConfig,
}

impl SeedReconciler {
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        roles: Arc<dyn RoleStore>,
        config: SeedConfig,
    ) -> Self {
        Self {
            accounts,
            roles,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Runs one pass over the catalog. Failures are logged per role and per
    /// user and never abort the pass.
    pub async fn reconcile(&self, force_recreate: bool) -> SeedReport {
        let mut report = SeedReport::default();

        self.ensure_roles(&mut report).await;

        for user in &self.config.users {
            match self.reconcile_user(user, force_recreate).await {
                Ok(UserOutcome::Created) => report.created.push(user.email.clone()),
                Ok(UserOutcome::Skipped) => report.skipped.push(user.email.clone()),
                Err(e) => {
                    match &e {
                        IdentityError::Rejected(errors) => {
                            error!(
                                "Failed to create user {}: {}",
                                user.email,
                                errors.join(", ")
                            );
                        }
                        other => error!("Error processing user {}: {}", user.email, other),
                    }
                    report.failed.push(SeedFailure {
                        email: user.email.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "User seeding complete"
        );

        report
    }

    async fn ensure_roles(&self, report: &mut SeedReport) {
        for role in &self.config.roles {
            match self.roles.exists(role).await {
                Ok(true) => debug!("Role already exists: {}", role),
                Ok(false) => {
                    info!("Creating role: {}", role);
                    match self.roles.create(role).await {
                        Ok(()) => report.roles_created.push(role.clone()),
                        Err(e) => error!("Failed to create role {}: {}", role, e),
                    }
                }
                Err(e) => error!("Failed to look up role {}: {}", role, e),
            }
        }
    }

    async fn reconcile_user(
        &self,
        user: &SeedUser,
        force_recreate: bool,
    ) -> Result<UserOutcome, IdentityError> {
        let existing = self.accounts.find_by_email(&user.email).await?;

        if !should_replace(existing.as_ref(), force_recreate, self.config.always_replace) {
            debug!(
                "User already present and confirmed, leaving untouched: {}",
                user.email
            );
            return Ok(UserOutcome::Skipped);
        }

        if let Some(account) = existing {
            info!("Removing existing user: {}", user.email);
            self.accounts.delete(&account).await?;
        }

        info!("Creating user: {}", user.email);
        let account = self
            .accounts
            .create(NewAccount::from(user), &user.password)
            .await?;
        info!("Successfully created user: {}", user.email);

        if !user.roles.is_empty() {
            self.accounts.assign_roles(&account, &user.roles).await?;
            info!("Added roles to {}: {}", user.email, user.roles.join(", "));
        }

        Ok(UserOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(confirmed: bool) -> Account {
        Account {
            id: "id-1".to_string(),
            email: "admin@email.com".to_string(),
            display_name: "Admin User".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            profile_url: None,
            email_confirmed: confirmed,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn missing_account_is_always_created() {
        assert!(should_replace(None, false, false));
        assert!(should_replace(None, true, false));
    }

    #[test]
    fn confirmed_account_is_kept_unless_forced() {
        let confirmed = account(true);
        assert!(!should_replace(Some(&confirmed), false, false));
        assert!(should_replace(Some(&confirmed), true, false));
    }

    #[test]
    fn unconfirmed_account_is_replaced() {
        let unconfirmed = account(false);
        assert!(should_replace(Some(&unconfirmed), false, false));
    }

    #[test]
    fn always_replace_overrides_confirmation() {
        let confirmed = account(true);
        assert!(should_replace(Some(&confirmed), false, true));
    }
}
