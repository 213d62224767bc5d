//! Integration tests for seed account reconciliation against an in-memory database.

use std::collections::BTreeMap;
use std::sync::Arc;

use rosterd::config::{Config, SeedUser};
use rosterd::db::Store;
use rosterd::services::{
    AccountStore, NewAccount, RoleStore, SeaOrmAccountStore, SeaOrmRoleStore, SeedReconciler,
    Startup,
};

struct Harness {
    accounts: Arc<SeaOrmAccountStore>,
    roles: Arc<SeaOrmRoleStore>,
    config: Config,
}

impl Harness {
    fn reconciler(&self) -> SeedReconciler {
        SeedReconciler::new(
            self.accounts.clone(),
            self.roles.clone(),
            self.config.seed.clone(),
        )
    }

    /// email -> (id, display name, confirmed, roles)
    async fn snapshot(&self) -> BTreeMap<String, (String, String, bool, Vec<String>)> {
        let mut out = BTreeMap::new();
        for user in &self.config.seed.users {
            if let Some(account) = self.accounts.find_by_email(&user.email).await.unwrap() {
                let roles = self.accounts.roles_of(&account).await.unwrap();
                out.insert(
                    account.email.clone(),
                    (
                        account.id.clone(),
                        account.display_name.clone(),
                        account.email_confirmed,
                        roles,
                    ),
                );
            }
        }
        out
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;
    config
}

async fn setup(config: Config) -> Harness {
    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to open in-memory database");

    Startup::from_store(&store, &config)
        .run_migrations()
        .await
        .expect("Failed to run migrations");

    Harness {
        accounts: Arc::new(SeaOrmAccountStore::new(
            store.clone(),
            config.security.clone(),
        )),
        roles: Arc::new(SeaOrmRoleStore::new(store)),
        config,
    }
}

fn sorted(roles: &[String]) -> Vec<String> {
    let mut roles = roles.to_vec();
    roles.sort();
    roles
}

async fn insert_account(
    harness: &Harness,
    email: &str,
    display_name: &str,
    confirmed: bool,
) -> String {
    harness
        .accounts
        .create(
            NewAccount {
                email: email.to_string(),
                display_name: display_name.to_string(),
                first_name: "Someone".to_string(),
                last_name: "Else".to_string(),
                profile_url: None,
                email_confirmed: confirmed,
            },
            "0ld-Passw0rd",
        )
        .await
        .expect("Failed to insert account")
        .id
}

#[tokio::test]
async fn test_empty_store_gets_full_catalog() {
    let harness = setup(test_config()).await;

    let report = harness.reconciler().reconcile(false).await;

    assert!(report.is_clean(), "unexpected failures: {:?}", report.failed);
    assert_eq!(report.created.len(), 4);
    assert_eq!(report.roles_created.len(), 3);

    let snapshot = harness.snapshot().await;
    assert_eq!(snapshot.len(), 4);

    for user in &harness.config.seed.users {
        let (_, display_name, confirmed, roles) = &snapshot[&user.email];
        assert_eq!(display_name, &user.display_name);
        assert!(*confirmed);
        assert_eq!(roles, &sorted(&user.roles));
    }
}

#[tokio::test]
async fn test_roles_exist_once_after_repeated_runs() {
    let harness = setup(test_config()).await;
    let reconciler = harness.reconciler();

    let first = reconciler.reconcile(false).await;
    let second = reconciler.reconcile(true).await;
    let third = reconciler.reconcile(false).await;

    assert_eq!(first.roles_created.len(), 3);
    assert!(second.roles_created.is_empty());
    assert!(third.roles_created.is_empty());

    let roles = harness.roles.list().await.unwrap();
    assert_eq!(roles, vec!["Admin", "Employee", "Manager"]);
}

#[tokio::test]
async fn test_forced_run_replaces_stale_account() {
    let harness = setup(test_config()).await;
    let stale_id = insert_account(&harness, "admin@email.com", "Stale Admin", true).await;

    let report = harness.reconciler().reconcile(true).await;
    assert!(report.created.contains(&"admin@email.com".to_string()));

    let admin = harness
        .accounts
        .find_by_email("admin@email.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert_ne!(admin.id, stale_id);
    assert_eq!(admin.display_name, "Admin User");
    assert!(admin.email_confirmed);
    assert_eq!(
        harness.accounts.roles_of(&admin).await.unwrap(),
        vec!["Admin", "Employee", "Manager"]
    );

    assert!(
        harness
            .accounts
            .check_password("admin@email.com", "p@55wOrd")
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        harness
            .accounts
            .check_password("admin@email.com", "0ld-Passw0rd")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_confirmed_account_is_left_untouched() {
    let harness = setup(test_config()).await;
    let existing_id = insert_account(&harness, "admin@email.com", "Custom Admin", true).await;

    let report = harness.reconciler().reconcile(false).await;

    assert_eq!(report.skipped, vec!["admin@email.com".to_string()]);
    assert_eq!(report.created.len(), 3);

    let admin = harness
        .accounts
        .find_by_email("admin@email.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.id, existing_id);
    assert_eq!(admin.display_name, "Custom Admin");
    assert!(
        harness
            .accounts
            .check_password("admin@email.com", "0ld-Passw0rd")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_unconfirmed_account_is_replaced() {
    let harness = setup(test_config()).await;
    let existing_id = insert_account(&harness, "employee@email.com", "Pending", false).await;

    harness.reconciler().reconcile(false).await;

    let employee = harness
        .accounts
        .find_by_email("employee@email.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(employee.id, existing_id);
    assert_eq!(employee.display_name, "Test Employee");
    assert!(employee.email_confirmed);
}

#[tokio::test]
async fn test_always_replace_recreates_confirmed_accounts() {
    let mut config = test_config();
    config.seed.always_replace = true;
    let harness = setup(config).await;
    let existing_id = insert_account(&harness, "admin@email.com", "Custom Admin", true).await;

    let report = harness.reconciler().reconcile(false).await;
    assert!(report.skipped.is_empty());

    let admin = harness
        .accounts
        .find_by_email("admin@email.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(admin.id, existing_id);
    assert_eq!(admin.display_name, "Admin User");
}

#[tokio::test]
async fn test_non_forced_reconciliation_is_idempotent() {
    let harness = setup(test_config()).await;
    let reconciler = harness.reconciler();

    reconciler.reconcile(false).await;
    let first = harness.snapshot().await;

    let report = reconciler.reconcile(false).await;
    let second = harness.snapshot().await;

    assert_eq!(report.skipped.len(), 4);
    assert!(report.created.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_forced_reconciliation_converges() {
    let harness = setup(test_config()).await;
    let reconciler = harness.reconciler();

    reconciler.reconcile(true).await;
    let first = harness.snapshot().await;

    reconciler.reconcile(true).await;
    let second = harness.snapshot().await;

    // Same accounts and fields; only the identifiers are new.
    let strip = |snap: &BTreeMap<String, (String, String, bool, Vec<String>)>| {
        snap.iter()
            .map(|(email, (_, name, confirmed, roles))| {
                (email.clone(), name.clone(), *confirmed, roles.clone())
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(&first), strip(&second));
    assert!(
        first
            .iter()
            .all(|(email, (id, ..))| second[email].0 != *id)
    );
}

#[tokio::test]
async fn test_rejected_user_does_not_stop_the_pass() {
    let mut config = test_config();
    config.seed.users[1].password = "weak".to_string();
    let harness = setup(config).await;

    let report = harness.reconciler().reconcile(false).await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].email, "manager@email.com");
    assert!(report.failed[0].reason.contains("Passwords must"));

    assert!(
        harness
            .accounts
            .find_by_email("manager@email.com")
            .await
            .unwrap()
            .is_none()
    );

    let employee = harness
        .accounts
        .find_by_email("employee@email.com")
        .await
        .unwrap()
        .expect("employee should still be created");
    assert_eq!(
        harness.accounts.roles_of(&employee).await.unwrap(),
        vec!["Employee"]
    );
    assert_eq!(report.created.len(), 3);
}

#[tokio::test]
async fn test_unknown_role_fails_only_that_user() {
    let mut config = test_config();
    config.seed.users.insert(
        0,
        SeedUser::new(
            "auditor@email.com",
            "Test Auditor",
            "Test",
            "Auditor",
            None,
            vec!["Auditor".to_string()],
        ),
    );
    let harness = setup(config).await;

    let report = harness.reconciler().reconcile(false).await;

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].email, "auditor@email.com");
    assert!(report.failed[0].reason.contains("Auditor"));
    assert_eq!(report.created.len(), 4);
}

#[tokio::test]
async fn test_alternate_test_user_email() {
    let mut config = test_config();
    config.seed.users[3].email = "test@email.com".to_string();
    let harness = setup(config).await;

    harness.reconciler().reconcile(false).await;

    let user = harness
        .accounts
        .find_by_email("TEST@email.com")
        .await
        .unwrap()
        .expect("lookup is case-insensitive");
    assert_eq!(user.display_name, "Test User");
    assert!(harness.accounts.roles_of(&user).await.unwrap().is_empty());
}
