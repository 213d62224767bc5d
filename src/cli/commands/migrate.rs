use anyhow::Context;

use crate::config::Config;
use crate::db::Store;
use crate::services::{SeedReport, Startup};

async fn connect(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .with_context(|| format!("Failed to open database {}", config.general.database_path))
}

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let startup = Startup::from_store(&store, config);

    let report = startup.migrate().await.context("Migration failed")?;

    println!("✓ Migrations applied");
    print_report(&report);
    Ok(())
}

pub async fn cmd_migrate_revert(config: &Config, name: &str) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let startup = Startup::from_store(&store, config);

    let reverted = startup
        .revert(name)
        .await
        .with_context(|| format!("Failed to revert {name}"))?;

    for migration in &reverted {
        println!("✓ Reverted: {migration}");
    }
    Ok(())
}

pub async fn cmd_migrate_users(config: &Config) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let startup = Startup::from_store(&store, config);

    let report = startup.recreate_users().await;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SeedReport) {
    for role in &report.roles_created {
        println!("  + role {role}");
    }
    for email in &report.created {
        println!("  + {email}");
    }
    for email in &report.skipped {
        println!("  = {email} (unchanged)");
    }
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.email, failure.reason);
    }
}
