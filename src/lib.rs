pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod services;

pub use cli::{Cli, Commands};
pub use config::Config;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        None | Some(Commands::Serve) => cli::cmd_serve(config).await,

        Some(Commands::Migrate) => cli::cmd_migrate(&config).await,

        Some(Commands::MigrateRevert { name }) => cli::cmd_migrate_revert(&config, &name).await,

        Some(Commands::MigrateUsers) => cli::cmd_migrate_users(&config).await,

        Some(Commands::Init) => cli::cmd_init(),
    }
}
