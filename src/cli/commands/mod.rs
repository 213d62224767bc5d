mod init;
mod migrate;
mod serve;

pub use init::cmd_init;
pub use migrate::{cmd_migrate, cmd_migrate_revert, cmd_migrate_users};
pub use serve::cmd_serve;
