pub const ROLE_ADMIN: &str = "Admin";

pub const ROLE_MANAGER: &str = "Manager";

pub const ROLE_EMPLOYEE: &str = "Employee";

/// Shared demo credential for every seed account.
pub const DEFAULT_SEED_PASSWORD: &str = "p@55wOrd";

pub mod migrations {

    /// Bookkeeping table of the application migrator.
    pub const APP_MIGRATION_TABLE: &str = "app_migrations";

    /// Reverts the most recently applied unit.
    pub const REVERT_LAST: &str = "last";

    /// Reverts every applied unit, newest first.
    pub const REVERT_ALL: &str = "all";
}

pub mod limits {

    pub const DEFAULT_REQUEST_LOG_LIMIT: u64 = 100;

    pub const MAX_REQUEST_LOG_LIMIT: u64 = 1000;

    /// One week.
    pub const MAX_HEARTBEAT_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
}
