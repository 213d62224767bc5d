pub mod heartbeat;
pub use heartbeat::Heartbeat;

pub mod identity_service;
pub use identity_service::{Account, AccountStore, IdentityError, NewAccount, RoleStore};

pub mod identity_service_impl;
pub use identity_service_impl::{SeaOrmAccountStore, SeaOrmRoleStore};

pub mod password;

pub mod seed;
pub use seed::{SeedFailure, SeedReconciler, SeedReport};

pub mod startup;
pub use startup::{BootError, BootMode, Startup, run_boot_hook};
