pub mod prelude;

pub mod account_roles;
pub mod accounts;
pub mod request_logs;
pub mod roles;
