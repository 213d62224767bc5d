pub use super::account_roles::Entity as AccountRoles;
pub use super::accounts::Entity as Accounts;
pub use super::request_logs::Entity as RequestLogs;
pub use super::roles::Entity as Roles;
