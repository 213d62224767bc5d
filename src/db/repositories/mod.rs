pub mod account;
pub mod request_log;
pub mod role;
