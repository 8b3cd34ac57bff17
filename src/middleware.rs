pub mod auth;
pub mod cron;
pub mod rbac;
