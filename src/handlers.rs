pub mod admin;
pub mod ai;
pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod cron;
pub mod customers;
pub mod health;
pub mod hr;
pub mod notification_settings;
pub mod notifications;
pub mod quotes;
pub mod support;
pub mod time_tracking;
