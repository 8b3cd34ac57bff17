pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod customer;
pub mod hr;
pub mod notification;
pub mod quote;
pub mod support;
