pub mod appointment_service;
pub mod auth;
pub mod catalog_service;
pub mod completion;
pub mod customer_service;
pub mod dispatch_service;
pub mod document_service;
pub mod hr_service;
pub mod notification_service;
pub mod push;
pub mod quote_service;
pub mod storage;
pub mod support_service;
