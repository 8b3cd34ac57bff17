pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod appointment_repo;
pub use appointment_repo::AppointmentRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod support_repo;
pub use support_repo::SupportRepository;
pub mod hr_repo;
pub use hr_repo::HrRepository;
