pub mod app_config;
pub mod booking_repo;
pub mod commission_repo;
pub mod database;
pub mod notification_repo;
pub mod payment_repo;

pub use booking_repo::PgBookingRepository;
pub use commission_repo::PgCommissionRepository;
pub use database::DbClient;
pub use notification_repo::PgNotificationRepository;
pub use payment_repo::PgPaymentRepository;
