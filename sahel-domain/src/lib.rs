pub mod booking;
pub mod commission;
pub mod customer;
pub mod notification;
pub mod page;
pub mod payment;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown booking status: {0}")]
    UnknownBookingStatus(String),
    #[error("Unknown booking type: {0}")]
    UnknownBookingType(String),
    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),
    #[error("Unknown notification field value: {0}")]
    UnknownNotificationField(String),
    #[error("Unknown commission type: {0}")]
    UnknownCommissionType(String),
}
