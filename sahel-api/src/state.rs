use std::sync::Arc;

use sahel_domain::repository::{
    BookingRepository, CommissionRepository, NotificationRepository, PaymentRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub commissions: Arc<dyn CommissionRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}
