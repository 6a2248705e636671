pub mod envelope;
pub mod payment;

pub use envelope::ApiResponse;
pub use payment::{PaymentRequest, StatusQuery, WebhookNotification};
