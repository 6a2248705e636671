pub mod gateway_client;
pub mod order_id;
pub mod payment_service;
pub mod webhook;

pub use gateway_client::GatewayClient;
pub use payment_service::RelayService;
