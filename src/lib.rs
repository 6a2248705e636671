//! HTTP relay between a storefront and the Cashfree payment gateway.
//!
//! Every route is stateless: validate, attach credentials, make one upstream
//! call, reshape the answer into a `{success, data | message}` envelope.

pub mod app;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::{Config, GatewayEnvironment};
pub use app::{build_router, build_state, AppState};
pub use error::{RelayError, RelayResult};
