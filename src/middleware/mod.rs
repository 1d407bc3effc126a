pub mod auth;
pub mod metrics;
pub mod no_cache;

pub use auth::{AuthMiddleware, Identity};
pub use metrics::RequestMetrics;
pub use no_cache::NoCache;
