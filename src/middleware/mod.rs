pub mod rate_limit;
pub mod security;

pub use rate_limit::{rate_limit, RateLimiter};
pub use security::{cors, security_headers};
