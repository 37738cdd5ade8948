//! HTTP handlers for pokemon CRUD, search, types, and service endpoints.

pub mod common;
pub mod pokemon;
pub mod search;
pub mod types;

pub use common::{health, root, route_not_found};
pub use search::search;
pub use types::list_types;
