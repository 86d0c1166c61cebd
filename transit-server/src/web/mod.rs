//! The HTTP surface: JSON endpoints, the protocol batch endpoint and a
//! small HTML frontend around the map.

mod dto;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
