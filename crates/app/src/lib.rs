pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use router::app_router;
pub use state::AppState;
