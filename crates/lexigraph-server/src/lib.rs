//! Lexigraph HTTP layer — thin axum routes over the knowledge graph service.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
