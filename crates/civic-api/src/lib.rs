pub mod auth;
pub mod complaints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod users;

pub use auth::{AppState, AppStateInner};
pub use routes::router;
