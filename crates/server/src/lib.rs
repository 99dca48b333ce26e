pub mod access_log;
pub mod body;
pub mod cors;
pub mod errors;
pub mod identity;
pub mod routes;
pub mod startup;
pub mod state;

pub use routes::build_router;
pub use startup::run;
pub use state::AppState;
