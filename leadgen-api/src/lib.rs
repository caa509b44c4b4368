pub mod backend;
pub mod config;
pub mod handlers;
pub mod helpers;
pub mod integrations;
pub mod state;

pub use state::AppState;
