//! Campus Portal - university portal backend with real-time chat
//!
//! Layered as contract (pure models), domain (services over repository
//! traits), infra (SeaORM storage, media store) and api (REST + WebSocket).

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod infra;
pub mod state;

pub use api::rest::build_router;
pub use config::Config;
pub use state::AppState;
