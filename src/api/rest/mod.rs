//! REST API layer: DTOs, handlers, routes, error mapping

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapper;
pub mod routes;

pub use error::Problem;
pub use routes::build_router;
