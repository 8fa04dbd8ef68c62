//! API surfaces: REST handlers and the WebSocket chat endpoint

pub mod rest;
pub mod ws;
