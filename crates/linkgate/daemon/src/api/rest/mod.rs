//! REST API: router, shared state, handlers

pub mod handlers;
pub mod router;
pub mod state;
