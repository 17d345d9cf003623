//! HTTP boundary: router, server lifecycle, error mapping, wire DTOs.

pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, ApiServer};
