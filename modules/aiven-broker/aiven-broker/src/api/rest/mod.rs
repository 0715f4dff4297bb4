//! Open Service Broker (v2) HTTP surface.

pub(crate) mod auth;
pub mod dto;
pub(crate) mod error;
pub(crate) mod handlers;
pub mod routes;
