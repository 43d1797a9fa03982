//! Tool broker client
//!
//! The broker hosts the Confluence tools, holds each user's third-party
//! authorizations and runs tools on their behalf. `BrokerClient` implements
//! `ToolProvider`, `ToolBackend` and `AuthorizationWaiter` over its REST API.

mod client;
pub mod types;

pub use client::BrokerClient;
