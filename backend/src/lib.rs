//! Authentication and session-identity subsystem.
//!
//! The crate is laid out hexagonally: `domain` holds transport-agnostic
//! types, the auth service, and the ports it consumes; `inbound` adapts
//! HTTP requests onto the domain; `outbound` provides port adapters;
//! `middleware` covers request-lifecycle concerns such as trace correlation
//! and identity resolution.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
