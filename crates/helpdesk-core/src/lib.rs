//! helpdesk-core library.
//!
//! Data and state behind the helpdesk console: the ticket store and its
//! filtered view, the live log feed with its cancellable subscriptions, and
//! the knowledgebase document.
//!
//! # Conventions
//!
//! - **Errors**: library functions return [`Result`]; the binary wraps them in `anyhow`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod clock;
pub mod config;
pub mod error;
pub mod kb;
pub mod logs;
pub mod model;
pub mod route;
pub mod tickets;

pub use error::{Error, ErrorCode, Result};
