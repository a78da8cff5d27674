//! Network Module
//!
//! Connection handling for the client.
//!
//! ## Architecture
//! - One `Session` owns one TCP connection
//! - Strict request/reply: one request in flight at a time
//! - Each request carries its own deadline (`DeadlineStream`)

mod deadline;
mod session;

pub use deadline::DeadlineStream;
pub use session::Session;
