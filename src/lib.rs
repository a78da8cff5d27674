//! # tyrantkv
//!
//! A blocking client for the Tokyo Tyrant binary key-value protocol:
//! - Fixed big-endian request encoding (`protocol::Request`)
//! - Single-byte status replies mapped to typed errors
//! - One persistent TCP connection per `Session`
//! - Per-operation deadlines, re-armed before every request
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Session                               │
//! │     put / put_keep / put_nr / get / out / reset / close      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │  Deadline   │
//!   │   (codec)   │          │   Stream    │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  TcpStream  │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tyrantkv::{Config, Session};
//!
//! let mut session = Session::connect(Config::new("127.0.0.1:1978", Duration::from_secs(1)))?;
//! session.put(b"Hello", b"World")?;
//! assert_eq!(session.get(b"Hello")?, b"World");
//!
//! match session.put_keep(b"Hello", b"There") {
//!     Err(e) if e.is_exist() => {}
//!     other => panic!("unexpected: {:?}", other),
//! }
//! # Ok::<(), tyrantkv::ClientError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{ClientError, ErrorCode, Result, StatusError};
pub use network::Session;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of tyrantkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
