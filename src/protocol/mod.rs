//! Protocol Module
//!
//! Binary wire protocol spoken with a Tokyo Tyrant server.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬────────────────────┬───────────────────────┐
//! │ Magic(2) │ u32 lengths (4*n)  │  blobs, same order    │
//! └──────────┴────────────────────┴───────────────────────┘
//! ```
//!
//! ### Operations
//! - 0xC810: PUT     - klen, vlen, key, value  -> status
//! - 0xC811: PUTKEEP - klen, vlen, key, value  -> status
//! - 0xC818: PUTNR   - klen, vlen, key, value  -> (no reply)
//! - 0xC820: OUT     - klen, key               -> status
//! - 0xC830: GET     - klen, key               -> status [, vlen, value]
//!
//! All integers are big-endian. A status of 0 is success; anything else is
//! a failure whose meaning depends on the operation.

mod codec;
mod count;
mod magic;
mod request;

pub use codec::{
    read_request, read_status, read_status_as_error, read_value, write_status, write_value,
    MAX_VALUE_SIZE, STATUS_OK,
};
pub use count::CountingWriter;
pub use magic::Magic;
pub use request::{Request, MAGIC_SIZE};
