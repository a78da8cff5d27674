//! Protocol codec
//!
//! Decoding of server replies, plus the server half of the exchange
//! (request parsing, status and value replies) used by test servers.
//!
//! ## Reply Format
//! ```text
//! ┌──────────┐                      ┌──────────┬──────────┬─────────────┐
//! │Status(1) │  (store, out)        │Status(1) │ Len (4)  │   Value     │  (get)
//! └──────────┘                      └──────────┴──────────┴─────────────┘
//! ```

use std::io::{self, Read, Write};

use super::request::wire_len;
use super::{Magic, Request};
use crate::error::{ClientError, ErrorCode, Result, StatusError};

/// Status byte for success
pub const STATUS_OK: i8 = 0;

/// Upper bound on a single length field accepted by `read_request`
pub const MAX_VALUE_SIZE: u32 = 256 * 1024 * 1024;

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read the single status byte that answers a request
pub fn read_status<R: Read>(reader: &mut R) -> Result<i8> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|e| io::Error::new(e.kind(), format!("read code error: {}", e)))?;
    Ok(buf[0] as i8)
}

/// Read a status byte, mapping nonzero to `code`
///
/// The byte only says that the request failed; `code` is what that failure
/// means for the operation that sent it.
pub fn read_status_as_error<R: Read>(reader: &mut R, code: ErrorCode) -> Result<()> {
    match read_status(reader)? {
        STATUS_OK => Ok(()),
        _ => Err(StatusError::new(code).into()),
    }
}

/// Read a u32 length followed by exactly that many bytes
pub fn read_value<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let len = read_u32(reader)?;
    read_exact_vec(reader, len)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Reads `len` bytes without trusting `len` for the allocation up front
fn read_exact_vec<R: Read>(reader: &mut R, len: u32) -> Result<Vec<u8>> {
    let mut value = Vec::with_capacity((len as usize).min(64 * 1024));
    reader.take(u64::from(len)).read_to_end(&mut value)?;
    if value.len() != len as usize {
        return Err(ClientError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("value truncated: expected {} bytes, got {}", len, value.len()),
        )));
    }
    Ok(value)
}

// =============================================================================
// Server Half
// =============================================================================

/// Read one request off a stream
///
/// Each length field sizes the blob at the same position.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request<'static>> {
    let mut header = [0u8; 2];
    reader.read_exact(&mut header)?;
    let magic = Magic::try_from(u16::from_be_bytes(header))?;

    let mut lengths = Vec::with_capacity(magic.length_fields());
    for _ in 0..magic.length_fields() {
        let len = read_u32(reader)?;
        if len > MAX_VALUE_SIZE {
            return Err(ClientError::Protocol(format!(
                "{} field too large: {} bytes (max {})",
                magic.name(),
                len,
                MAX_VALUE_SIZE
            )));
        }
        lengths.push(len);
    }

    let mut req = Request::new(magic);
    for &len in &lengths {
        req.add_u32(len);
    }
    for &len in &lengths {
        req.add_binary(read_exact_vec(reader, len)?);
    }

    Ok(req)
}

/// Write a status byte
pub fn write_status<W: Write>(writer: &mut W, status: i8) -> Result<()> {
    writer.write_all(&[status as u8])?;
    writer.flush()?;
    Ok(())
}

/// Write a length-prefixed value
pub fn write_value<W: Write>(writer: &mut W, value: &[u8]) -> Result<()> {
    let len = wire_len(value.len(), "value")?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(value)?;
    writer.flush()?;
    Ok(())
}
